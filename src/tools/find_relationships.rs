//! MCP `find_thought_relationships` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use thoughtlog::error::{SessionError, SessionResult};
use thoughtlog::session::types::RelationshipType;

/// Parameters for the `find_thought_relationships` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindRelationshipsParams {
    #[schemars(description = "Session to search")]
    pub session_name: String,

    #[schemars(description = "Keywords describing the thought you want to relate to")]
    pub query: String,

    #[schemars(
        description = "Only return thoughts already taking part in one of these relationship types"
    )]
    pub relationship_types: Option<Vec<String>>,

    #[schemars(description = "Thought ID to leave out of the results")]
    pub exclude_thought_id: Option<String>,

    #[schemars(description = "Maximum number of results (default 5)")]
    pub limit: Option<usize>,
}

impl FindRelationshipsParams {
    pub fn parsed_types(&self) -> SessionResult<Option<Vec<RelationshipType>>> {
        self.relationship_types
            .as_ref()
            .map(|types| {
                types
                    .iter()
                    .map(|t| t.parse::<RelationshipType>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| SessionError::invalid_argument("relationship_types", e))
            })
            .transpose()
    }
}
