//! MCP `search_in_session` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `search_in_session` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchSessionParams {
    #[schemars(description = "Session to search")]
    pub session_name: String,

    /// Case-insensitive keyword query.
    #[schemars(description = "Keywords to look for in thought content, tags and mode")]
    pub query: String,

    #[schemars(description = "Maximum number of results (default 10)")]
    pub limit: Option<usize>,

    #[schemars(description = "Number of ranked results to skip")]
    pub offset: Option<usize>,
}
