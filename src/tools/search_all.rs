//! MCP `search_all_sessions` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `search_all_sessions` MCP tool.
///
/// Results are session summaries ranked by match count; no thought content is returned.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchAllParams {
    #[schemars(description = "Keywords to look for across every session")]
    pub query: String,

    #[schemars(description = "Maximum number of sessions to return (default 10)")]
    pub limit: Option<usize>,

    #[schemars(description = "Number of ranked sessions to skip")]
    pub offset: Option<usize>,
}
