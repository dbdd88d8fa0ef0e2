use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListSessionsParams {
    #[schemars(description = "Maximum number of sessions to return. Defaults to the configured max_return.")]
    pub limit: Option<usize>,

    #[schemars(description = "Number of sessions to skip (most recently modified first)")]
    pub offset: Option<usize>,
}
