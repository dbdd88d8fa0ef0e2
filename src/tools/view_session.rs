use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ViewSessionParams {
    #[schemars(description = "Session name, e.g. 'thesis:NVDA:ai_dominance'")]
    pub session_name: String,

    #[schemars(description = "Maximum number of thoughts to return. Defaults to the configured max_return.")]
    pub limit: Option<usize>,

    #[schemars(description = "Number of thoughts to skip, in append order")]
    pub offset: Option<usize>,
}
