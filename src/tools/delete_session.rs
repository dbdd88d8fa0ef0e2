use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteSessionParams {
    #[schemars(description = "Session to delete permanently")]
    pub session_name: String,
}
