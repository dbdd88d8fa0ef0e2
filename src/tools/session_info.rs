use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SessionInfoParams {
    #[schemars(description = "Session name to describe")]
    pub session_name: String,
}
