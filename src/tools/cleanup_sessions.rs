use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CleanupSessionsParams {
    #[schemars(description = "Delete sessions not modified for more than this many days (default from config, 90)")]
    pub max_age_days: Option<u64>,

    #[schemars(description = "If true, only list what would be deleted")]
    pub dry_run: Option<bool>,
}
