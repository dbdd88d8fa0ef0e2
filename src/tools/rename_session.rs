//! MCP `rename_session` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `rename_session` MCP tool. Typically used to give a `TEMP:`
/// session a permanent name.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RenameSessionParams {
    #[schemars(description = "Current session name (e.g. 'TEMP:1718000000000:ab12cd34')")]
    pub old_session_name: String,

    #[schemars(description = "New session name; must not already exist")]
    pub new_session_name: String,
}
