pub mod cleanup;
pub mod info;
pub mod list;
pub mod search;
pub mod view;

use anyhow::{Context, Result};

use thoughtlog::config::ThoughtlogConfig;
use thoughtlog::session::SessionManager;

/// Open the session store described by `config`.
fn open_sessions(config: &ThoughtlogConfig) -> Result<SessionManager> {
    SessionManager::from_config(config)
        .with_context(|| format!("invalid session_pattern: {}", config.storage.session_pattern))
}

fn format_time(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}
