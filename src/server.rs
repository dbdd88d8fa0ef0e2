//! MCP server initialization for the stdio transport.
//!
//! [`serve_stdio`] builds the session manager from config and wires it into the MCP
//! tool handler.

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::sync::Arc;

use crate::tools::ThoughtTools;
use thoughtlog::config::ThoughtlogConfig;
use thoughtlog::session::SessionManager;

/// Shared setup: compile the name pattern, ensure the sessions directory exists.
fn setup_shared_state(
    config: ThoughtlogConfig,
) -> Result<(Arc<SessionManager>, Arc<ThoughtlogConfig>)> {
    let sessions = SessionManager::from_config(&config).with_context(|| {
        format!(
            "invalid session_pattern: {}",
            config.storage.session_pattern
        )
    })?;

    let dir = sessions.store().dir();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create sessions dir {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), "session store ready");

    Ok((Arc::new(sessions), Arc::new(config)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: ThoughtlogConfig) -> Result<()> {
    tracing::info!("starting thoughtlog MCP server on stdio");

    let (sessions, config) = setup_shared_state(config)?;

    let tools = ThoughtTools::new(sessions, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}
