pub mod append_thought;
pub mod cleanup_sessions;
pub mod delete_session;
pub mod find_relationships;
pub mod list_sessions;
pub mod rename_session;
pub mod search_all;
pub mod search_session;
pub mod session_info;
pub mod view_session;

use append_thought::AppendThoughtParams;
use cleanup_sessions::CleanupSessionsParams;
use delete_session::DeleteSessionParams;
use find_relationships::FindRelationshipsParams;
use list_sessions::ListSessionsParams;
use rename_session::RenameSessionParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use search_all::SearchAllParams;
use search_session::SearchSessionParams;
use serde::Serialize;
use session_info::SessionInfoParams;
use std::sync::Arc;
use view_session::ViewSessionParams;

use thoughtlog::config::ThoughtlogConfig;
use thoughtlog::error::SessionResult;
use thoughtlog::session::SessionManager;

const DEFAULT_SEARCH_LIMIT: usize = 10;
const DEFAULT_RELATIONSHIP_LIMIT: usize = 5;

/// The thoughtlog MCP tool handler. Holds the session manager and config and exposes
/// every session operation via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct ThoughtTools {
    tool_router: ToolRouter<Self>,
    sessions: Arc<SessionManager>,
    config: Arc<ThoughtlogConfig>,
}

#[tool_router]
impl ThoughtTools {
    pub fn new(sessions: Arc<SessionManager>, config: Arc<ThoughtlogConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            sessions,
            config,
        }
    }

    /// Record a thought, optionally linked to an earlier one.
    #[tool(description = "Record a reasoning step in a session. Content is stored verbatim. Optionally link it to an earlier thought (builds_on, supports, contradicts, refines, questions, synthesizes). Omitting session_name starts a TEMP session.")]
    async fn append_thought(
        &self,
        Parameters(params): Parameters<AppendThoughtParams>,
    ) -> Result<String, String> {
        tracing::info!(
            content_len = params.reasoning.len(),
            session = ?params.session_name,
            relates_to = ?params.relates_to,
            "append_thought called"
        );
        let result = match params.into_args() {
            Ok(args) => self.sessions.append_thought(args).await,
            Err(e) => Err(e),
        };
        respond(result)
    }

    #[tool(description = "List sessions, most recently modified first, with thought counts and timestamps.")]
    async fn list_sessions(
        &self,
        Parameters(params): Parameters<ListSessionsParams>,
    ) -> Result<String, String> {
        tracing::info!("list_sessions called");
        let limit = params.limit.unwrap_or(self.config.retrieval.max_return);
        respond(
            self.sessions
                .list_sessions(limit, params.offset.unwrap_or(0))
                .await,
        )
    }

    #[tool(description = "View the full thoughts of a session in the order they were recorded.")]
    async fn view_session(
        &self,
        Parameters(params): Parameters<ViewSessionParams>,
    ) -> Result<String, String> {
        tracing::info!(session = %params.session_name, "view_session called");
        respond(
            self.sessions
                .view_session(&params.session_name, params.limit, params.offset)
                .await,
        )
    }

    #[tool(description = "Keyword search within one session. Results are ranked by relevance with content previews.")]
    async fn search_in_session(
        &self,
        Parameters(params): Parameters<SearchSessionParams>,
    ) -> Result<String, String> {
        tracing::info!(
            session = %params.session_name,
            query = %params.query,
            "search_in_session called"
        );
        respond(
            self.sessions
                .search_in_session(
                    &params.session_name,
                    &params.query,
                    params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
                    params.offset.unwrap_or(0),
                )
                .await,
        )
    }

    #[tool(description = "Keyword search across all sessions. Returns sessions ranked by number of matching thoughts, without thought content.")]
    async fn search_all_sessions(
        &self,
        Parameters(params): Parameters<SearchAllParams>,
    ) -> Result<String, String> {
        tracing::info!(query = %params.query, "search_all_sessions called");
        respond(
            self.sessions
                .search_all_sessions(
                    &params.query,
                    params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
                    params.offset.unwrap_or(0),
                )
                .await,
        )
    }

    #[tool(description = "Get session metadata: existence, thought count, first/last thought times, modes and tags used.")]
    async fn get_session_info(
        &self,
        Parameters(params): Parameters<SessionInfoParams>,
    ) -> Result<String, String> {
        tracing::info!(session = %params.session_name, "get_session_info called");
        respond(self.sessions.get_session_info(&params.session_name).await)
    }

    #[tool(description = "Rename a session, e.g. to give a TEMP session a permanent name.")]
    async fn rename_session(
        &self,
        Parameters(params): Parameters<RenameSessionParams>,
    ) -> Result<String, String> {
        tracing::info!(
            old = %params.old_session_name,
            new = %params.new_session_name,
            "rename_session called"
        );
        respond(
            self.sessions
                .rename_session(&params.old_session_name, &params.new_session_name)
                .await,
        )
    }

    #[tool(description = "Permanently delete a session and all its thoughts.")]
    async fn delete_session(
        &self,
        Parameters(params): Parameters<DeleteSessionParams>,
    ) -> Result<String, String> {
        tracing::info!(session = %params.session_name, "delete_session called");
        respond(self.sessions.delete_session(&params.session_name).await)
    }

    #[tool(description = "Delete sessions that have not been modified for more than max_age_days. Use dry_run to preview.")]
    async fn cleanup_sessions(
        &self,
        Parameters(params): Parameters<CleanupSessionsParams>,
    ) -> Result<String, String> {
        let max_age_days = params
            .max_age_days
            .unwrap_or(self.config.maintenance.max_age_days);
        let dry_run = params.dry_run.unwrap_or(false);
        tracing::info!(max_age_days, dry_run, "cleanup_sessions called");

        let result = if dry_run {
            self.sessions.preview_cleanup(max_age_days).await
        } else {
            self.sessions.cleanup_sessions(max_age_days).await
        };
        respond(result)
    }

    #[tool(description = "Find thoughts in a session related to a query, with their existing relationships, to pick a relates_to target.")]
    async fn find_thought_relationships(
        &self,
        Parameters(params): Parameters<FindRelationshipsParams>,
    ) -> Result<String, String> {
        tracing::info!(
            session = %params.session_name,
            query = %params.query,
            "find_thought_relationships called"
        );
        let types = match params.parsed_types() {
            Ok(types) => types,
            Err(e) => return respond::<()>(Err(e)),
        };
        respond(
            self.sessions
                .find_thought_relationships(
                    &params.session_name,
                    &params.query,
                    types.as_deref(),
                    params.exclude_thought_id.as_deref(),
                    params.limit.unwrap_or(DEFAULT_RELATIONSHIP_LIMIT),
                )
                .await,
        )
    }
}

/// Serialize a success value, or turn a failure into the JSON error payload.
fn respond<T: Serialize>(result: SessionResult<T>) -> Result<String, String> {
    match result {
        Ok(value) => {
            serde_json::to_string(&value).map_err(|e| format!("serialization failed: {e}"))
        }
        Err(e) => {
            tracing::warn!(kind = ?e.kind(), error = %e, "operation failed");
            Err(serde_json::to_string(&e.to_payload()).unwrap_or_else(|_| e.to_string()))
        }
    }
}

#[tool_handler]
impl ServerHandler for ThoughtTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "thoughtlog records reasoning in named sessions. Use append_thought to record, \
                 search_in_session or search_all_sessions to find earlier thoughts, and \
                 find_thought_relationships to pick a thought to build on."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thoughtlog::error::SessionError;

    #[test]
    fn test_respond_failure_is_structured_payload() {
        let err = respond::<()>(Err(SessionError::session_not_found("a:b:c"))).unwrap_err();
        let json: serde_json::Value = serde_json::from_str(&err).unwrap();
        assert_eq!(json["kind"], "not_found");
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_respond_success_serializes_value() {
        let ok = respond(Ok(serde_json::json!({"thought_count": 2}))).unwrap();
        assert_eq!(ok, r#"{"thought_count":2}"#);
    }
}
