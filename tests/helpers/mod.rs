#![allow(dead_code)]

use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use thoughtlog::config::{RetrievalConfig, DEFAULT_SESSION_PATTERN};
use thoughtlog::session::naming::SessionNamer;
use thoughtlog::session::store::SessionStore;
use thoughtlog::session::types::RelationshipType;
use thoughtlog::session::{AppendThought, SessionManager};

/// A manager over a fresh temporary sessions directory. Keep the `TempDir` alive.
pub fn test_manager() -> (TempDir, SessionManager) {
    let tmp = TempDir::new().unwrap();
    let namer = SessionNamer::new(DEFAULT_SESSION_PATTERN).unwrap();
    let store = SessionStore::new(tmp.path().join("sessions"), namer);
    (tmp, SessionManager::new(store, RetrievalConfig::default()))
}

/// Plain append arguments for `session`.
pub fn thought(session: &str, reasoning: &str) -> AppendThought {
    AppendThought {
        reasoning: reasoning.to_string(),
        session_name: Some(session.to_string()),
        ..Default::default()
    }
}

/// Append arguments linked to `target`.
pub fn linked(
    session: &str,
    reasoning: &str,
    target: &str,
    kind: RelationshipType,
) -> AppendThought {
    AppendThought {
        relates_to: Some(target.to_string()),
        relationship_type: Some(kind),
        ..thought(session, reasoning)
    }
}

/// Append `count` plain thoughts and return their IDs.
pub async fn fill_session(manager: &SessionManager, session: &str, count: usize) -> Vec<String> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let outcome = manager
            .append_thought(thought(session, &format!("thought number {i}")))
            .await
            .unwrap();
        ids.push(outcome.thought_id);
    }
    ids
}

/// Set a session file's mtime to `days_ago` days in the past.
pub fn backdate_session(manager: &SessionManager, session: &str, days_ago: u64) {
    let path = manager.store().path_for(session).unwrap();
    let when = SystemTime::now() - Duration::from_secs(days_ago * 24 * 60 * 60);
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(when).unwrap();
}
