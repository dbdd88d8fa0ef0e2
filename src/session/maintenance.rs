use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::SessionResult;
use crate::session::naming;
use crate::session::store::SessionStore;

#[derive(Debug, Serialize)]
pub struct CleanupResult {
    pub candidates: Vec<CleanupCandidate>,
    pub deleted_count: usize,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupCandidate {
    pub session_name: String,
    pub last_modified: DateTime<Utc>,
    pub age_days: i64,
}

/// Sessions whose file was last modified more than `max_age_days` ago.
pub async fn stale_sessions(
    store: &SessionStore,
    max_age_days: u64,
    now: DateTime<Utc>,
) -> SessionResult<Vec<(String, CleanupCandidate)>> {
    // A threshold beyond what a duration can hold is never reached.
    let Some(threshold) = i64::try_from(max_age_days)
        .ok()
        .and_then(chrono::Duration::try_days)
    else {
        return Ok(Vec::new());
    };
    let mut stale = Vec::new();

    for key in store.list().await? {
        let stats = store.statistics_key(&key).await?;
        let Some(last_modified) = stats.last_modified_at else {
            continue;
        };
        let age = now - last_modified;
        if age > threshold {
            stale.push((
                key.clone(),
                CleanupCandidate {
                    session_name: naming::decode(&key),
                    last_modified,
                    age_days: age.num_days(),
                },
            ));
        }
    }

    Ok(stale)
}

/// Delete every stale session. With `dry_run`, only report candidates.
pub async fn cleanup_sessions(
    store: &SessionStore,
    max_age_days: u64,
    dry_run: bool,
) -> SessionResult<CleanupResult> {
    let stale = stale_sessions(store, max_age_days, Utc::now()).await?;

    if dry_run {
        return Ok(CleanupResult {
            candidates: stale.into_iter().map(|(_, c)| c).collect(),
            deleted_count: 0,
            dry_run: true,
        });
    }

    let mut deleted_count = 0;
    let mut candidates = Vec::with_capacity(stale.len());
    for (key, candidate) in stale {
        store.remove_key(&key).await?;
        tracing::info!(
            session = %candidate.session_name,
            age_days = candidate.age_days,
            "deleted stale session"
        );
        deleted_count += 1;
        candidates.push(candidate);
    }

    Ok(CleanupResult {
        candidates,
        deleted_count,
        dry_run: false,
    })
}
