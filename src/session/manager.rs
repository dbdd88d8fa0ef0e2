//! Session-level operations exposed to the tool layer.
//!
//! Every operation loads a fresh snapshot from the [`SessionStore`], works on it in
//! memory and, if it changed anything, saves it back in one whole-file write. There is
//! no cross-call cache and no locking: concurrent writers to the same session are
//! last-writer-wins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::config::{RetrievalConfig, ThoughtlogConfig};
use crate::error::{SessionError, SessionResult};
use crate::session::maintenance::{self, CleanupResult};
use crate::session::naming::{self, SessionNamer};
use crate::session::relations::{self, ReasoningChain, RelatedContext};
use crate::session::search::{self, RelationshipCandidate, SearchHit};
use crate::session::store::SessionStore;
use crate::session::types::{RelationshipType, ThinkingMode, Thought};

/// Arguments for [`SessionManager::append_thought`].
#[derive(Debug, Clone, Default)]
pub struct AppendThought {
    pub reasoning: String,
    /// Omit to start a new `TEMP:` session.
    pub session_name: Option<String>,
    pub mode: Option<ThinkingMode>,
    pub tags: Vec<String>,
    pub relates_to: Option<String>,
    /// Defaults to `builds_on` when `relates_to` is set.
    pub relationship_type: Option<RelationshipType>,
}

#[derive(Debug, Serialize)]
pub struct AppendOutcome {
    pub thought_id: String,
    pub session_name: String,
    pub thought_count: usize,
    pub is_new_session: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_context: Option<RelatedContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_chain: Option<ReasoningChain>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_name: String,
    pub thought_count: usize,
    pub first_thought: Option<DateTime<Utc>>,
    pub last_thought: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SessionList {
    pub sessions: Vec<SessionSummary>,
    pub count: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_name: String,
    pub thoughts: Vec<Thought>,
    pub count: usize,
    pub total_thoughts: usize,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionSearch {
    pub session_name: String,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub count: usize,
    pub total_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionMatch {
    pub session_name: String,
    pub match_count: usize,
    pub thought_count: usize,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct GlobalSearch {
    pub query: String,
    pub sessions: Vec<SessionMatch>,
    pub count: usize,
    pub total_matching: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_name: String,
    pub exists: bool,
    pub thought_count: usize,
    pub first_thought: Option<DateTime<Utc>>,
    pub last_thought: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    /// Distinct modes in first-use order.
    pub modes: Vec<ThinkingMode>,
    /// Distinct tags, sorted.
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RenameOutcome {
    pub old_session_name: String,
    pub new_session_name: String,
    pub thought_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub session_name: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct RelationshipSearch {
    pub session_name: String,
    pub query: String,
    pub results: Vec<RelationshipCandidate>,
    pub count: usize,
}

/// Composes naming, storage, relationships and search into the public operations.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: SessionStore,
    retrieval: RetrievalConfig,
}

impl SessionManager {
    pub fn new(store: SessionStore, retrieval: RetrievalConfig) -> Self {
        Self { store, retrieval }
    }

    /// Build the store from the configured directory and name pattern.
    pub fn from_config(config: &ThoughtlogConfig) -> Result<Self, regex::Error> {
        let namer = SessionNamer::new(&config.storage.session_pattern)?;
        let store = SessionStore::new(config.resolved_sessions_dir(), namer);
        Ok(Self::new(store, config.retrieval.clone()))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn retrieval(&self) -> &RetrievalConfig {
        &self.retrieval
    }

    /// Append one thought, creating the session on first write.
    pub async fn append_thought(&self, args: AppendThought) -> SessionResult<AppendOutcome> {
        if args.reasoning.trim().is_empty() {
            return Err(SessionError::invalid_argument(
                "reasoning",
                "must not be empty",
            ));
        }
        if args.relationship_type.is_some() && args.relates_to.is_none() {
            return Err(SessionError::invalid_argument(
                "relationship_type",
                "requires relates_to",
            ));
        }

        let session_name = match args.session_name {
            Some(name) => self.store.namer().validate(&name)?.to_string(),
            None => naming::ephemeral_name(),
        };

        let mut thoughts = self.store.load(&session_name).await?;
        let is_new_session = thoughts.is_empty();

        // Never stamp a thought earlier than the one before it.
        let now = Utc::now();
        let timestamp = thoughts
            .last()
            .map_or(now, |last| last.timestamp.max(now));

        let mut thought = Thought::new(
            args.reasoning,
            args.mode.unwrap_or_default(),
            args.tags,
            timestamp,
        );

        let mut link = None;
        if let Some(target_id) = args.relates_to {
            let kind = args.relationship_type.unwrap_or(RelationshipType::BuildsOn);
            relations::validate_link(&thoughts, &thought.id, &target_id, thought.timestamp)?;
            relations::apply_link(&mut thoughts, &mut thought, &target_id, kind)?;
            link = Some((target_id, kind));
        }

        let thought_id = thought.id.clone();
        thoughts.push(thought);
        self.store.save(&session_name, &thoughts).await?;

        tracing::info!(
            session = %session_name,
            thought_id = %thought_id,
            thought_count = thoughts.len(),
            is_new_session,
            "thought appended"
        );

        let (related_context, reasoning_chain) = match link {
            Some((target_id, RelationshipType::BuildsOn)) => {
                let context = relations::find_conflicts_and_supports(
                    &target_id,
                    &thoughts,
                    self.retrieval.related_limit,
                    self.retrieval.chain_preview_chars,
                );
                let chain = relations::reconstruct_chain(
                    &thought_id,
                    &thoughts,
                    self.retrieval.chain_preview_chars,
                );
                ((!context.is_empty()).then_some(context), Some(chain))
            }
            _ => (None, None),
        };

        Ok(AppendOutcome {
            thought_id,
            session_name,
            thought_count: thoughts.len(),
            is_new_session,
            related_context,
            reasoning_chain,
        })
    }

    /// Summaries of every session, most recently modified first.
    pub async fn list_sessions(&self, limit: usize, offset: usize) -> SessionResult<SessionList> {
        let mut sessions = Vec::new();

        for key in self.store.list().await? {
            let thoughts = match self.store.load_key(&key).await {
                Ok(thoughts) => thoughts,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "skipping unreadable session");
                    continue;
                }
            };
            let stats = self.store.statistics_key(&key).await?;
            sessions.push(SessionSummary {
                session_name: naming::decode(&key),
                thought_count: thoughts.len(),
                first_thought: thoughts.first().map(|t| t.timestamp),
                last_thought: thoughts.last().map(|t| t.timestamp),
                last_modified: stats.last_modified_at,
            });
        }

        sessions.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        let total = sessions.len();
        let sessions: Vec<SessionSummary> = sessions.into_iter().skip(offset).take(limit).collect();

        Ok(SessionList {
            count: sessions.len(),
            sessions,
            total,
        })
    }

    /// Full thoughts of one session in append order. A missing session is empty.
    pub async fn view_session(
        &self,
        session_name: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> SessionResult<SessionView> {
        let thoughts = self.store.load(session_name).await?;
        let total_thoughts = thoughts.len();
        let limit = limit.unwrap_or(self.retrieval.max_return);
        let offset = offset.unwrap_or(0);

        let page: Vec<Thought> = thoughts.into_iter().skip(offset).take(limit).collect();
        let has_more = offset.saturating_add(page.len()) < total_thoughts;

        Ok(SessionView {
            session_name: session_name.to_string(),
            count: page.len(),
            thoughts: page,
            total_thoughts,
            has_more,
        })
    }

    pub async fn search_in_session(
        &self,
        session_name: &str,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> SessionResult<SessionSearch> {
        let query = non_empty_query(query)?;
        let thoughts = self.load_existing(session_name).await?;

        let page = search::search_in_session(
            &thoughts,
            query,
            limit,
            offset,
            self.retrieval.preview_chars,
        );

        Ok(SessionSearch {
            session_name: session_name.to_string(),
            query: query.to_string(),
            results: page.results,
            count: page.count,
            total_matches: page.total_matches,
        })
    }

    /// Rank sessions by how many of their thoughts match. Returns no thought content.
    pub async fn search_all_sessions(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> SessionResult<GlobalSearch> {
        let query = non_empty_query(query)?;
        let mut matching = Vec::new();

        for key in self.store.list().await? {
            let thoughts = match self.store.load_key(&key).await {
                Ok(thoughts) => thoughts,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "skipping unreadable session");
                    continue;
                }
            };
            let match_count = search::count_matches(&thoughts, query);
            if match_count == 0 {
                continue;
            }
            let stats = self.store.statistics_key(&key).await?;
            matching.push(SessionMatch {
                session_name: naming::decode(&key),
                match_count,
                thought_count: thoughts.len(),
                last_modified: stats.last_modified_at,
            });
        }

        matching.sort_by(|a, b| b.match_count.cmp(&a.match_count));
        let total_matching = matching.len();
        let sessions: Vec<SessionMatch> = matching.into_iter().skip(offset).take(limit).collect();

        Ok(GlobalSearch {
            query: query.to_string(),
            count: sessions.len(),
            sessions,
            total_matching,
        })
    }

    /// Metadata derived from content and file timestamps. Missing sessions report
    /// `exists: false` rather than failing.
    pub async fn get_session_info(&self, session_name: &str) -> SessionResult<SessionInfo> {
        let stats = self.store.statistics(session_name).await?;
        let thoughts = if stats.exists {
            self.store.load(session_name).await?
        } else {
            Vec::new()
        };

        let mut modes = Vec::new();
        for thought in &thoughts {
            if !modes.contains(&thought.mode) {
                modes.push(thought.mode);
            }
        }
        let tags: BTreeSet<&str> = thoughts
            .iter()
            .flat_map(|t| t.tags.iter().map(String::as_str))
            .collect();

        Ok(SessionInfo {
            session_name: session_name.to_string(),
            exists: stats.exists,
            thought_count: thoughts.len(),
            first_thought: thoughts.first().map(|t| t.timestamp),
            last_thought: thoughts.last().map(|t| t.timestamp),
            created: stats.created_at,
            last_modified: stats.last_modified_at,
            modes,
            tags: tags.into_iter().map(str::to_string).collect(),
        })
    }

    pub async fn rename_session(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> SessionResult<RenameOutcome> {
        let thought_count = self.store.rename(old_name, new_name).await?;
        tracing::info!(old = %old_name, new = %new_name, thought_count, "session renamed");

        Ok(RenameOutcome {
            old_session_name: old_name.to_string(),
            new_session_name: new_name.to_string(),
            thought_count,
        })
    }

    pub async fn delete_session(&self, session_name: &str) -> SessionResult<DeleteOutcome> {
        self.store.remove(session_name).await?;
        tracing::info!(session = %session_name, "session deleted");

        Ok(DeleteOutcome {
            session_name: session_name.to_string(),
            deleted: true,
        })
    }

    /// Delete sessions untouched for more than `max_age_days`.
    pub async fn cleanup_sessions(&self, max_age_days: u64) -> SessionResult<CleanupResult> {
        maintenance::cleanup_sessions(&self.store, max_age_days, false).await
    }

    /// Report what [`SessionManager::cleanup_sessions`] would delete.
    pub async fn preview_cleanup(&self, max_age_days: u64) -> SessionResult<CleanupResult> {
        maintenance::cleanup_sessions(&self.store, max_age_days, true).await
    }

    /// Find thoughts in a session worth linking a new thought to.
    pub async fn find_thought_relationships(
        &self,
        session_name: &str,
        query: &str,
        relationship_types: Option<&[RelationshipType]>,
        exclude_thought_id: Option<&str>,
        limit: usize,
    ) -> SessionResult<RelationshipSearch> {
        let query = non_empty_query(query)?;
        let thoughts = self.load_existing(session_name).await?;

        let results = search::relationship_candidates(
            &thoughts,
            query,
            relationship_types,
            exclude_thought_id,
            limit,
            self.retrieval.preview_chars,
        );

        Ok(RelationshipSearch {
            session_name: session_name.to_string(),
            query: query.to_string(),
            count: results.len(),
            results,
        })
    }

    /// Load a session that must already have thoughts.
    async fn load_existing(&self, session_name: &str) -> SessionResult<Vec<Thought>> {
        let thoughts = self.store.load(session_name).await?;
        if thoughts.is_empty() {
            return Err(SessionError::session_not_found(session_name));
        }
        Ok(thoughts)
    }
}

/// Reject blank queries. The query itself is scored as given, surrounding spaces included.
fn non_empty_query(query: &str) -> SessionResult<&str> {
    if query.trim().is_empty() {
        return Err(SessionError::invalid_argument("query", "must not be empty"));
    }
    Ok(query)
}
