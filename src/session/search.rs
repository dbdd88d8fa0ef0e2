//! Keyword search over thought content.
//!
//! A linear scan with an additive relevance score. Matching is a case-insensitive
//! substring test on content, tags and mode name; ranking is a stable sort by
//! descending score, so equal scores keep append order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::session::types::{preview, Relationship, RelationshipType, ThinkingMode, Thought};

const FULL_QUERY_HIT: u32 = 10;
const WORD_HIT: u32 = 2;
const TAG_HIT: u32 = 5;
const MODE_HIT: u32 = 3;
const RELATIONSHIP_BONUS: u32 = 1;

/// One ranked thought, with a content preview.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub thought_id: String,
    pub content: String,
    pub mode: ThinkingMode,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub score: u32,
}

/// One page of in-session results.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub results: Vec<SearchHit>,
    /// Size of this page.
    pub count: usize,
    /// Matches before pagination.
    pub total_matches: usize,
}

/// A ranked thought with its edges, for relationship discovery.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipCandidate {
    pub thought_id: String,
    pub preview: String,
    pub mode: ThinkingMode,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub score: u32,
    pub relationships_out: Vec<Relationship>,
    pub relationships_in: Vec<Relationship>,
}

/// Whether `thought` matches an already-lowercased query.
pub fn matches(thought: &Thought, query_lower: &str) -> bool {
    thought.content.to_lowercase().contains(query_lower)
        || thought
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query_lower))
        || thought.mode.as_str().contains(query_lower)
}

/// Relevance of `thought` to an already-lowercased query.
pub fn score(thought: &Thought, query_lower: &str) -> u32 {
    let content = thought.content.to_lowercase();
    let mut score = 0;

    if content.contains(query_lower) {
        score += FULL_QUERY_HIT;
    }
    score += query_lower
        .split_whitespace()
        .filter(|word| content.contains(word))
        .count() as u32
        * WORD_HIT;
    score += thought
        .tags
        .iter()
        .filter(|tag| tag.to_lowercase().contains(query_lower))
        .count() as u32
        * TAG_HIT;
    if thought.mode.as_str().contains(query_lower) {
        score += MODE_HIT;
    }
    if thought.has_relationships() {
        score += RELATIONSHIP_BONUS;
    }

    score
}

/// Filter, score and rank; equal scores keep their input order.
fn ranked<'a>(
    thoughts: impl Iterator<Item = &'a Thought>,
    query_lower: &str,
) -> Vec<(&'a Thought, u32)> {
    let mut scored: Vec<(&Thought, u32)> = thoughts
        .filter(|t| matches(t, query_lower))
        .map(|t| (t, score(t, query_lower)))
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

/// Rank and paginate matches within one session.
pub fn search_in_session(
    thoughts: &[Thought],
    query: &str,
    limit: usize,
    offset: usize,
    preview_chars: usize,
) -> SearchPage {
    let query_lower = query.to_lowercase();
    let scored = ranked(thoughts.iter(), &query_lower);
    let total_matches = scored.len();

    let results: Vec<SearchHit> = scored
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|(t, score)| SearchHit {
            thought_id: t.id.clone(),
            content: preview(&t.content, preview_chars),
            mode: t.mode,
            tags: t.tags.clone(),
            timestamp: t.timestamp,
            score,
        })
        .collect();

    SearchPage {
        count: results.len(),
        results,
        total_matches,
    }
}

/// Number of thoughts in a session matching the query. No scoring, no previews.
pub fn count_matches(thoughts: &[Thought], query: &str) -> usize {
    let query_lower = query.to_lowercase();
    thoughts.iter().filter(|t| matches(t, &query_lower)).count()
}

/// Ranked thoughts that are candidates for a new relationship.
///
/// With `relationship_types`, only thoughts that already take part in an edge of one
/// of those types are kept.
pub fn relationship_candidates(
    thoughts: &[Thought],
    query: &str,
    relationship_types: Option<&[RelationshipType]>,
    exclude_thought_id: Option<&str>,
    limit: usize,
    preview_chars: usize,
) -> Vec<RelationshipCandidate> {
    let query_lower = query.to_lowercase();

    let eligible = thoughts.iter().filter(|t| {
        if exclude_thought_id == Some(t.id.as_str()) {
            return false;
        }
        match relationship_types {
            Some(types) if !types.is_empty() => t
                .relationships_out
                .iter()
                .chain(t.relationships_in.iter())
                .any(|r| types.contains(&r.relationship_type)),
            _ => true,
        }
    });

    ranked(eligible, &query_lower)
        .into_iter()
        .take(limit)
        .map(|(t, score)| RelationshipCandidate {
            thought_id: t.id.clone(),
            preview: preview(&t.content, preview_chars),
            mode: t.mode,
            tags: t.tags.clone(),
            timestamp: t.timestamp,
            score,
            relationships_out: t.relationships_out.clone(),
            relationships_in: t.relationships_in.clone(),
        })
        .collect()
}
