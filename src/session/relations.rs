//! Directed links between thoughts of one session.
//!
//! Links always point from a new thought to an older one. [`validate_link`] enforces
//! that, [`apply_link`] records the edge on both endpoints, and [`reconstruct_chain`]
//! walks `builds_on` edges backwards to rebuild a thought's ancestry.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::error::{SessionError, SessionResult};
use crate::session::types::{preview, Relationship, RelationshipType, ThinkingMode, Thought};

/// Traversal stops after this many nodes even if predecessors remain.
pub const MAX_CHAIN_DEPTH: usize = 20;
/// Longer chains keep only the most recent entries.
pub const CHAIN_DISPLAY_LEN: usize = 7;

/// One step of a reconstructed reasoning chain.
#[derive(Debug, Clone, Serialize)]
pub struct ChainEntry {
    pub thought_id: String,
    pub content: String,
    pub mode: ThinkingMode,
    pub timestamp: DateTime<Utc>,
    /// Set on the oldest retained entry when older entries were dropped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omitted_before: Option<usize>,
}

impl ChainEntry {
    pub fn is_truncation_marker(&self) -> bool {
        self.omitted_before.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasoningChain {
    /// Oldest first, ending at the start thought.
    pub chain: Vec<ChainEntry>,
    /// Untruncated chain length.
    pub total_length: usize,
    pub truncated: bool,
}

/// A thought that supports or contradicts some target.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedThought {
    pub thought_id: String,
    pub preview: String,
    pub mode: ThinkingMode,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RelatedContext {
    pub contradictions: Vec<RelatedThought>,
    pub supports: Vec<RelatedThought>,
}

impl RelatedContext {
    pub fn is_empty(&self) -> bool {
        self.contradictions.is_empty() && self.supports.is_empty()
    }
}

/// Check that `candidate_id` may link to `target_id` within `thoughts`.
pub fn validate_link(
    thoughts: &[Thought],
    candidate_id: &str,
    target_id: &str,
    candidate_timestamp: DateTime<Utc>,
) -> SessionResult<()> {
    if candidate_id == target_id {
        return Err(SessionError::SelfReference {
            thought_id: candidate_id.to_string(),
        });
    }

    let target = thoughts
        .iter()
        .find(|t| t.id == target_id)
        .ok_or_else(|| SessionError::TargetNotFound {
            target_id: target_id.to_string(),
        })?;

    if target.timestamp > candidate_timestamp {
        return Err(SessionError::FutureReference {
            target_id: target_id.to_string(),
        });
    }

    Ok(())
}

/// Record `source -> target` on both endpoints.
///
/// `thoughts` is the persisted snapshot; `source` is the new thought, not yet in it.
/// The target's inbound list is the only field of an existing record that changes.
pub fn apply_link(
    thoughts: &mut [Thought],
    source: &mut Thought,
    target_id: &str,
    relationship_type: RelationshipType,
) -> SessionResult<()> {
    let target = thoughts
        .iter_mut()
        .find(|t| t.id == target_id)
        .ok_or_else(|| SessionError::TargetNotFound {
            target_id: target_id.to_string(),
        })?;

    target.relationships_in.push(Relationship {
        thought_id: source.id.clone(),
        relationship_type,
    });

    source.relates_to = Some(target_id.to_string());
    source.relationship_type = Some(relationship_type);
    source.relationships_out.push(Relationship {
        thought_id: target_id.to_string(),
        relationship_type,
    });

    Ok(())
}

/// Rebuild the `builds_on` ancestry of `start_id`, oldest first.
pub fn reconstruct_chain(
    start_id: &str,
    thoughts: &[Thought],
    preview_chars: usize,
) -> ReasoningChain {
    let by_id: HashMap<&str, &Thought> = thoughts.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut nodes: Vec<&Thought> = Vec::new();
    let mut current = by_id.get(start_id).copied();

    while let Some(thought) = current {
        if nodes.len() >= MAX_CHAIN_DEPTH || !visited.insert(thought.id.as_str()) {
            break;
        }
        nodes.push(thought);
        current = thought
            .builds_on()
            .and_then(|prev| by_id.get(prev).copied());
    }
    nodes.reverse();

    let total_length = nodes.len();
    let omitted = total_length.saturating_sub(CHAIN_DISPLAY_LEN);

    let mut chain: Vec<ChainEntry> = nodes[omitted..]
        .iter()
        .map(|t| ChainEntry {
            thought_id: t.id.clone(),
            content: preview(&t.content, preview_chars),
            mode: t.mode,
            timestamp: t.timestamp,
            omitted_before: None,
        })
        .collect();

    if omitted > 0 {
        if let Some(first) = chain.first_mut() {
            first.omitted_before = Some(omitted);
        }
    }

    ReasoningChain {
        chain,
        total_length,
        truncated: omitted > 0,
    }
}

/// Thoughts that declare `contradicts` / `supports` edges toward `target_id`,
/// at most `limit` of each, in append order.
pub fn find_conflicts_and_supports(
    target_id: &str,
    thoughts: &[Thought],
    limit: usize,
    preview_chars: usize,
) -> RelatedContext {
    let pointing_at = |t: &Thought, kind: RelationshipType| {
        t.relationships_out
            .iter()
            .any(|r| r.thought_id == target_id && r.relationship_type == kind)
    };
    let related = |t: &Thought| RelatedThought {
        thought_id: t.id.clone(),
        preview: preview(&t.content, preview_chars),
        mode: t.mode,
        timestamp: t.timestamp,
    };

    RelatedContext {
        contradictions: thoughts
            .iter()
            .filter(|t| pointing_at(t, RelationshipType::Contradicts))
            .take(limit)
            .map(related)
            .collect(),
        supports: thoughts
            .iter()
            .filter(|t| pointing_at(t, RelationshipType::Supports))
            .take(limit)
            .map(related)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn thought(id: &str, secs: i64) -> Thought {
        let mut t = Thought::new(format!("thought {id}"), ThinkingMode::Linear, vec![], at(secs));
        t.id = id.to_string();
        t
    }

    /// Append a thought linked to `target` and return the updated session.
    fn link(
        mut thoughts: Vec<Thought>,
        mut source: Thought,
        target: &str,
        kind: RelationshipType,
    ) -> Vec<Thought> {
        apply_link(&mut thoughts, &mut source, target, kind).unwrap();
        thoughts.push(source);
        thoughts
    }

    fn linear_chain(len: usize) -> Vec<Thought> {
        let mut thoughts = vec![thought("t1", 100)];
        for i in 2..=len {
            let prev = format!("t{}", i - 1);
            let next = thought(&format!("t{i}"), 100 * i as i64);
            thoughts = link(thoughts, next, &prev, RelationshipType::BuildsOn);
        }
        thoughts
    }

    #[test]
    fn test_self_reference_rejected() {
        let thoughts = vec![thought("a", 100)];
        let err = validate_link(&thoughts, "a", "a", at(100)).unwrap_err();
        assert!(matches!(err, SessionError::SelfReference { .. }));

        // Rejected even when the session is empty.
        let err = validate_link(&[], "b", "b", at(100)).unwrap_err();
        assert!(matches!(err, SessionError::SelfReference { .. }));
    }

    #[test]
    fn test_missing_target_rejected() {
        let thoughts = vec![thought("a", 100)];
        let err = validate_link(&thoughts, "b", "zzz", at(200)).unwrap_err();
        assert!(matches!(err, SessionError::TargetNotFound { .. }));
    }

    #[test]
    fn test_future_reference_rejected() {
        let thoughts = vec![thought("a", 300)];
        let err = validate_link(&thoughts, "b", "a", at(200)).unwrap_err();
        assert!(matches!(err, SessionError::FutureReference { .. }));

        // Equal timestamps are allowed.
        validate_link(&thoughts, "b", "a", at(300)).unwrap();
    }

    #[test]
    fn test_apply_link_keeps_both_sides_consistent() {
        let thoughts = link(
            vec![thought("a", 100)],
            thought("b", 200),
            "a",
            RelationshipType::Supports,
        );

        let a = &thoughts[0];
        let b = &thoughts[1];
        assert_eq!(b.relates_to.as_deref(), Some("a"));
        assert_eq!(b.relationship_type, Some(RelationshipType::Supports));
        assert_eq!(
            b.relationships_out,
            vec![Relationship {
                thought_id: "a".into(),
                relationship_type: RelationshipType::Supports
            }]
        );
        assert_eq!(
            a.relationships_in,
            vec![Relationship {
                thought_id: "b".into(),
                relationship_type: RelationshipType::Supports
            }]
        );
        assert!(a.relationships_out.is_empty());
    }

    #[test]
    fn test_two_step_chain() {
        let thoughts = linear_chain(2);
        let chain = reconstruct_chain("t2", &thoughts, 100);

        let ids: Vec<&str> = chain.chain.iter().map(|e| e.thought_id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(chain.total_length, 2);
        assert!(!chain.truncated);
        assert!(chain.chain.iter().all(|e| !e.is_truncation_marker()));
    }

    #[test]
    fn test_long_chain_is_truncated_to_most_recent() {
        let thoughts = linear_chain(9);
        let chain = reconstruct_chain("t9", &thoughts, 100);

        assert_eq!(chain.chain.len(), 7);
        assert_eq!(chain.total_length, 9);
        assert!(chain.truncated);
        assert_eq!(chain.chain[0].thought_id, "t3");
        assert_eq!(chain.chain[0].omitted_before, Some(2));
        assert!(chain.chain[1..].iter().all(|e| e.omitted_before.is_none()));
        assert_eq!(chain.chain[6].thought_id, "t9");
    }

    #[test]
    fn test_chain_depth_is_capped() {
        let thoughts = linear_chain(30);
        let chain = reconstruct_chain("t30", &thoughts, 100);
        assert_eq!(chain.total_length, MAX_CHAIN_DEPTH);
        assert_eq!(chain.chain.len(), CHAIN_DISPLAY_LEN);
    }

    #[test]
    fn test_chain_ignores_non_builds_on_edges() {
        let thoughts = link(
            vec![thought("a", 100)],
            thought("b", 200),
            "a",
            RelationshipType::Refines,
        );
        let chain = reconstruct_chain("b", &thoughts, 100);
        assert_eq!(chain.total_length, 1);
        assert_eq!(chain.chain[0].thought_id, "b");
    }

    #[test]
    fn test_cycle_guard_terminates() {
        // Hand-built cycle; unreachable through validate_link.
        let mut a = thought("a", 100);
        let mut b = thought("b", 200);
        a.relates_to = Some("b".into());
        a.relationship_type = Some(RelationshipType::BuildsOn);
        b.relates_to = Some("a".into());
        b.relationship_type = Some(RelationshipType::BuildsOn);

        let chain = reconstruct_chain("b", &[a, b], 100);
        assert_eq!(chain.total_length, 2);
    }

    #[test]
    fn test_unknown_start_yields_empty_chain() {
        let chain = reconstruct_chain("nope", &linear_chain(3), 100);
        assert!(chain.chain.is_empty());
        assert_eq!(chain.total_length, 0);
        assert!(!chain.truncated);
    }

    #[test]
    fn test_conflicts_and_supports() {
        let mut thoughts = vec![thought("a", 100)];
        thoughts = link(thoughts, thought("s1", 200), "a", RelationshipType::Supports);
        thoughts = link(thoughts, thought("c1", 300), "a", RelationshipType::Contradicts);
        thoughts = link(thoughts, thought("s2", 400), "a", RelationshipType::Supports);
        thoughts = link(thoughts, thought("x", 500), "s1", RelationshipType::Contradicts);

        let ctx = find_conflicts_and_supports("a", &thoughts, 1, 50);
        assert_eq!(ctx.supports.len(), 1);
        assert_eq!(ctx.supports[0].thought_id, "s1");
        assert_eq!(ctx.contradictions.len(), 1);
        assert_eq!(ctx.contradictions[0].thought_id, "c1");

        let ctx = find_conflicts_and_supports("a", &thoughts, 5, 50);
        assert_eq!(ctx.supports.len(), 2);
        assert_eq!(ctx.contradictions.len(), 1);
    }
}
