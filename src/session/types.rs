//! Core thought record definitions.
//!
//! Defines [`ThinkingMode`] (the reasoning style a thought was written in),
//! [`RelationshipType`] (labels for directed edges between thoughts), [`Relationship`]
//! (one edge as seen from one endpoint), and [`Thought`] (the persisted record).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The reasoning style a thought was recorded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingMode {
    /// Step-by-step sequential reasoning.
    #[default]
    Linear,
    /// Divergent, exploratory ideas.
    Creative,
    /// Stress-testing assumptions and looking for flaws.
    Critical,
    /// Goals, trade-offs and long-range planning.
    Strategic,
    /// Stakeholder perspectives and human factors.
    Empathetic,
}

impl ThinkingMode {
    pub const ALL: [ThinkingMode; 5] = [
        Self::Linear,
        Self::Creative,
        Self::Critical,
        Self::Strategic,
        Self::Empathetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Creative => "creative",
            Self::Critical => "critical",
            Self::Strategic => "strategic",
            Self::Empathetic => "empathetic",
        }
    }
}

impl std::fmt::Display for ThinkingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThinkingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "creative" => Ok(Self::Creative),
            "critical" => Ok(Self::Critical),
            "strategic" => Ok(Self::Strategic),
            "empathetic" => Ok(Self::Empathetic),
            _ => Err(format!(
                "unknown mode: {s} (expected one of linear, creative, critical, strategic, empathetic)"
            )),
        }
    }
}

/// Label on a directed edge from a newer thought to an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Extends the target; the only edge followed when rebuilding reasoning chains.
    BuildsOn,
    Supports,
    Contradicts,
    Refines,
    Questions,
    Synthesizes,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuildsOn => "builds_on",
            Self::Supports => "supports",
            Self::Contradicts => "contradicts",
            Self::Refines => "refines",
            Self::Questions => "questions",
            Self::Synthesizes => "synthesizes",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "builds_on" => Ok(Self::BuildsOn),
            "supports" => Ok(Self::Supports),
            "contradicts" => Ok(Self::Contradicts),
            "refines" => Ok(Self::Refines),
            "questions" => Ok(Self::Questions),
            "synthesizes" => Ok(Self::Synthesizes),
            _ => Err(format!("unknown relationship type: {s}")),
        }
    }
}

/// One edge as stored on one of its endpoints. `thought_id` is the *other* endpoint:
/// the target for outbound edges, the source for inbound edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub thought_id: String,
    pub relationship_type: RelationshipType,
}

/// A persisted reasoning record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    /// UUID v7: creation time plus random bits, so ids sort by creation order.
    pub id: String,
    /// The verbatim reasoning text. Never edited after creation.
    pub content: String,
    #[serde(default)]
    pub mode: ThinkingMode,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Primary outbound link, fixed at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relates_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationshipType>,
    #[serde(default)]
    pub relationships_out: Vec<Relationship>,
    /// Edges other thoughts declare toward this one.
    #[serde(default)]
    pub relationships_in: Vec<Relationship>,
}

impl Thought {
    /// Create an unlinked thought stamped with `timestamp`.
    pub fn new(
        content: impl Into<String>,
        mode: ThinkingMode,
        tags: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            content: content.into(),
            mode,
            tags,
            timestamp,
            relates_to: None,
            relationship_type: None,
            relationships_out: Vec::new(),
            relationships_in: Vec::new(),
        }
    }

    /// `true` if this thought declares or receives any edge.
    pub fn has_relationships(&self) -> bool {
        self.relates_to.is_some()
            || !self.relationships_out.is_empty()
            || !self.relationships_in.is_empty()
    }

    /// The predecessor along a `builds_on` edge, if any.
    pub fn builds_on(&self) -> Option<&str> {
        match self.relationship_type {
            Some(RelationshipType::BuildsOn) => self.relates_to.as_deref(),
            _ => None,
        }
    }
}

/// Truncate `content` to at most `max_chars` characters, appending "..." if truncated.
pub fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &content[..end]),
        None => content.to_string(),
    }
}
