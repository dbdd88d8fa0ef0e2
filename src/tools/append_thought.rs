//! MCP `append_thought` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use thoughtlog::error::{SessionError, SessionResult};
use thoughtlog::session::types::{RelationshipType, ThinkingMode};
use thoughtlog::session::AppendThought;

/// Parameters for the `append_thought` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AppendThoughtParams {
    /// The reasoning text. Stored verbatim.
    #[schemars(description = "The reasoning to record. Stored exactly as given.")]
    pub reasoning: String,

    #[schemars(
        description = "Session name in the form 'segment:segment:segment' (e.g. 'thesis:NVDA:ai_dominance'). Omit to start a temporary session that can be renamed later."
    )]
    pub session_name: Option<String>,

    #[schemars(
        description = "Thinking mode: 'linear' (default), 'creative', 'critical', 'strategic', 'empathetic'"
    )]
    pub mode: Option<String>,

    #[schemars(description = "Optional labels for this thought")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "ID of an earlier thought in the same session that this one relates to")]
    pub relates_to: Option<String>,

    #[schemars(
        description = "Relationship to 'relates_to': 'builds_on' (default), 'supports', 'contradicts', 'refines', 'questions', 'synthesizes'"
    )]
    pub relationship_type: Option<String>,
}

impl AppendThoughtParams {
    /// Parse the string-typed fields into an [`AppendThought`].
    pub fn into_args(self) -> SessionResult<AppendThought> {
        let mode = self
            .mode
            .as_deref()
            .map(str::parse::<ThinkingMode>)
            .transpose()
            .map_err(|e| SessionError::invalid_argument("mode", e))?;
        let relationship_type = self
            .relationship_type
            .as_deref()
            .map(str::parse::<RelationshipType>)
            .transpose()
            .map_err(|e| SessionError::invalid_argument("relationship_type", e))?;

        Ok(AppendThought {
            reasoning: self.reasoning,
            session_name: self.session_name,
            mode,
            tags: self.tags.unwrap_or_default(),
            relates_to: self.relates_to,
            relationship_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AppendThoughtParams {
        AppendThoughtParams {
            reasoning: "x".into(),
            session_name: None,
            mode: None,
            tags: None,
            relates_to: None,
            relationship_type: None,
        }
    }

    #[test]
    fn test_defaults() {
        let args = params().into_args().unwrap();
        assert!(args.mode.is_none());
        assert!(args.tags.is_empty());
    }

    #[test]
    fn test_unknown_mode_is_invalid_argument() {
        let mut p = params();
        p.mode = Some("lateral".into());
        let err = p.into_args().unwrap_err();
        assert!(matches!(err, SessionError::InvalidArgument { field: "mode", .. }));
    }

    #[test]
    fn test_relationship_type_parses() {
        let mut p = params();
        p.relates_to = Some("abc".into());
        p.relationship_type = Some("contradicts".into());
        let args = p.into_args().unwrap();
        assert_eq!(args.relationship_type, Some(RelationshipType::Contradicts));
    }
}
