//! Failure taxonomy for session operations.
//!
//! [`SessionError`] is returned by every core operation. At the tool boundary it is
//! flattened into an [`ErrorPayload`] (`kind` + `message`) so callers get a structured
//! failure instead of a transport error.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the naming, storage, relationship and search layers.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session name '{name}': expected {expected} (e.g. {example})")]
    InvalidName {
        name: String,
        expected: String,
        example: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("thought {thought_id} cannot relate to itself")]
    SelfReference { thought_id: String },

    #[error("related thought not found in session: {target_id}")]
    TargetNotFound { target_id: String },

    #[error("thought {target_id} was created after the new thought and cannot be referenced")]
    FutureReference { target_id: String },

    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("storage I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt session record at {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The serializable kind of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidName,
    NotFound,
    SelfReference,
    TargetNotFound,
    FutureReference,
    InvalidArgument,
    StorageFailure,
}

/// Structured failure returned to tool callers.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub success: bool,
    pub kind: ErrorKind,
    pub message: String,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::SelfReference { .. } => ErrorKind::SelfReference,
            Self::TargetNotFound { .. } => ErrorKind::TargetNotFound,
            Self::FutureReference { .. } => ErrorKind::FutureReference,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Io { .. } | Self::Corrupt { .. } => ErrorKind::StorageFailure,
        }
    }

    pub fn session_not_found(name: &str) -> Self {
        Self::NotFound {
            entity: "session",
            id: name.to_string(),
        }
    }

    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            success: false,
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_message_includes_format_and_example() {
        let err = SessionError::InvalidName {
            name: "bad".into(),
            expected: "segment:segment:segment".into(),
            example: "thesis:NVDA:ai_dominance".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("segment:segment:segment"));
        assert!(msg.contains("thesis:NVDA:ai_dominance"));
        assert_eq!(err.kind(), ErrorKind::InvalidName);
    }

    #[test]
    fn test_storage_errors_share_kind() {
        let io = SessionError::io(
            "/tmp/x.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(io.kind(), ErrorKind::StorageFailure);

        let parse_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let corrupt = SessionError::Corrupt {
            path: "/tmp/x.json".into(),
            source: parse_err,
        };
        assert_eq!(corrupt.kind(), ErrorKind::StorageFailure);
    }

    #[test]
    fn test_payload_serializes_kind_snake_case() {
        let payload = SessionError::session_not_found("a:b:c").to_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "not_found");
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "session not found: a:b:c");
    }
}
