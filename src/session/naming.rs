//! Session name validation and the logical-name ⇄ storage-key mapping.
//!
//! Logical names look like `thesis:NVDA:ai_dominance`. Storage keys replace each colon
//! with a triple underscore (`thesis___NVDA___ai_dominance`). Underscore runs are
//! collapsed before the substitution so a name can never forge the separator.

use regex::Regex;

use crate::error::{SessionError, SessionResult};

/// Separator that stands in for `:` inside storage keys.
pub const KEY_SEPARATOR: &str = "___";

/// Reserved first segment for generated session names.
pub const EPHEMERAL_PREFIX: &str = "TEMP";

const EXPECTED_FORMAT: &str = "segment:segment:segment (letters, digits and '-'; \
     '_' only singly between characters inside a segment)";
const EXAMPLE_NAME: &str = "thesis:NVDA:ai_dominance";

/// Validates logical session names against the configured pattern.
#[derive(Debug, Clone)]
pub struct SessionNamer {
    pattern: Regex,
}

impl SessionNamer {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Return `name` unchanged if it matches the pattern, else `InvalidName`.
    pub fn validate<'a>(&self, name: &'a str) -> SessionResult<&'a str> {
        if self.pattern.is_match(name) {
            Ok(name)
        } else {
            Err(SessionError::InvalidName {
                name: name.to_string(),
                expected: EXPECTED_FORMAT.to_string(),
                example: EXAMPLE_NAME.to_string(),
            })
        }
    }
}

/// Map a validated logical name to its filesystem-safe storage key.
pub fn encode(name: &str) -> String {
    let mut collapsed = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    collapsed
        .replace(':', KEY_SEPARATOR)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Reverse [`encode`] for keys it produced.
pub fn decode(key: &str) -> String {
    key.replace(KEY_SEPARATOR, ":")
}

/// Generate a fresh name in the `TEMP` namespace: `TEMP:<unix-millis>:<random>`.
pub fn ephemeral_name() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!("{EPHEMERAL_PREFIX}:{millis}:{}", &token[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SESSION_PATTERN;

    fn namer() -> SessionNamer {
        SessionNamer::new(DEFAULT_SESSION_PATTERN).unwrap()
    }

    #[test]
    fn test_valid_names_pass() {
        let namer = namer();
        for name in [
            "thesis:NVDA:ai_dominance",
            "a:b:c",
            "research:2025-q1:rate-cuts:fed",
            "TEMP:1:abc",
        ] {
            assert_eq!(namer.validate(name).unwrap(), name);
        }
    }

    #[test]
    fn test_invalid_names_fail() {
        let namer = namer();
        for name in [
            "",
            "one",
            "two:parts",
            "a::c",
            "a:b:",
            "has space:b:c",
            "a/b:c:d",
            "a:b:c:",
            "a___b:c:d",
            "_a:b:c",
        ] {
            let err = namer.validate(name).unwrap_err();
            assert!(
                matches!(err, SessionError::InvalidName { .. }),
                "expected InvalidName for {name:?}"
            );
        }
    }

    #[test]
    fn test_rejection_explains_underscore_rule() {
        let err = namer().validate("a__b:c:d").unwrap_err();
        match err {
            SessionError::InvalidName { expected, .. } => {
                assert!(expected.contains("'_' only singly"), "{expected}");
                assert!(!expected.contains("'-' and '_'"));
            }
            other => panic!("expected InvalidName, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_uses_triple_underscore_separator() {
        assert_eq!(encode("thesis:NVDA:ai_dominance"), "thesis___NVDA___ai_dominance");
    }

    #[test]
    fn test_encode_collapses_underscore_runs() {
        // Without collapsing, "a___b" would decode to "a:b".
        assert_eq!(encode("a___b:c:d"), "a_b___c___d");
    }

    #[test]
    fn test_encode_replaces_unsafe_characters() {
        assert_eq!(encode("a/b:c.d:e"), "a_b___c_d___e");
    }

    #[test]
    fn test_round_trip_for_valid_names() {
        let namer = namer();
        for name in [
            "thesis:NVDA:ai_dominance",
            "x:y:z",
            "deep:nested:session:name_with_parts:v-2",
        ] {
            namer.validate(name).unwrap();
            assert_eq!(decode(&encode(name)), name);
        }
    }

    #[test]
    fn test_ephemeral_names_are_valid_and_unique() {
        let namer = namer();
        let a = ephemeral_name();
        let b = ephemeral_name();
        assert!(a.starts_with("TEMP:"));
        assert_ne!(a, b);
        namer.validate(&a).unwrap();
        namer.validate(&b).unwrap();
    }
}
