//! Identity names and records.
//!
//! Names double as storage keys (one reference image file per name) and as
//! the first field of ledger rows, so they are restricted to a charset that
//! is safe in both places.

use serde::Serialize;
use thiserror::Error;

const MAX_NAME_BYTES: usize = 64;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NameError {
    #[error("identity name is empty")]
    Empty,
    #[error("identity name exceeds {MAX_NAME_BYTES} bytes")]
    TooLong,
    #[error("identity name contains {0:?}; allowed characters are A-Z a-z 0-9 '_' '-'")]
    InvalidChar(char),
}

/// Validated identity name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IdentityName(String);

impl IdentityName {
    /// Validate a raw name: non-empty, at most 64 bytes, ASCII
    /// alphanumerics plus `_` and `-` only.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        if raw.is_empty() {
            return Err(NameError::Empty);
        }
        if raw.len() > MAX_NAME_BYTES {
            return Err(NameError::TooLong);
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(NameError::InvalidChar(bad));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for IdentityName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A registered person: validated name plus one reference image.
#[derive(Clone)]
pub struct Identity {
    pub name: IdentityName,
    pub reference: image::GrayImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_plain_names() {
        for raw in ["alice", "Bob", "team-7", "a_b_c", "x"] {
            let name = IdentityName::parse(raw).unwrap();
            assert_eq!(name.as_str(), raw);
        }
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(IdentityName::parse(""), Err(NameError::Empty));
    }

    #[test]
    fn test_parse_rejects_oversized() {
        let raw = "a".repeat(MAX_NAME_BYTES + 1);
        assert_eq!(IdentityName::parse(&raw), Err(NameError::TooLong));
    }

    #[test]
    fn test_parse_accepts_max_length() {
        let raw = "a".repeat(MAX_NAME_BYTES);
        assert!(IdentityName::parse(&raw).is_ok());
    }

    #[test]
    fn test_parse_rejects_separator_chars() {
        // Comma would break ledger rows, slashes and dots would escape the
        // registry directory.
        for raw in ["a,b", "a/b", "a\\b", "..", "a.png", "a b"] {
            assert!(
                matches!(IdentityName::parse(raw), Err(NameError::InvalidChar(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_ascii() {
        assert!(matches!(
            IdentityName::parse("bjørn"),
            Err(NameError::InvalidChar('ø'))
        ));
    }

    #[test]
    fn test_from_str_round_trip() {
        let name: IdentityName = "carol".parse().unwrap();
        assert_eq!(name.to_string(), "carol");
    }
}
