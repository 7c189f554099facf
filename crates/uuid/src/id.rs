//! [`FileId`] implementation.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

use ::uuid::Uuid;

/// Canonical stored-file identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed the contained UUID is guaranteed to render in canonical form, so the
/// identifier can be used directly as a file stem inside the store's namespace.
///
/// # Construction
/// - [`FileId::new`] generates a new identifier (for `add`).
/// - [`FileId::parse`] validates an identifier received from a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl FileId {
    /// Generates a new random identifier.
    ///
    /// Collisions are not checked against existing entries; with 122 random bits the
    /// probability is treated as negligible.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// Hyphenated or uppercase UUID forms are rejected rather than normalised, so that one
    /// stored file has exactly one textual identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "file id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }

        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid file id '{}': {}", input, e)))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: exactly 32 bytes, all of them `0-9` or `a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for FileId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FileId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FileId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_is_canonical() {
        let id = FileId::new();
        assert!(FileId::is_canonical(&id.to_string()));
    }

    #[test]
    fn test_new_ids_are_distinct() {
        let ids: HashSet<FileId> = (0..1000).map(|_| FileId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_parse_valid() {
        let id = FileId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn test_parse_rejects_hyphenated() {
        let result = FileId::parse("550e8400-e29b-41d4-a716-446655440000");
        assert!(matches!(result, Err(UuidError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_rejects_uppercase() {
        assert!(FileId::parse("550E8400E29B41D4A716446655440000").is_err());
    }

    #[test]
    fn test_parse_rejects_path_fragments() {
        assert!(FileId::parse("../../../../etc/passwd").is_err());
        assert!(FileId::parse("550e8400e29b41d4a716446655440000.json").is_err());
        assert!(FileId::parse("").is_err());
    }

    #[test]
    fn test_from_str_matches_parse() {
        let input = "abcdef0123456789abcdef0123456789";
        let a: FileId = input.parse().unwrap();
        let b = FileId::parse(input).unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_plain_string() {
        let id = FileId::parse("0123456789abcdef0123456789abcdef").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0123456789abcdef0123456789abcdef\"");

        let back: FileId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<FileId>("\"not-an-id\"").is_err());
    }
}
