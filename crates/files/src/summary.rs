//! Metadata record types.

use media_uuid::FileId;

/// A display name, kept exactly as supplied.
///
/// Names are purely descriptive: they carry no uniqueness constraint and are never used to
/// build paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a `DisplayName`, returning `None` if the input is empty.
    pub fn new(input: impl AsRef<str>) -> Option<Self> {
        let input = input.as_ref();
        if input.is_empty() {
            return None;
        }
        Some(Self(input.to_owned()))
    }

    /// Resolves the name stored for a new upload.
    ///
    /// The client-supplied name wins when it is non-empty; otherwise the file's own id is used.
    pub fn resolve(supplied: Option<&str>, id: &FileId) -> Self {
        supplied
            .and_then(Self::new)
            .unwrap_or_else(|| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for DisplayName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for DisplayName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <String as serde::Deserialize>::deserialize(deserializer).map(Self)
    }
}

/// Summary of one stored file: its identifier and display name.
///
/// This is also the exact shape of the `<id>.json` metadata record on disk.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileSummary {
    pub id: FileId,
    pub name: DisplayName,
}
