//! Stored-file identifiers.
//!
//! Every uploaded file is referenced by an identifier generated by the store at creation time.
//! The identifier doubles as the base name of the file's records on disk, so it must be safe to
//! join onto a directory path and stable in its textual form.
//!
//! The canonical representation is **32 lowercase hexadecimal characters** (no hyphens), the
//! same value produced by `Uuid::new_v4().simple().to_string()`.
//!
//! - [`FileId::new`] allocates a fresh random identifier (UUID version 4, 122 random bits).
//! - [`FileId::parse`] validates an externally supplied identifier and rejects anything that is
//!   not already canonical (uppercase, hyphenated, wrong length, non-hex, path fragments).
//!
//! Because parsing is strict, a parsed `FileId` can never contain a path separator or `..`.

mod id;

pub use id::FileId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
