//! Media file storage
//!
//! This crate provides the storage and preview subsystem of the media service: uploaded files
//! are persisted under generated identifiers, listed, looked up, and rendered to a cached JPEG
//! preview on demand.
//!
//! ## Design Principles
//!
//! - Identifiers are generated by the store, never supplied by clients
//! - Content bytes are immutable once written
//! - A file is either fully present (content + metadata) or absent
//! - Previews are derived lazily, written once, and reused forever
//! - The store holds no in-memory state; every call reads the namespace afresh
//!
//! ## Storage Model
//!
//! All records live side by side in one flat directory, keyed by the file's id:
//!
//! ```text
//! <data_dir>/
//! ├── 550e8400e29b41d4a716446655440000        # content bytes
//! ├── 550e8400e29b41d4a716446655440000.json   # {"id": "...", "name": "..."}
//! └── 550e8400e29b41d4a716446655440000.jpg    # preview, once generated
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use media_files::{FileStore, PdftoppmRenderer};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::new(Path::new("data"), Arc::new(PdftoppmRenderer::default()))?;
//! let file = store.add(Some("report.pdf"), b"%PDF-1.7 ...")?;
//! let preview = store.preview(&file.id.to_string())?;
//! # Ok(())
//! # }
//! ```

mod config;
mod constants;
mod render;
mod store;
mod summary;

pub use config::{data_dir_from_env_value, renderer_program_from_env_value, StoreConfig};
pub use constants::{DEFAULT_DATA_DIR, DEFAULT_RENDERER_PROGRAM};
pub use media_uuid::FileId;
pub use render::{PdftoppmRenderer, RenderError, Renderer};
pub use store::FileStore;
pub use summary::{DisplayName, FileSummary};

use std::path::PathBuf;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Root directory is not a directory or could not be created
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// Configuration value rejected at startup
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No complete record (content and metadata) exists for the requested id
    #[error("File not found: {0}")]
    NotFound(String),

    /// The storage medium rejected a write (disk full, permission denied)
    #[error("Failed to write {path}: {source}", path = path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage medium rejected a read or directory scan
    #[error("Failed to read {path}: {source}", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A metadata record could not be encoded or decoded
    #[error("Invalid metadata record {path}: {source}", path = path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The preview renderer failed or produced unusable output
    #[error("Preview rendering failed: {0}")]
    Render(#[from] RenderError),
}

pub type FilesResult<T> = std::result::Result<T, FilesError>;
