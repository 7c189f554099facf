//! File store implementation
//!
//! This module provides [`FileStore`], a stateless façade over one flat directory of records.
//!
//! # Records
//!
//! For every stored file with id `X` the namespace holds:
//!
//! - `X`: the raw content bytes
//! - `X.json`: the metadata record (`{"id": "X", "name": "..."}`)
//! - `X.jpg`: the cached preview, created by the first successful [`FileStore::preview`]
//!
//! A file counts as present only when both `X` and `X.json` exist. Anything else (for example
//! content left behind by an interrupted upload) is treated as absent.
//!
//! # Write protocol
//!
//! Each record is written to a hidden temporary file in the same directory and then renamed
//! over its final name, so readers never observe a half-written record. Content is written
//! before metadata; the metadata rename is what makes a file visible.
//!
//! Two records are still two renames. A crash between them leaves orphaned content that no
//! operation will ever return, and that is never cleaned up. A crash before a rename leaves
//! the hidden `.…partial` temporary file behind; these are ignored by every operation and are
//! not cleaned up either.
//!
//! # Concurrency
//!
//! There is no locking. Concurrent uploads use distinct ids and never touch the same records.
//! Concurrent previews of the same unseen id may both invoke the renderer; each writes its own
//! temporary file and the last rename wins, which is harmless for a deterministic renderer.

use crate::constants::{
    METADATA_EXTENSION, PREVIEW_EXTENSION, TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX,
};
use crate::render::{validate_jpeg, Renderer};
use crate::summary::{DisplayName, FileSummary};
use crate::{FilesError, FilesResult};
use media_uuid::FileId;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Durable store of uploaded files and their previews.
///
/// Cheap to construct: it holds only the namespace path and a handle to the renderer, and
/// re-reads the directory on every call. Callers are expected to build one per request.
#[derive(Clone)]
pub struct FileStore {
    /// Directory holding every record
    root: PathBuf,

    /// Capability used to derive preview images
    renderer: Arc<dyn Renderer>,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl FileStore {
    /// Opens the store rooted at `root`, creating the directory if it is missing.
    ///
    /// Safe to call repeatedly and concurrently for the same root.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidRootDirectory`] if `root` exists but is not a directory, or
    /// if it cannot be created.
    pub fn new(root: &Path, renderer: Arc<dyn Renderer>) -> FilesResult<Self> {
        if root.exists() && !root.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root.display()
            )));
        }

        fs::create_dir_all(root).map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot create directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            renderer,
        })
    }

    /// Returns the directory holding the namespace.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every complete file in the namespace.
    ///
    /// Ordering follows directory enumeration and is unspecified. Metadata records that cannot
    /// be read or parsed, or that have no content record, are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::Read`] only if the namespace directory itself cannot be scanned.
    pub fn list(&self) -> FilesResult<Vec<FileSummary>> {
        let entries = fs::read_dir(&self.root).map_err(|source| FilesError::Read {
            path: self.root.clone(),
            source,
        })?;

        let mut files = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        "failed to read entry in {}, skipping: {}",
                        self.root.display(),
                        e
                    );
                    continue;
                }
            };

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(METADATA_EXTENSION) {
                continue;
            }

            let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| FileId::parse(stem).ok())
            else {
                continue;
            };

            if !self.content_path(&id).is_file() {
                tracing::warn!("metadata without content, skipping: {}", path.display());
                continue;
            }

            match self.load_summary(&path) {
                Ok(summary) if summary.id == id => files.push(summary),
                Ok(summary) => {
                    tracing::warn!(
                        "metadata id {} does not match record {}, skipping",
                        summary.id,
                        path.display()
                    );
                }
                Err(e) => {
                    tracing::warn!("failed to load metadata, skipping: {}", e);
                }
            }
        }

        Ok(files)
    }

    /// Stores `content` under a freshly generated id.
    ///
    /// The stored name is `name` exactly as given when it is non-empty, otherwise the id itself.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::Write`] if either record cannot be written. A failure while
    /// writing metadata leaves the content record behind, invisible to every other operation.
    pub fn add(&self, name: Option<&str>, content: &[u8]) -> FilesResult<FileSummary> {
        let id = FileId::new();
        let summary = FileSummary {
            id,
            name: DisplayName::resolve(name, &id),
        };

        let metadata_path = self.metadata_path(&id);
        let metadata = serde_json::to_vec(&summary).map_err(|source| FilesError::Metadata {
            path: metadata_path.clone(),
            source,
        })?;

        self.write_record(&self.content_path(&id), content)?;
        self.write_record(&metadata_path, &metadata)?;

        tracing::info!(
            "stored file {} ({}, {} bytes)",
            summary.id,
            summary.name,
            content.len()
        );

        Ok(summary)
    }

    /// Returns the location of the content record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] if `id` is not a canonical identifier, or if either the
    /// content record or the metadata record is missing.
    pub fn get(&self, id: &str) -> FilesResult<PathBuf> {
        let id = self.resolve(id)?;
        Ok(self.content_path(&id))
    }

    /// Returns the metadata record of a stored file.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] as for [`Self::get`], or [`FilesError::Read`] /
    /// [`FilesError::Metadata`] if the record cannot be loaded.
    pub fn summary(&self, id: &str) -> FilesResult<FileSummary> {
        let id = self.resolve(id)?;
        self.load_summary(&self.metadata_path(&id))
    }

    /// Reads the content bytes of a stored file.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::NotFound`] as for [`Self::get`], or [`FilesError::Read`] if the
    /// content cannot be read.
    pub fn read(&self, id: &str) -> FilesResult<Vec<u8>> {
        let path = self.get(id)?;
        fs::read(&path).map_err(|source| FilesError::Read { path, source })
    }

    /// Returns the location of the preview image for `id`, rendering it on first use.
    ///
    /// A non-empty preview record is a cache hit and is returned without invoking the
    /// renderer. Otherwise the renderer runs on the content record and its output is validated
    /// and written before the path is returned.
    ///
    /// # Errors
    ///
    /// - [`FilesError::NotFound`] as for [`Self::get`]
    /// - [`FilesError::Render`] if the renderer fails or returns something other than a JPEG;
    ///   nothing is written, so the next call renders again
    /// - [`FilesError::Write`] if the preview record cannot be written
    pub fn preview(&self, id: &str) -> FilesResult<PathBuf> {
        let id = self.resolve(id)?;
        let preview_path = self.preview_path(&id);

        if is_cached(&preview_path) {
            tracing::debug!("preview cache hit for {}", id);
            return Ok(preview_path);
        }

        let image = self
            .renderer
            .render_first_page(&self.content_path(&id))?;
        validate_jpeg(&image)?;

        self.write_record(&preview_path, &image)?;

        tracing::info!("rendered preview for {} ({} bytes)", id, image.len());

        Ok(preview_path)
    }

    /// Parses `id` and checks that the file is fully present.
    fn resolve(&self, id: &str) -> FilesResult<FileId> {
        let not_found = || FilesError::NotFound(format!("File {}", id));

        let file_id = FileId::parse(id).map_err(|_| not_found())?;

        if !self.content_path(&file_id).is_file() || !self.metadata_path(&file_id).is_file() {
            return Err(not_found());
        }

        Ok(file_id)
    }

    fn load_summary(&self, path: &Path) -> FilesResult<FileSummary> {
        let contents = fs::read(path).map_err(|source| FilesError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_slice(&contents).map_err(|source| FilesError::Metadata {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes `bytes` to `target` through a temporary sibling and an atomic rename.
    ///
    /// The temporary file is removed if any step fails.
    fn write_record(&self, target: &Path, bytes: &[u8]) -> FilesResult<()> {
        let write_error = |source: std::io::Error| FilesError::Write {
            path: target.to_path_buf(),
            source,
        };

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(TEMP_FILE_SUFFIX)
            .tempfile_in(&self.root)
            .map_err(write_error)?;

        temp.write_all(bytes).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;
        temp.persist(target).map_err(|e| write_error(e.error))?;

        Ok(())
    }

    fn content_path(&self, id: &FileId) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn metadata_path(&self, id: &FileId) -> PathBuf {
        self.root.join(format!("{}.{}", id, METADATA_EXTENSION))
    }

    fn preview_path(&self, id: &FileId) -> PathBuf {
        self.root.join(format!("{}.{}", id, PREVIEW_EXTENSION))
    }
}

/// A preview counts as cached only if it is a non-empty regular file.
fn is_cached(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
