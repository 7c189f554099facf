//! Store configuration.
//!
//! Configuration is resolved once at process startup and passed into request handlers, so that
//! no environment variable is read while a request is being served. The `*_from_env_value`
//! helpers take the raw (optional) value instead of reading the environment themselves.

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_RENDERER_PROGRAM};
use crate::render::{PdftoppmRenderer, Renderer};
use crate::store::FileStore;
use crate::{FilesError, FilesResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Storage configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    data_dir: PathBuf,
    renderer_program: String,
}

impl StoreConfig {
    /// Create a new `StoreConfig`.
    pub fn new(data_dir: PathBuf, renderer_program: String) -> FilesResult<Self> {
        if renderer_program.trim().is_empty() {
            return Err(FilesError::InvalidInput(
                "renderer program cannot be empty".into(),
            ));
        }

        Ok(Self {
            data_dir,
            renderer_program,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn renderer_program(&self) -> &str {
        &self.renderer_program
    }

    /// Builds the production renderer for this configuration.
    pub fn renderer(&self) -> Arc<dyn Renderer> {
        Arc::new(PdftoppmRenderer::new(self.renderer_program.clone()))
    }

    /// Opens a [`FileStore`] on the configured directory with the production renderer.
    pub fn open(&self) -> FilesResult<FileStore> {
        FileStore::new(&self.data_dir, self.renderer())
    }
}

/// Resolve the data directory from an optional value, defaulting to `data`.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Resolve the renderer program from an optional value, defaulting to `pdftoppm`.
pub fn renderer_program_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_RENDERER_PROGRAM.to_string())
}
