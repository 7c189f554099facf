//! Preview rendering.
//!
//! A [`Renderer`] turns the first page of a stored document into a single JPEG. The store only
//! depends on the trait; [`PdftoppmRenderer`] is the production implementation and shells out
//! to poppler's `pdftoppm`.

use crate::constants::DEFAULT_RENDERER_PROGRAM;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Errors raised while producing a preview image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer program could not be started (missing binary, not executable)
    #[error("failed to run renderer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran but exited unsuccessfully (unsupported or corrupt input)
    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    /// The renderer succeeded but its output is not a usable JPEG
    #[error("renderer produced invalid output: {0}")]
    InvalidOutput(String),
}

/// Converts the first page of a document into a raster image.
///
/// Implementations must be deterministic for identical input bytes: concurrent previews of the
/// same file may render more than once and the last write wins.
pub trait Renderer: Send + Sync {
    /// Renders the first page of the document at `source` and returns the image bytes.
    fn render_first_page(&self, source: &Path) -> Result<Vec<u8>, RenderError>;
}

/// Renderer backed by the `pdftoppm` command-line tool.
///
/// Runs `<program> -jpeg -f 1 -l 1 <source>` and captures the JPEG written to stdout.
#[derive(Debug, Clone)]
pub struct PdftoppmRenderer {
    program: String,
}

impl PdftoppmRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for PdftoppmRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER_PROGRAM)
    }
}

impl Renderer for PdftoppmRenderer {
    fn render_first_page(&self, source: &Path) -> Result<Vec<u8>, RenderError> {
        let output = Command::new(&self.program)
            .args(["-jpeg", "-f", "1", "-l", "1"])
            .arg(source)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

/// Checks that rendered bytes are a non-empty JPEG.
///
/// Anything else must never reach the preview record, or it would be served as a cache hit.
pub(crate) fn validate_jpeg(image: &[u8]) -> Result<(), RenderError> {
    if image.is_empty() {
        return Err(RenderError::InvalidOutput("empty output".into()));
    }

    if !infer::image::is_jpeg(image) {
        let detected = infer::get(image)
            .map(|kind| kind.mime_type())
            .unwrap_or("unknown");
        return Err(RenderError::InvalidOutput(format!(
            "expected image/jpeg, got {}",
            detected
        )));
    }

    Ok(())
}
