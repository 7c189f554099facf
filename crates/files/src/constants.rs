//! Path and naming constants for the on-disk namespace.

/// Default directory for stored files when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default external program used to rasterise the first page of a document.
pub const DEFAULT_RENDERER_PROGRAM: &str = "pdftoppm";

/// Extension of the metadata record stored next to each content record.
pub(crate) const METADATA_EXTENSION: &str = "json";

/// Extension of the cached preview image.
pub(crate) const PREVIEW_EXTENSION: &str = "jpg";

/// Temporary records are hidden and carry a suffix no scan ever matches.
pub(crate) const TEMP_FILE_PREFIX: &str = ".";
pub(crate) const TEMP_FILE_SUFFIX: &str = ".partial";
