//! REST server configuration, resolved once at startup.

/// Default listen address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default cap on the request body of an upload (64 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// REST server configuration.
#[derive(Clone, Debug)]
pub struct RestConfig {
    addr: String,
    max_upload_bytes: usize,
}

impl RestConfig {
    pub fn new(addr: String, max_upload_bytes: usize) -> Self {
        Self {
            addr,
            max_upload_bytes,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REST_ADDR.into(), DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// Parse the upload size limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MAX_UPLOAD_BYTES`].
///
/// # Errors
///
/// Returns an error if the value is not a positive integer number of bytes.
pub fn upload_limit_from_env_value(value: Option<String>) -> anyhow::Result<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(DEFAULT_MAX_UPLOAD_BYTES);
    };

    let limit: usize = value
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid upload limit '{}': {}", value, e))?;
    if limit == 0 {
        anyhow::bail!("upload limit must be greater than zero");
    }

    Ok(limit)
}
