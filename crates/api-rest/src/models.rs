//! Request and response bodies of the REST API.

use media_files::FileSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One stored file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct FileSummaryRes {
    /// Identifier assigned at upload (32 lowercase hex characters)
    pub id: String,
    /// Display name taken from the uploaded filename, or the id
    pub name: String,
}

impl From<FileSummary> for FileSummaryRes {
    fn from(summary: FileSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name.to_string(),
        }
    }
}

/// Every stored file, in unspecified order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListFilesRes {
    pub files: Vec<FileSummaryRes>,
}
