//! Route handlers.
//!
//! Store operations are blocking filesystem calls (and, for previews, an external process), so
//! every handler runs its operation on tokio's blocking pool. Each operation opens a fresh
//! [`FileStore`] over the configured directory; no state is shared between requests other than
//! the directory itself.

use axum::{
    extract::{Multipart, Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use media_files::{FileStore, FilesError, FilesResult};

use crate::models::{FileSummaryRes, HealthRes, ListFilesRes};
use crate::AppState;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

type ApiError = (StatusCode, &'static str);

/// Runs `op` against a freshly opened store on the blocking pool.
async fn run_store<T, F>(state: &AppState, operation: &'static str, op: F) -> Result<T, ApiError>
where
    F: FnOnce(FileStore) -> FilesResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || state.store().and_then(op))
        .await
        .map_err(|e| {
            tracing::error!("{} task failed: {:?}", operation, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })?
        .map_err(|e| error_response(operation, e))
}

/// Maps a store error to a status code; details are logged, never returned to the client.
fn error_response(operation: &str, err: FilesError) -> ApiError {
    match err {
        FilesError::NotFound(msg) => {
            tracing::debug!("{} not found: {}", operation, msg);
            (StatusCode::NOT_FOUND, "File not found")
        }
        FilesError::Render(e) => {
            tracing::error!("{} render error: {:?}", operation, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Preview rendering failed")
        }
        e => {
            tracing::error!("{} error: {:?}", operation, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Media service is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Every stored file", body = ListFilesRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List all stored files
///
/// Ordering is unspecified and may change between calls.
///
/// # Errors
/// Returns `500 Internal Server Error` if the data directory cannot be scanned.
#[axum::debug_handler]
pub async fn list_files(State(state): State<AppState>) -> Result<Json<ListFilesRes>, ApiError> {
    let files = run_store(&state, "list", |store| store.list()).await?;

    Ok(Json(ListFilesRes {
        files: files.into_iter().map(FileSummaryRes::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/upload/",
    responses(
        (status = 200, description = "File stored", body = FileSummaryRes),
        (status = 400, description = "Missing or malformed `file` field"),
        (status = 413, description = "Upload exceeds the configured limit"),
        (status = 500, description = "Internal server error")
    )
)]
/// Upload a file
///
/// Expects a `multipart/form-data` body with a `file` field. The field's filename becomes the
/// display name; without one the generated id is used.
///
/// # Errors
/// - `400 Bad Request` if the body is not valid multipart or has no `file` field
/// - `500 Internal Server Error` if the file cannot be written
#[axum::debug_handler]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FileSummaryRes>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Invalid multipart body: {:?}", e);
        (e.status(), "Invalid multipart body")
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload: {:?}", e);
            (e.status(), "Failed to read upload")
        })?;

        upload = Some((file_name, bytes));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return Err((StatusCode::BAD_REQUEST, "Missing 'file' field"));
    };

    let summary = run_store(&state, "upload", move |store| {
        store.add(file_name.as_deref(), &bytes)
    })
    .await?;

    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/preview/{file}",
    params(
        ("file" = String, Path, description = "File id followed by `.jpg`")
    ),
    responses(
        (status = 200, description = "JPEG preview of the first page (image/jpeg)"),
        (status = 404, description = "No such file"),
        (status = 500, description = "Rendering or storage failure")
    )
)]
/// Preview of a stored document
///
/// Renders the first page on the first request and serves the cached image afterwards.
///
/// # Errors
/// - `404 Not Found` if the id is unknown or the path does not end in `.jpg`
/// - `500 Internal Server Error` if rendering fails or the preview cannot be stored
#[axum::debug_handler]
pub async fn preview(
    State(state): State<AppState>,
    AxumPath(file): AxumPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(id) = file.strip_suffix(".jpg").map(str::to_owned) else {
        return Err((StatusCode::NOT_FOUND, "File not found"));
    };

    let image = run_store(&state, "preview", move |store| {
        let path = store.preview(&id)?;
        std::fs::read(&path).map_err(|source| FilesError::Read { path, source })
    })
    .await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], image))
}

#[utoipa::path(
    get,
    path = "/files/{id}",
    params(
        ("id" = String, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "Original file content (application/octet-stream)"),
        (status = 404, description = "No such file"),
        (status = 500, description = "Internal server error")
    )
)]
/// Download the original content of a stored file
///
/// # Errors
/// - `404 Not Found` if the id is unknown
/// - `500 Internal Server Error` if the records cannot be read
#[axum::debug_handler]
pub async fn download(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (summary, content) = run_store(&state, "download", move |store| {
        let summary = store.summary(&id)?;
        let content = store.read(&id)?;
        Ok((summary, content))
    })
    .await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_file_name(summary.name.as_str())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    ))
}

/// Replaces characters that would break a quoted `Content-Disposition` filename.
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
