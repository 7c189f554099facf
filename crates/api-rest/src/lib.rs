//! # API REST
//!
//! REST API for the media service.
//!
//! Handles:
//! - HTTP endpoints with axum (listing, upload, preview, download)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (multipart parsing, status mapping, CORS, body limits)
//!
//! Storage and preview rendering live in `media-files`; this crate only translates between HTTP
//! and [`FileStore`] calls.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod handlers;
pub mod models;

pub use config::{upload_limit_from_env_value, RestConfig};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use media_files::{FileStore, FilesResult, Renderer, StoreConfig};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
///
/// Holds configuration and the renderer capability only. Handlers open a new [`FileStore`] per
/// request from it, so the durable directory is the only shared state.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<StoreConfig>,
    renderer: Arc<dyn Renderer>,
}

impl AppState {
    /// State using the renderer described by `cfg`.
    pub fn new(cfg: Arc<StoreConfig>) -> Self {
        let renderer = cfg.renderer();
        Self { cfg, renderer }
    }

    /// State with an explicitly supplied renderer.
    pub fn with_renderer(cfg: Arc<StoreConfig>, renderer: Arc<dyn Renderer>) -> Self {
        Self { cfg, renderer }
    }

    /// Opens the store for one request.
    pub(crate) fn store(&self) -> FilesResult<FileStore> {
        FileStore::new(self.cfg.data_dir(), self.renderer.clone())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_files,
        handlers::upload,
        handlers::preview,
        handlers::download,
    ),
    components(schemas(models::HealthRes, models::FileSummaryRes, models::ListFilesRes))
)]
pub struct ApiDoc;

/// Builds the application router.
///
/// Routes:
/// - `GET /health`
/// - `GET /` list stored files
/// - `POST /upload/` multipart upload (`file` field)
/// - `GET /preview/{id}.jpg` first-page preview
/// - `GET /files/{id}` original content
/// - `GET /swagger-ui` API documentation
pub fn router(state: AppState, rest: &RestConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::list_files))
        .route("/upload/", post(handlers::upload))
        .route("/preview/:file", get(handlers::preview))
        .route("/files/:id", get(handlers::download))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(rest.max_upload_bytes()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileSummaryRes, HealthRes, ListFilesRes};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use media_files::RenderError;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "media-test-boundary";

    /// Renderer returning a JPEG-looking payload derived from the input
    #[derive(Default)]
    struct StubRenderer {
        calls: AtomicUsize,
    }

    impl Renderer for StubRenderer {
        fn render_first_page(&self, source: &Path) -> Result<Vec<u8>, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut image = vec![0xFF, 0xD8, 0xFF, 0xE0];
            image.extend(std::fs::read(source).map_err(|e| RenderError::InvalidOutput(e.to_string()))?);
            Ok(image)
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render_first_page(&self, _source: &Path) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::InvalidOutput("corrupt document".into()))
        }
    }

    fn test_app(temp: &TempDir, renderer: Arc<dyn Renderer>, max_upload_bytes: usize) -> Router {
        let cfg = StoreConfig::new(temp.path().join("data"), "pdftoppm".into()).unwrap();
        let state = AppState::with_renderer(Arc::new(cfg), renderer);
        router(state, &RestConfig::new("127.0.0.1:0".into(), max_upload_bytes))
    }

    fn multipart_body(field: &str, file_name: Option<&str>, content: &[u8]) -> Vec<u8> {
        let disposition = match file_name {
            Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
            None => format!("form-data; name=\"{}\"", field),
        };

        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: {}\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, disposition
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn upload(app: &Router, file_name: Option<&str>, content: &[u8]) -> FileSummaryRes {
        let response = app
            .clone()
            .oneshot(upload_request(multipart_body("file", file_name, content)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(StubRenderer::default()), 1024);

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthRes = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(health.ok);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(StubRenderer::default()), 1024);

        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let list: ListFilesRes = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(list.files.is_empty());
    }

    #[tokio::test]
    async fn test_upload_then_list() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(StubRenderer::default()), 1024 * 1024);

        let first = upload(&app, Some("report.pdf"), b"%PDF-1.7 report").await;
        let second = upload(&app, None, b"no filename").await;

        assert_eq!(first.name, "report.pdf");
        assert_eq!(second.name, second.id);
        assert_ne!(first.id, second.id);

        let response = app.oneshot(get_request("/")).await.unwrap();
        let list: ListFilesRes = serde_json::from_slice(&body_bytes(response).await).unwrap();

        let listed: HashSet<FileSummaryRes> = list.files.into_iter().collect();
        let expected: HashSet<FileSummaryRes> = [first, second].into_iter().collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(StubRenderer::default()), 1024);

        let response = app
            .oneshot(upload_request(multipart_body("other", Some("a.pdf"), b"data")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(StubRenderer::default()), 64);

        let response = app
            .clone()
            .oneshot(upload_request(multipart_body("file", Some("big.pdf"), &[0u8; 4096])))
            .await
            .unwrap();

        assert!(response.status().is_client_error());

        let response = app.oneshot(get_request("/")).await.unwrap();
        let list: ListFilesRes = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(list.files.is_empty());
    }

    #[tokio::test]
    async fn test_preview_renders_once() {
        let temp = TempDir::new().unwrap();
        let renderer = Arc::new(StubRenderer::default());
        let app = test_app(&temp, renderer.clone(), 1024 * 1024);

        let file = upload(&app, Some("report.pdf"), b"%PDF-1.7 one page").await;
        let uri = format!("/preview/{}.jpg", file.id);

        let first = app.clone().oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[header::CONTENT_TYPE], "image/jpeg");
        let first = body_bytes(first).await;

        let second = body_bytes(app.oneshot(get_request(&uri)).await.unwrap()).await;

        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_preview_not_found() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(StubRenderer::default()), 1024);

        for uri in [
            "/preview/nonexistent-id.jpg",
            "/preview/abcdef1234567890abcdef1234567890.jpg",
        ] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_preview_requires_jpg_suffix() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(StubRenderer::default()), 1024 * 1024);

        let file = upload(&app, Some("report.pdf"), b"%PDF").await;

        let response = app
            .oneshot(get_request(&format!("/preview/{}", file.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_render_failure_is_server_error() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(FailingRenderer), 1024 * 1024);

        let file = upload(&app, Some("broken.pdf"), b"not a pdf").await;

        let response = app
            .oneshot(get_request(&format!("/preview/{}.jpg", file.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_download_returns_original_content() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Arc::new(StubRenderer::default()), 1024 * 1024);

        let content: Vec<u8> = (0..=255).collect();
        let file = upload(&app, Some("bytes.bin"), &content).await;

        let response = app
            .clone()
            .oneshot(get_request(&format!("/files/{}", file.id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"bytes.bin\""
        );
        assert_eq!(body_bytes(response).await, content);

        let missing = app.oneshot(get_request("/files/nonexistent-id")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
