use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, upload_limit_from_env_value, AppState, RestConfig};
use media_files::{data_dir_from_env_value, renderer_program_from_env_value, StoreConfig};

/// Main entry point for the media service
///
/// Resolves configuration once, then serves the REST API until the process is stopped.
///
/// # Environment Variables
/// - `MEDIA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDIA_DATA_DIR`: Directory for stored files and previews (default: "data")
/// - `MEDIA_RENDERER_BIN`: Program used to render previews (default: "pdftoppm")
/// - `MEDIA_MAX_UPLOAD_BYTES`: Maximum upload body size in bytes (default: 64 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration value is invalid or the data directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("media_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("media_files=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_cfg = RestConfig::new(
        std::env::var("MEDIA_REST_ADDR")
            .unwrap_or_else(|_| api_rest::config::DEFAULT_REST_ADDR.into()),
        upload_limit_from_env_value(std::env::var("MEDIA_MAX_UPLOAD_BYTES").ok())?,
    );

    let store_cfg = Arc::new(StoreConfig::new(
        data_dir_from_env_value(std::env::var("MEDIA_DATA_DIR").ok()),
        renderer_program_from_env_value(std::env::var("MEDIA_RENDERER_BIN").ok()),
    )?);

    // Fail at startup rather than on the first request if the directory is unusable
    store_cfg.open()?;

    tracing::info!("++ Data directory {}", store_cfg.data_dir().display());
    tracing::info!("++ Preview renderer {}", store_cfg.renderer_program());
    tracing::info!("++ Starting media REST on {}", rest_cfg.addr());

    let app = router(AppState::new(store_cfg), &rest_cfg);

    let listener = tokio::net::TcpListener::bind(rest_cfg.addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
