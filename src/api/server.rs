//! Import API server implementation
//!
//! HTTP REST API server using Axum. Serves the workbook import endpoint,
//! the template download and health/version info.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::core::{ImportConfig, WorkbookImporter};
use crate::store::SqliteStore;

/// Room left in the request body limit for multipart framing, so an
/// oversized file reaches the importer and gets a proper size error.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// API Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub import: ImportConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite://attendance.db".to_string(),
            import: ImportConfig::default(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub importer: WorkbookImporter<SqliteStore>,
}

impl AppState {
    pub fn new(store: SqliteStore, import: ImportConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            importer: WorkbookImporter::new(store).with_config(import),
        }
    }
}

/// Build the router with all endpoints and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.importer.config().max_upload_bytes + MULTIPART_OVERHEAD;

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Import endpoints
        .route("/api/import-excel", post(handlers::import_excel))
        .route("/api/download-template", get(handlers::download_template))
        // State and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    let store = SqliteStore::connect(&config.database_url).await?;
    let state = Arc::new(AppState::new(store, config.import));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Attendance import server starting on http://{}", addr);
    info!("   Endpoints: /api/import-excel, /api/download-template");
    info!("   Health: /health, /api/health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Attendance import server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
