use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

// Re-export shared types from mediadrop-types
pub use mediadrop_types::*;

pub mod config;
pub mod error;
pub mod handlers;
pub mod storage;

use config::Config;
use error::{AppError, Result};
use storage::MockStorage;

// Application state shared across all handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: MockStorage,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let storage = MockStorage::new(&config.public_base_url);
        Self { config, storage }
    }
}

pub async fn run_server() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let server_address = config.server_address.clone();
    let static_dir = config.static_dir.clone();
    let limits = config.limits;

    let app = create_app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&server_address)
        .await
        .map_err(|e| {
            AppError::ServerError(format!("Failed to bind to {}: {}", server_address, e))
        })?;

    tracing::info!("🚀 Mediadrop backend server starting on {}", server_address);
    tracing::info!("📁 Serving static files from: {}", static_dir);
    tracing::info!(
        "📏 Limits: {} bytes (video {} bytes), previews below {} bytes",
        limits.max_file_size,
        limits.max_video_size,
        limits.preview_threshold
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::ServerError(format!("Server error: {}", e)))?;

    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = transport_body_limit(&state.config.limits);
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route(
            "/api/upload",
            post(handlers::upload_file)
                .get(handlers::describe_upload)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        // Health check
        .route("/health", get(handlers::health_check))
        // Static file serving for frontend
        .fallback_service(ServeDir::new(static_dir))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

// Largest ceiling plus headroom for multipart framing
fn transport_body_limit(limits: &UploadLimits) -> usize {
    let bytes = limits.largest().saturating_add(MB);
    usize::try_from(bytes).unwrap_or(usize::MAX)
}
