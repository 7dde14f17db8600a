use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::data::AppState;
use crate::error::Result;

pub mod api;
pub mod routes;

/// Built frontend, served for every non-API path when present.
fn static_dir() -> Option<PathBuf> {
    let base = std::env::current_dir().ok()?;
    ["frontend/dist", "dist"]
        .iter()
        .map(|dir| base.join(dir))
        .find(|dir| dir.join("index.html").is_file())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/locations", get(routes::locations))
        .route("/api/aphis-reports", get(routes::aphis_reports))
        .route("/api/inspection-reports", get(routes::inspection_reports))
        .route("/api/filter", get(routes::filter))
        .route("/api/regions", get(routes::regions))
        .route("/api/export.csv", get(routes::export_csv))
        .route("/api/classify", get(routes::classify))
        .with_state(state);

    let router = match static_dir() {
        Some(dist) => {
            tracing::debug!(dir = %dist.display(), "serving static frontend");
            api.fallback_service(ServeDir::new(dist))
        }
        None => api.fallback(routes::not_found),
    };

    router
        .layer(CompressionLayer::new().gzip(true))
        .layer(CorsLayer::very_permissive())
}

pub async fn serve(state: Arc<AppState>, bind_addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "cagemap server listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// Load the datasets and serve until the process is stopped.
pub fn run_server(config: &AppConfig) -> Result<()> {
    let state = AppState::load(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(state, &config.bind_addr))
}
