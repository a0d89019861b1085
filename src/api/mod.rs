//! JSON API over the yield engine.
//!
//! Provides read-only GET endpoints:
//! - `/regions`: region names and yearly irradiation stats
//! - `/regions/{name}/hourly?month=M`: one representative day
//! - `/regions/{name}/monthly`: twelve simulated months
//! - `/regions/{name}/proportional`: PR-proportional yield
//! - `/regions/{name}/summary`: IEC 61724-1 metrics of the monthly run

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use log::info;

use crate::climate::record::ClimateStore;
use crate::model::engine::YieldEngine;

/// Immutable application state shared across all request handlers.
///
/// Holds one climate snapshot; a new snapshot means a new state. No locks
/// are needed since all data is read-only.
pub struct AppState {
    /// Engine configured with the plant's panel parameters.
    pub engine: YieldEngine,
    /// Climate snapshot served by this instance.
    pub store: ClimateStore,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/regions", get(handlers::get_regions))
        .route("/regions/{name}/hourly", get(handlers::get_hourly))
        .route("/regions/{name}/monthly", get(handlers::get_monthly))
        .route("/regions/{name}/proportional", get(handlers::get_proportional))
        .route("/regions/{name}/summary", get(handlers::get_summary))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
