// ABOUTME: HTTP front end exposing the pipelines as build endpoints.
// ABOUTME: One route per pipeline plus a health check, traced with tower-http.

mod error;
mod handlers;

pub use error::{ApiError, ApiResult};
pub use handlers::ImageResponse;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::pipeline::Pipeline;

/// Create the router with all endpoints.
pub fn create_router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/build", post(handlers::create_build))
        .route(
            "/build/{name}",
            patch(handlers::restart_build).delete(handlers::delete_build),
        )
        .with_state(pipeline)
        .layer(TraceLayer::new_for_http())
}

/// Serve until the process is interrupted.
pub async fn serve(pipeline: Arc<Pipeline>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
