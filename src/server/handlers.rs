// ABOUTME: Request handlers for the build endpoints.
// ABOUTME: Runs are spawned so a dropped connection cannot stop a stage midway.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::Value;

use super::error::ApiResult;
use crate::pipeline::{CreateRequest, Pipeline, RemoveRequest, RestartRequest};

/// Success body shared by every build endpoint.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub image: String,
}

impl ImageResponse {
    fn new(image: impl ToString) -> Json<Self> {
        Json(Self {
            image: image.to_string(),
        })
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// POST /build
pub async fn create_build(
    State(pipeline): State<Arc<Pipeline>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ImageResponse>> {
    let Json(body) = body?;
    tracing::debug!("create request: {}", body);

    let request = CreateRequest::from_json(&body)?;
    let image = tokio::spawn(async move { pipeline.create(&request).await }).await??;
    Ok(ImageResponse::new(image))
}

/// PATCH /build/{name}
pub async fn restart_build(
    State(pipeline): State<Arc<Pipeline>>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ImageResponse>> {
    let Json(body) = body?;
    tracing::debug!("restart request for {}: {}", name, body);

    let request = RestartRequest::from_json(&name, &body)?;
    let image = tokio::spawn(async move { pipeline.restart(&request).await }).await??;
    Ok(ImageResponse::new(image))
}

/// DELETE /build/{name}
pub async fn delete_build(
    State(pipeline): State<Arc<Pipeline>>,
    Path(name): Path<String>,
) -> ApiResult<Json<ImageResponse>> {
    tracing::debug!("delete request for {}", name);

    let request = RemoveRequest::new(&name)?;
    let removed = tokio::spawn(async move { pipeline.remove(&request).await }).await??;
    Ok(ImageResponse::new(removed))
}
