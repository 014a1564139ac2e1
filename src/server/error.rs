// ABOUTME: Maps request and pipeline failures onto HTTP responses.
// ABOUTME: Every error body is `{"err": message}` with the error's own text.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::Error;
use crate::pipeline::{PipelineError, RequestError};

#[derive(Debug)]
pub enum ApiError {
    /// Rejected before any pipeline stage ran.
    BadRequest(String),
    Pipeline(PipelineError),
    /// The spawned run panicked or was aborted.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("{}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Pipeline(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Error::from(err).to_string(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("{}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "err": message }))).into_response()
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::BadRequest(Error::from(err).to_string())
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Bad request: {}", rejection.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("pipeline run did not finish: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
