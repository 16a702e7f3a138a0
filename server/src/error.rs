use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Uniform failure body returned to clients for every uncaught error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Cross-origin request from an origin outside the allow-list.
    #[error("origin not allowed: {0}")]
    OriginRejected(String),

    /// Failure bubbled up from a feature router.
    #[error("internal error: {0}")]
    Upstream(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Full detail stays server-side; clients get the uniform body.
        tracing::error!(error = %self, "request failed");

        let message = match self {
            AppError::OriginRejected(_) => "origin not allowed".to_string(),
            AppError::Upstream(_) => "internal server error".to_string(),
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { message }),
        )
            .into_response()
    }
}

/// Convert a handler panic into the same uniform failure body, keeping the
/// process alive. Wired in via tower-http's catch-panic layer.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };

    tracing::error!(panic = %detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            message: "internal server error".to_string(),
        }),
    )
        .into_response()
}
