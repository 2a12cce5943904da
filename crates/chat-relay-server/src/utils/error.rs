use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use std::time::Duration;
use thiserror::Error;

use crate::config::prompts::GENERIC_FAILURE_ERROR;

/// Failure talking to a model backend. Never shown to the client verbatim.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{backend}: missing credential")]
    MissingCredential { backend: &'static str },

    #[error("{backend}: request failed: {message}")]
    Transport { backend: &'static str, message: String },

    #[error("{backend}: no response within {timeout:?}")]
    Timeout { backend: &'static str, timeout: Duration },

    #[error("{backend}: upstream returned {status} - {body}")]
    Status { backend: &'static str, status: u16, body: String },

    #[error("{backend}: malformed response: {message}")]
    Malformed { backend: &'static str, message: String },
}

impl GatewayError {
    /// Short machine-friendly kind used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MissingCredential { .. } => "missing_credential",
            GatewayError::Transport { .. } => "transport",
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::Status { .. } => "status",
            GatewayError::Malformed { .. } => "malformed",
        }
    }

    /// Classify a reqwest failure, keeping timeouts distinguishable.
    pub fn from_reqwest(backend: &'static str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout { backend, timeout }
        } else if err.is_decode() {
            GatewayError::Malformed { backend, message: err.to_string() }
        } else {
            GatewayError::Transport { backend, message: err.to_string() }
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Gateway(err) => {
                tracing::error!(kind = err.kind(), "Gateway error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_ERROR.to_string())
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_ERROR.to_string())
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Response for a handler that panicked: the same JSON body as any other
/// internal failure, so clients can always parse the reply.
pub fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::InternalError("handler panicked".to_string()).into_response()
}
