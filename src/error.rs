//! Error types shared by the gateway, the upstream client and sessions.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

/// Ways the answering service can fail a forwarded query. None of these ever
/// reach a visitor; the gateway turns all of them into a fallback answer.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("answering service unreachable: {0}")]
    Transport(String),
    #[error("answering service timed out")]
    Timeout,
    #[error("answering service returned status {0}")]
    Status(u16),
    #[error("answering service returned a malformed body: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Timeout => "timeout",
            UpstreamError::Status(_) => "status",
            UpstreamError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// The only errors the gateway surfaces to its caller.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Network-level failure between a session and the gateway.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("gateway unreachable: {0}")]
    Unreachable(String),
    #[error("gateway returned status {0}")]
    Status(u16),
    #[error("gateway returned an unreadable body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Body(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Unreachable(err.to_string())
        }
    }
}
