//! Error types for the web service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use submarine_payreq::PayReqError;
use thiserror::Error;

/// Web service error type
#[derive(Error, Debug)]
pub enum WebError {
    /// Script or address construction failed
    #[error("payment request error: {0}")]
    PayReq(#[from] PayReqError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the web service
pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
