//! Typed errors and response mapping.

use crate::response::{error_response, ApiResponse};
use thiserror::Error;

/// Composition-time failures. Any of these aborts synthesis of the whole app.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No {subsystem} configuration found for stage: {stage}")]
    StageNotFound { subsystem: &'static str, stage: String },
    #[error("validation: {0}")]
    Validation(String),
    #[error("missing handle: {0} must be composed first")]
    MissingHandle(&'static str),
}

/// Item store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("backend: {0}")]
    Backend(String),
    #[error("conversion: {0}")]
    Conversion(String),
}

/// Request-time failures of the items handler.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// Map to the wire response. Store failures never leak their detail.
    pub fn into_response(self) -> ApiResponse {
        match self {
            AppError::BadRequest(message) => error_response(400, &message),
            AppError::MethodNotAllowed(_) => error_response(405, "Method not allowed"),
            AppError::Store(e) => {
                tracing::error!(error = %e, "request failed");
                error_response(500, "Internal server error")
            }
        }
    }
}
