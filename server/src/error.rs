//! Error taxonomy for the request path.
//!
//! Every failure maps to a distinct HTTP status; response bodies carry only
//! the status text so no internal state leaks to the caller.

use shortlist_types::RequestError;
use thiserror::Error;
use warp::http::StatusCode;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body decoded but failed structural validation.
    #[error("malformed request: {0}")]
    Malformed(#[from] RequestError),
    /// Presented secret does not match the configured one.
    #[error("secret mismatch")]
    Unauthorized,
    /// Selection outlived the wall-clock deadline and was abandoned.
    #[error("selection exceeded the {deadline_secs}s deadline")]
    Timeout { deadline_secs: f64 },
    /// Selection task panicked or could not be joined.
    #[error("selection task failed: {0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
