use reqwest::StatusCode;
use thiserror::Error;

/// What a console call can come back with.  The serving side keeps 401,
/// 403 and 500 strictly apart, so the caller can always tell "sign in
/// again" from "not allowed" from "try later".
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// The one place a transport status plus the server's `detail` line
    /// becomes a typed failure.
    pub(crate) fn from_status(status: StatusCode, detail: String) -> Self {
        match status.as_u16() {
            400 => ClientError::Validation(detail),
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden(detail),
            404 => ClientError::NotFound(detail),
            409 => ClientError::Conflict(detail),
            500 => ClientError::Internal(detail),
            _ => ClientError::InvalidResponse(
                format!("unexpected status {status}: {detail}")),
        }
    }
}
