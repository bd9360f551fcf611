use axum::{
    Json,
    http::StatusCode,
    response::{
        IntoResponse,
        Response,
    },
};
use serde::Serialize;
use thiserror::Error;

/// Everything a handler or guard can fail with.  This is the single
/// point where platform errors become transport statuses; handlers
/// simply use `?`.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("missing permission {0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(#[source] martac::error::Error),
}

impl From<martac::error::Error> for AppError {
    fn from(e: martac::error::Error) -> Self {
        use martac::error::Error;
        match e {
            Error::UnknownSession => AppError::Unauthenticated,
            Error::UserNotFound(_) |
            Error::RoleNotFound(_) => AppError::NotFound(e.to_string()),
            Error::DuplicateUser(_) |
            Error::DuplicateRole(_) |
            Error::RoleInUse(_) => AppError::Conflict(e.to_string()),
            Error::PermissionNotFound(_) |
            Error::ActionRequiresMenu { .. } => AppError::BadRequest(e.to_string()),
            e => AppError::Internal(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthenticated"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            AppError::Internal(e) => {
                // the detail stays server side; the caller gets an
                // opaque 500 that is never mistaken for a denial
                log::error!("internal error serving request: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError")
            }
        };
        let body = Json(ErrorBody {
            error,
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}
