use axum::{
    extract::{
        Request,
        State,
    },
    http::header,
    middleware::Next,
    response::Response,
};
use martac::principal::Principal;
use martcore::ac::session::SessionToken;
use std::str::FromStr;

use crate::{
    error::AppError,
    http::AppState,
};

/// Resolves `Authorization: Bearer <token>` into a [`Principal`]
/// request extension.  Absent, malformed and unknown tokens all end
/// here with 401; a failing store stays a 500.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)?;
    let token = SessionToken::from_str(token)
        .map_err(|_| AppError::Unauthenticated)?;
    let principal = state.platform.load_principal(token).await?;
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Gates a route behind a single permission code with a targeted
/// membership probe.  A missing grant reports 403 naming the code; a
/// failing store reports 500 and is never conflated with a denial.
pub fn require_permission(
    code: &'static str,
) -> impl Fn(
    State<AppState>,
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |State(state): State<AppState>, req: Request, next: Next| {
        Box::pin(async move {
            let user_id = req.extensions()
                .get::<Principal>()
                .map(Principal::user_id)
                .ok_or(AppError::Unauthenticated)?;
            if !state.platform.has_permission(user_id, code).await? {
                return Err(AppError::Forbidden(code));
            }
            Ok(next.run(req).await)
        })
    }
}
