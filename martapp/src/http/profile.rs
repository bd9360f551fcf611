use axum::{
    Extension,
    Json,
    extract::State,
};
use martac::principal::Principal;
use martcore::ac::{
    grant::PermissionSet,
    user::User,
};

use crate::http::{
    AppState,
    Result,
};

pub async fn show(
    Extension(principal): Extension<Principal>,
) -> Result<Json<User>> {
    Ok(Json(principal.user().clone()))
}

/// The caller's resolved permission set; the console client feeds its
/// cache from this.
pub async fn permissions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<PermissionSet>> {
    Ok(Json(state.platform
        .evaluate_permissions(principal.user_id())
        .await?
    ))
}
