use axum::{
    Json,
    extract::{
        Path,
        State,
    },
    http::StatusCode,
};
use martcore::ac::{
    permission::Permission,
    role::Role,
};
use serde::Deserialize;

use crate::http::{
    AppState,
    Result,
};

#[derive(Deserialize)]
pub struct CreateRole {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct ReplacePermissions {
    pub permission_ids: Vec<i64>,
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Role>>> {
    Ok(Json(state.platform.list_roles().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateRole>,
) -> Result<Json<Role>> {
    Ok(Json(state.platform
        .create_role(&payload.name, &payload.description)
        .await?
    ))
}

pub async fn permissions(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> Result<Json<Vec<Permission>>> {
    Ok(Json(state.platform.get_role_permissions(role_id).await?))
}

/// Rewrites the role's assignment wholesale and reports the resulting
/// set back, so the console can refresh without a second round trip.
pub async fn replace_permissions(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(payload): Json<ReplacePermissions>,
) -> Result<Json<Vec<Permission>>> {
    state.platform
        .replace_role_permissions(role_id, &payload.permission_ids)
        .await?;
    Ok(Json(state.platform.get_role_permissions(role_id).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> Result<StatusCode> {
    state.platform.delete_role(role_id).await?;
    Ok(StatusCode::OK)
}
