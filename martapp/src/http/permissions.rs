use axum::{
    Json,
    extract::State,
};
use martcore::ac::permission::Permission;

use crate::http::{
    AppState,
    Result,
};

/// The full catalog, for the role editing screens.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Permission>>> {
    Ok(Json(state.platform.list_permissions().await?))
}
