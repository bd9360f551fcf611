use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{
        delete,
        get,
        post,
        put,
    },
};
use martac::Platform;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::AppError;

pub mod auth;
pub mod permissions;
pub mod profile;
pub mod roles;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Clone)]
pub struct AppState {
    pub platform: Arc<Platform>,
}

/// The full admin console surface.  Every route sits behind the trust
/// context middleware; the mutating role routes carry their own
/// permission guards on top.
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/permissions", get(permissions::list))
        .route("/roles", get(roles::list))
        .route("/roles/{role_id}/permissions", get(roles::permissions))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::require_permission("menu.roles"),
        ));
    let create = Router::new()
        .route("/roles", post(roles::create))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::require_permission("action.roles.create"),
        ));
    let edit = Router::new()
        .route("/roles/{role_id}/permissions", put(roles::replace_permissions))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::require_permission("action.roles.edit"),
        ));
    let remove = Router::new()
        .route("/roles/{role_id}", delete(roles::remove))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::require_permission("action.roles.delete"),
        ));
    let profile = Router::new()
        .route("/profile", get(profile::show))
        .route("/profile/permissions", get(profile::permissions));

    Router::new()
        .merge(catalog)
        .merge(create)
        .merge(edit)
        .merge(remove)
        .merge(profile)
        .layer(from_fn_with_state(state.clone(), auth::require_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
