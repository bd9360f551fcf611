use axum::{
    Router,
    body::Body,
    http::{
        Method,
        Request,
        StatusCode,
        header,
    },
    response::Response,
};
use martac::Platform;
use martapp::http::{
    self,
    AppState,
};
use martcore::ac::{
    catalog::CATALOG,
    grant::PermissionSet,
    permission::Permission,
    role::Role,
    user::User,
};
use serde_json::{
    Value,
    json,
};
use std::sync::Arc;
use test_mart::ac::create_sqlite_platform;
use tower::ServiceExt;

// A router over a fresh store with two signed in users: "alice" holds
// every role administration permission, "bob" holds no role at all.
async fn scaffold() -> anyhow::Result<(Arc<Platform>, Router, String, String)> {
    let platform = create_sqlite_platform(true).await?;
    let role = platform.create_role("administrator", "Role administration").await?;
    let ids = platform.list_permissions().await?
        .iter()
        .filter(|permission| {
            permission.code == "menu.roles" ||
            permission.code.starts_with("action.roles.")
        })
        .map(|permission| permission.id)
        .collect::<Vec<_>>();
    platform.replace_role_permissions(role.id, &ids).await?;

    let alice = platform.create_user("alice").await?;
    platform.set_user_role(alice.id, Some(role.id)).await?;
    let admin = platform.new_user_session(alice, "localhost".to_string()).await?
        .session()
        .token
        .to_string();
    let bob = platform.create_user("bob").await?;
    let clerk = platform.new_user_session(bob, "localhost".to_string()).await?
        .session()
        .token
        .to_string();

    let app = http::router(AppState { platform: platform.clone() });
    Ok((platform, app, admin, clerk))
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn send_json(
    method: Method,
    uri: &str,
    token: &str,
    body: Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_value(response: Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn unauthenticated_is_rejected() -> anyhow::Result<()> {
    let (_, app, ..) = scaffold().await?;

    let response = app.clone()
        .oneshot(Request::builder().uri("/roles").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let value = body_value(response).await?;
    assert_eq!(value["error"], "Unauthenticated");
    assert_eq!(value["detail"], "authentication required");

    // a malformed token and a well formed token nobody holds get the
    // same answer
    let response = app.clone().oneshot(get("/roles", "not-a-token")).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let token = "0".repeat(32);
    let response = app.clone().oneshot(get("/roles", &token)).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn profile_reflects_principal() -> anyhow::Result<()> {
    let (_, app, admin, clerk) = scaffold().await?;

    let response = app.clone().oneshot(get("/profile", &admin)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let user: User = serde_json::from_slice(&bytes)?;
    assert_eq!(user.name, "alice");
    assert!(user.role_id.is_some());

    let response = app.clone().oneshot(get("/profile/permissions", &admin)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let set: PermissionSet = serde_json::from_slice(&bytes)?;
    assert_eq!(set.len(), 4);
    assert!(set.contains("menu.roles"));
    assert!(set.contains("action.roles.create"));
    assert!(set.contains("action.roles.edit"));
    assert!(set.contains("action.roles.delete"));

    // bob has no role; his own profile still answers, with nothing
    // granted rather than an error
    let response = app.clone().oneshot(get("/profile", &clerk)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let user: User = serde_json::from_slice(&bytes)?;
    assert_eq!(user.name, "bob");
    assert_eq!(user.role_id, None);

    let response = app.clone().oneshot(get("/profile/permissions", &clerk)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let set: PermissionSet = serde_json::from_slice(&bytes)?;
    assert!(set.is_empty());

    Ok(())
}

#[tokio::test]
async fn catalog_requires_menu_roles() -> anyhow::Result<()> {
    let (_, app, admin, clerk) = scaffold().await?;

    let response = app.clone().oneshot(get("/permissions", &admin)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let permissions: Vec<Permission> = serde_json::from_slice(&bytes)?;
    assert_eq!(permissions.len(), CATALOG.len());

    let response = app.clone().oneshot(get("/permissions", &clerk)).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let value = body_value(response).await?;
    assert_eq!(value["error"], "Forbidden");
    assert_eq!(value["detail"], "missing permission menu.roles");

    let response = app.clone().oneshot(get("/roles", &clerk)).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = app.clone().oneshot(get("/roles/1/permissions", &clerk)).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn role_crud_flow() -> anyhow::Result<()> {
    let (platform, app, admin, _) = scaffold().await?;

    let response = app.clone()
        .oneshot(send_json(Method::POST, "/roles", &admin, json!({"name": "support"})))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let support: Role = serde_json::from_slice(&bytes)?;
    assert_eq!(support.name, "support");
    assert_eq!(support.description, "");

    let response = app.clone()
        .oneshot(send_json(Method::POST, "/roles", &admin, json!({"name": "support"})))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let value = body_value(response).await?;
    assert_eq!(value["error"], "Conflict");

    let response = app.clone().oneshot(get("/roles", &admin)).await?;
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let roles: Vec<Role> = serde_json::from_slice(&bytes)?;
    assert_eq!(
        roles.iter().map(|role| role.name.as_str()).collect::<Vec<_>>(),
        ["administrator", "support"],
    );

    let permissions = platform.list_permissions().await?;
    let id_of = |code: &str| permissions.iter()
        .find(|permission| permission.code == code)
        .map(|permission| permission.id)
        .unwrap();
    let uri = format!("/roles/{}/permissions", support.id);

    // a duplicated id collapses into one grant
    let body = json!({"permission_ids": [
        id_of("menu.orders"),
        id_of("action.orders.edit"),
        id_of("action.orders.edit"),
    ]});
    let response = app.clone()
        .oneshot(send_json(Method::PUT, &uri, &admin, body))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let assigned: Vec<Permission> = serde_json::from_slice(&bytes)?;
    assert_eq!(assigned.len(), 2);

    let response = app.clone()
        .oneshot(send_json(Method::PUT, &uri, &admin, json!({"permission_ids": [999999]})))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_value(response).await?;
    assert_eq!(value["error"], "BadRequest");
    assert_eq!(value["detail"], "permission 999999 not found");

    let body = json!({"permission_ids": [id_of("action.orders.cancel")]});
    let response = app.clone()
        .oneshot(send_json(Method::PUT, &uri, &admin, body))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_value(response).await?;
    assert_eq!(
        value["detail"],
        "granting \"action.orders.cancel\" requires granting \"menu.orders\" as well",
    );

    // both refused writes left the earlier assignment alone
    let response = app.clone().oneshot(get(&uri, &admin)).await?;
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let assigned: Vec<Permission> = serde_json::from_slice(&bytes)?;
    assert_eq!(assigned.len(), 2);

    let response = app.clone()
        .oneshot(send_json(Method::PUT, &uri, &admin, json!({"permission_ids": []})))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let assigned: Vec<Permission> = serde_json::from_slice(&bytes)?;
    assert!(assigned.is_empty());

    let response = app.clone().oneshot(get("/roles/999999/permissions", &admin)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // removal refuses while anyone still holds the role
    let bob = platform.get_user_by_name("bob").await?.unwrap();
    platform.set_user_role(bob.id, Some(support.id)).await?;
    let uri = format!("/roles/{}", support.id);
    let response = app.clone()
        .oneshot(send_json(Method::DELETE, &uri, &admin, json!({})))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let value = body_value(response).await?;
    assert_eq!(
        value["detail"],
        format!("role {} is still assigned to users", support.id),
    );

    platform.set_user_role(bob.id, None).await?;
    let response = app.clone()
        .oneshot(send_json(Method::DELETE, &uri, &admin, json!({})))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.clone()
        .oneshot(send_json(Method::DELETE, &uri, &admin, json!({})))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn forbidden_leaves_state_untouched() -> anyhow::Result<()> {
    let (platform, app, _, clerk) = scaffold().await?;
    let role = platform.get_role_by_name("administrator").await?.unwrap();

    let response = app.clone()
        .oneshot(send_json(Method::POST, "/roles", &clerk, json!({"name": "intruder"})))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(platform.get_role_by_name("intruder").await?.is_none());

    let uri = format!("/roles/{}/permissions", role.id);
    let response = app.clone()
        .oneshot(send_json(Method::PUT, &uri, &clerk, json!({"permission_ids": []})))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(platform.get_role_permissions(role.id).await?.len(), 4);

    let uri = format!("/roles/{}", role.id);
    let response = app.clone()
        .oneshot(send_json(Method::DELETE, &uri, &clerk, json!({})))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(platform.get_role(role.id).await?.name, "administrator");

    Ok(())
}
