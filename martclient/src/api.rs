use async_trait::async_trait;
use martcore::ac::{
    grant::PermissionSet,
    permission::Permission,
    role::Role,
    user::User,
};
use reqwest::Response;
use serde::{
    Deserialize,
    Serialize,
    de::DeserializeOwned,
};

use crate::{
    cache::PermissionSource,
    error::ClientError,
};

/// A signed in connection to the admin console service.  Every call
/// carries the session token as a bearer credential and decodes the
/// service's JSON answers into the core types.
pub struct Api {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct CreateRole<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct ReplacePermissions<'a> {
    permission_ids: &'a [i64],
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

impl Api {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub async fn profile(&self) -> Result<User, ClientError> {
        self.get("/profile").await
    }

    pub async fn profile_permissions(&self) -> Result<PermissionSet, ClientError> {
        self.get("/profile/permissions").await
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, ClientError> {
        self.get("/permissions").await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, ClientError> {
        self.get("/roles").await
    }

    pub async fn role_permissions(
        &self,
        role_id: i64,
    ) -> Result<Vec<Permission>, ClientError> {
        self.get(&format!("/roles/{role_id}/permissions")).await
    }

    pub async fn create_role(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Role, ClientError> {
        let url = format!("{}/roles", self.base_url);
        log::trace!("POST {url}");
        let response = self.http.post(&url)
            .bearer_auth(&self.token)
            .json(&CreateRole { name, description })
            .send()
            .await?;
        unpack(response).await
    }

    /// Hands the role's new assignment wholesale to the service, which
    /// validates it and answers with the resulting set.
    pub async fn replace_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> Result<Vec<Permission>, ClientError> {
        let url = format!("{}/roles/{role_id}/permissions", self.base_url);
        log::trace!("PUT {url}");
        let response = self.http.put(&url)
            .bearer_auth(&self.token)
            .json(&ReplacePermissions { permission_ids })
            .send()
            .await?;
        unpack(response).await
    }

    pub async fn delete_role(
        &self,
        role_id: i64,
    ) -> Result<(), ClientError> {
        let url = format!("{}/roles/{role_id}", self.base_url);
        log::trace!("DELETE {url}");
        let response = self.http.delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(fault(response).await)
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        log::trace!("GET {url}");
        let response = self.http.get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        unpack(response).await
    }
}

async fn unpack<T: DeserializeOwned>(
    response: Response,
) -> Result<T, ClientError> {
    if response.status().is_success() {
        Ok(response.json::<T>().await?)
    } else {
        Err(fault(response).await)
    }
}

/// Decodes the service's `{"error", "detail"}` answer into the typed
/// failure for the status.
async fn fault(response: Response) -> ClientError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => ClientError::from_status(status, body.detail),
        Err(_) => ClientError::InvalidResponse(
            format!("{status} with an undecodable error body")),
    }
}

// The cache's feed: the signed in user's own resolved set.
#[async_trait]
impl PermissionSource for Api {
    async fn fetch_permissions(&self) -> Result<PermissionSet, ClientError> {
        self.profile_permissions().await
    }
}
