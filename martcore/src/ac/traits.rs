use async_trait::async_trait;
use crate::error::BackendError;
use super::{
    catalog::CatalogEntry,
    grant::PermissionGrant,
    permission::Permission,
    role::Role,
    session::{
        Session,
        SessionToken,
    },
    user::User,
};

#[async_trait]
pub trait UserBackend {
    /// Returns the new user id, or `None` when the name is taken.
    async fn add_user(
        &self,
        name: &str,
    ) -> Result<Option<i64>, BackendError>;
    async fn get_user_by_id(
        &self,
        id: i64,
    ) -> Result<Option<User>, BackendError>;
    async fn get_user_by_name(
        &self,
        name: &str,
    ) -> Result<Option<User>, BackendError>;
    /// Moves the user into the given role, or out of any role with
    /// `None`.  Returns false when the user does not exist.
    async fn set_user_role(
        &self,
        user_id: i64,
        role_id: Option<i64>,
    ) -> Result<bool, BackendError>;
}

#[async_trait]
pub trait RoleBackend {
    /// Returns the new role id, or `None` when the name is taken.
    async fn add_role(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Option<i64>, BackendError>;
    async fn get_role_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Role>, BackendError>;
    async fn get_role_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Role>, BackendError>;
    async fn list_roles(
        &self,
    ) -> Result<Vec<Role>, BackendError>;
    /// Removes the role and its permission assignments, refusing while
    /// any user still belongs to it.  Returns whether the role row was
    /// removed.
    async fn delete_role(
        &self,
        id: i64,
    ) -> Result<bool, BackendError>;
    async fn is_role_in_use(
        &self,
        id: i64,
    ) -> Result<bool, BackendError>;
}

#[async_trait]
pub trait PermissionBackend {
    /// Idempotent catalog sync; returns the number of entries newly
    /// inserted.
    async fn seed_permissions(
        &self,
        entries: &[CatalogEntry],
    ) -> Result<usize, BackendError>;
    async fn list_permissions(
        &self,
    ) -> Result<Vec<Permission>, BackendError>;
    async fn get_permissions_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<Permission>, BackendError>;
    async fn get_permissions_for_role(
        &self,
        role_id: i64,
    ) -> Result<Vec<Permission>, BackendError>;
    /// Rewrites the whole assignment set for the role in one
    /// transaction; the empty list clears it.
    async fn replace_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> Result<(), BackendError>;
    async fn get_grants_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<PermissionGrant>, BackendError>;
    async fn user_has_permission(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<bool, BackendError>;
}

#[async_trait]
pub trait SessionBackend {
    /// Insert or refresh; returns the refresh timestamp.
    async fn save_session(
        &self,
        session: &Session,
    ) -> Result<i64, BackendError>;
    /// Unknown tokens resolve to `None`; that is an authentication
    /// outcome, not a store failure.
    async fn load_session(
        &self,
        token: SessionToken,
    ) -> Result<Option<Session>, BackendError>;
    /// Lists the user's sessions with their tokens blanked out.
    async fn get_user_sessions(
        &self,
        user_id: i64,
    ) -> Result<Vec<Session>, BackendError>;
    async fn purge_session(
        &self,
        token: SessionToken,
    ) -> Result<(), BackendError>;
    async fn purge_user_sessions(
        &self,
        user_id: i64,
        token: Option<SessionToken>,
    ) -> Result<(), BackendError>;
}
