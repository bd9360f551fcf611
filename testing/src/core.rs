use async_trait::async_trait;
use mockall::mock;
use martcore::{
    ac::{
        catalog::CatalogEntry,
        grant::PermissionGrant,
        permission::Permission,
        role::Role,
        session::{
            Session,
            SessionToken,
        },
        traits::{
            PermissionBackend,
            RoleBackend,
            SessionBackend,
            UserBackend,
        },
        user::User,
    },
    error::BackendError,
    platform::{
        DefaultACPlatform,
        PlatformUrl,
    },
};

mock! {
    pub Platform {}

    #[async_trait]
    impl UserBackend for Platform {
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
        async fn set_user_role(
            &self,
            user_id: i64,
            role_id: Option<i64>,
        ) -> Result<bool, BackendError>;
    }

    #[async_trait]
    impl RoleBackend for Platform {
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
    impl PermissionBackend for Platform {
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
    impl SessionBackend for Platform {
        async fn save_session(
            &self,
            session: &Session,
        ) -> Result<i64, BackendError>;
        async fn load_session(
            &self,
            token: SessionToken,
        ) -> Result<Option<Session>, BackendError>;
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

    impl PlatformUrl for Platform {
        fn url(&self) -> &str;
    }
}

impl DefaultACPlatform for MockPlatform {}
