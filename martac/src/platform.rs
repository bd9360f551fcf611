use martcore::{
    ac::{
        catalog,
        grant::PermissionSet,
        permission::{
            self,
            Permission,
            PermissionCategory,
        },
        role::Role,
        session::{
            Session,
            SessionFactory,
            SessionToken,
        },
        user::User,
    },
    platform::ACPlatform,
};
use std::sync::Arc;

use crate::{
    error::Error,
    principal::Principal,
};

#[derive(Default)]
pub struct Builder {
    // platform
    ac_platform: Option<Box<dyn ACPlatform>>,
    session_factory: SessionFactory,
}

pub struct Platform {
    ac_platform: Box<dyn ACPlatform>,
    session_factory: SessionFactory,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ac_platform(mut self, val: impl ACPlatform + 'static) -> Self {
        self.ac_platform = Some(Box::new(val));
        self
    }

    pub fn boxed_ac_platform(mut self, val: Box<dyn ACPlatform>) -> Self {
        self.ac_platform = Some(val);
        self
    }

    pub fn session_factory(mut self, val: SessionFactory) -> Self {
        self.session_factory = val;
        self
    }

    pub fn build(self) -> Arc<Platform> {
        Arc::new(Platform {
            ac_platform: self.ac_platform
                .expect("missing required argument ac_platform"),
            session_factory: self.session_factory,
        })
    }
}

// User management.

impl Platform {
    pub async fn create_user(
        &self,
        name: &str,
    ) -> Result<User, Error> {
        let id = self.ac_platform.add_user(name).await?
            .ok_or_else(|| Error::DuplicateUser(name.to_string()))?;
        self.get_user(id).await
    }

    pub async fn get_user(
        &self,
        id: i64,
    ) -> Result<User, Error> {
        self.ac_platform.get_user_by_id(id).await?
            .ok_or(Error::UserNotFound(id))
    }

    pub async fn get_user_by_name(
        &self,
        name: &str,
    ) -> Result<Option<User>, Error> {
        Ok(self.ac_platform.get_user_by_name(name).await?)
    }

    /// Moves the user into the given role, or out of any role with
    /// `None`.
    pub async fn set_user_role(
        &self,
        user_id: i64,
        role_id: Option<i64>,
    ) -> Result<(), Error> {
        if let Some(role_id) = role_id {
            self.get_role(role_id).await?;
        }
        self.ac_platform.set_user_role(user_id, role_id).await?
            .then_some(())
            .ok_or(Error::UserNotFound(user_id))
    }
}

// Role administration.

impl Platform {
    pub async fn create_role(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Role, Error> {
        let id = self.ac_platform.add_role(name, description).await?
            .ok_or_else(|| Error::DuplicateRole(name.to_string()))?;
        self.get_role(id).await
    }

    pub async fn get_role(
        &self,
        id: i64,
    ) -> Result<Role, Error> {
        self.ac_platform.get_role_by_id(id).await?
            .ok_or(Error::RoleNotFound(id))
    }

    pub async fn get_role_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Role>, Error> {
        Ok(self.ac_platform.get_role_by_name(name).await?)
    }

    pub async fn list_roles(
        &self,
    ) -> Result<Vec<Role>, Error> {
        Ok(self.ac_platform.list_roles().await?)
    }

    pub async fn get_role_permissions(
        &self,
        role_id: i64,
    ) -> Result<Vec<Permission>, Error> {
        self.get_role(role_id).await?;
        Ok(self.ac_platform.get_permissions_for_role(role_id).await?)
    }

    /// Validates then rewrites the assignment set for a role.  Incoming
    /// ids are deduplicated; every id must resolve to a cataloged
    /// permission, and every action permission in the new set must be
    /// accompanied by the menu permission for its resource.  The write
    /// itself is one transactional delete-and-insert, so the empty list
    /// clears the role.
    pub async fn replace_role_permissions(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> Result<(), Error> {
        let mut ids = permission_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        self.get_role(role_id).await?;
        let permissions = self.ac_platform.get_permissions_by_ids(&ids).await?;
        let found = permissions.iter()
            .map(|permission| permission.id)
            .collect::<Vec<_>>();
        if let Some(missing) = ids.iter()
            .copied()
            .find(|id| found.binary_search(id).is_err())
        {
            return Err(Error::PermissionNotFound(missing));
        }
        let codes = permissions.iter()
            .map(|permission| permission.code.as_str())
            .collect::<Vec<_>>();
        for permission in permissions.iter() {
            if permission.category == PermissionCategory::Action {
                let (_, resource) = permission::parse_code(&permission.code)?;
                let menu = permission::menu_code(resource);
                if !codes.contains(&menu.as_str()) {
                    return Err(Error::ActionRequiresMenu {
                        action: permission.code.clone(),
                        menu,
                    });
                }
            }
        }
        Ok(self.ac_platform.replace_role_permissions(role_id, &ids).await?)
    }

    pub async fn delete_role(
        &self,
        role_id: i64,
    ) -> Result<(), Error> {
        self.get_role(role_id).await?;
        if self.ac_platform.is_role_in_use(role_id).await? {
            return Err(Error::RoleInUse(role_id));
        }
        // the store rechecks under its own transaction; a refusal here
        // means an assignment raced in after the check above
        self.ac_platform.delete_role(role_id).await?
            .then_some(())
            .ok_or(Error::RoleInUse(role_id))
    }
}

// Permission catalog.

impl Platform {
    /// Syncs the fixed catalog into the store; returns how many entries
    /// were newly provisioned.
    pub async fn seed_permission_catalog(
        &self,
    ) -> Result<usize, Error> {
        Ok(self.ac_platform.seed_permissions(catalog::CATALOG).await?)
    }

    pub async fn list_permissions(
        &self,
    ) -> Result<Vec<Permission>, Error> {
        Ok(self.ac_platform.list_permissions().await?)
    }
}

// Permission evaluation.

impl Platform {
    /// Resolves the full permission set for a user.  A user without a
    /// role, or with a role granting nothing, resolves to the empty
    /// set; only an unknown user id is an error.
    pub async fn evaluate_permissions(
        &self,
        user_id: i64,
    ) -> Result<PermissionSet, Error> {
        self.get_user(user_id).await?;
        let grants = self.ac_platform.get_grants_for_user(user_id).await?;
        Ok(grants.into_iter().collect())
    }

    /// Targeted membership probe that never materializes the whole set.
    /// An unknown user simply holds no permission.
    pub async fn has_permission(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<bool, Error> {
        Ok(self.ac_platform.user_has_permission(user_id, code).await?)
    }
}

// Session management.

impl Platform {
    pub async fn new_user_session(
        &self,
        user: User,
        origin: String,
    ) -> Result<Principal, Error> {
        let session = self.session_factory.create(user.id, origin);
        self.ac_platform.save_session(&session).await?;
        Ok(Principal::new(user, session))
    }

    pub async fn load_principal(
        &self,
        token: SessionToken,
    ) -> Result<Principal, Error> {
        let session = self.ac_platform.load_session(token).await?
            .ok_or(Error::UnknownSession)?;
        let user = self.get_user(session.user_id).await?;
        Ok(Principal::new(user, session))
    }

    /// Simply return a list of sessions without the token for the user_id
    pub async fn get_user_sessions(
        &self,
        user_id: i64,
    ) -> Result<Vec<Session>, Error> {
        Ok(self.ac_platform.get_user_sessions(user_id).await?)
    }

    pub async fn logout_session(
        &self,
        token: SessionToken,
    ) -> Result<(), Error> {
        Ok(self.ac_platform.purge_session(token).await?)
    }

    /// Logout all sessions associated with the user_id.
    pub async fn logout_user(
        &self,
        user_id: i64,
    ) -> Result<(), Error> {
        Ok(self.ac_platform.purge_user_sessions(user_id, None).await?)
    }

    pub async fn logout_other_sessions(
        &self,
        principal: &Principal,
    ) -> Result<(), Error> {
        Ok(self.ac_platform.purge_user_sessions(
            principal.user_id(),
            Some(principal.session().token),
        ).await?)
    }
}
