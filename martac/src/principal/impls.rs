use martcore::ac::{
    session,
    user,
};

use super::Principal;

impl Principal {
    pub(crate) fn new(
        user: user::User,
        session: session::Session,
    ) -> Self {
        Self {
            user,
            session,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn name(&self) -> &str {
        self.user.name.as_ref()
    }

    pub fn role_id(&self) -> Option<i64> {
        self.user.role_id
    }

    pub fn user(&self) -> &user::User {
        &self.user
    }

    pub fn session(&self) -> &session::Session {
        &self.session
    }
}
