use crate::{
    ac::traits::SessionBackend,
    error::BackendError,
};
pub use super::*;

impl dyn SessionBackend {
    pub async fn new_user_session(
        &self,
        session_factory: &SessionFactory,
        user_id: i64,
        origin: String,
    ) -> Result<Session, BackendError> {
        let session = session_factory.create(user_id, origin);
        self.save_session(&session).await?;
        Ok(session)
    }
}
