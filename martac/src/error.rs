use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Backend(#[from] martcore::error::BackendError),
    #[error(transparent)]
    Value(#[from] martcore::error::ValueError),
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error("user name {0:?} already exists")]
    DuplicateUser(String),
    #[error("role {0} not found")]
    RoleNotFound(i64),
    #[error("role name {0:?} already exists")]
    DuplicateRole(String),
    #[error("role {0} is still assigned to users")]
    RoleInUse(i64),
    #[error("permission {0} not found")]
    PermissionNotFound(i64),
    #[error("granting {action:?} requires granting {menu:?} as well")]
    ActionRequiresMenu {
        action: String,
        menu: String,
    },
    #[error("unknown session token")]
    UnknownSession,
}
