pub mod catalog;
pub mod grant;
pub mod permission;
pub mod role;
pub mod session;
pub mod traits;
pub mod user;

pub use self::permission::{Permission, PermissionCategory};
pub use self::role::Role;
