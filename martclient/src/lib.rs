pub mod api;
pub mod cache;
pub mod error;

pub use api::Api;
pub use cache::PermissionCache;
