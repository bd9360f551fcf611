use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteBackend {
    pub(crate) pool: Arc<SqlitePool>,
    pub(crate) url: String,
}

pub enum MigrationProfile {
    Martac,
}

mod impls;

pub(crate) mod chrono {
    #[cfg(not(test))]
    pub use ::chrono::Utc;
    #[cfg(test)]
    pub use test_mart::chrono::Utc;
}
