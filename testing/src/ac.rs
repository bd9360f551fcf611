use martac::platform::{
    Builder,
    Platform,
};
use martdb_sqlite::{
    MigrationProfile,
    SqliteBackend,
};
use std::sync::Arc;

pub async fn create_sqlite_backend() -> anyhow::Result<SqliteBackend> {
    Ok(SqliteBackend::from_url("sqlite::memory:")
        .await?
        .run_migration_profile(MigrationProfile::Martac)
        .await?)
}

/// A platform over a fresh in-memory store; `seed` syncs the permission
/// catalog so grants can be assigned right away.
pub async fn create_sqlite_platform(seed: bool) -> anyhow::Result<Arc<Platform>> {
    let platform = Builder::new()
        .ac_platform(create_sqlite_backend().await?)
        .build();
    if seed {
        platform.seed_permission_catalog().await?;
    }
    Ok(platform)
}
