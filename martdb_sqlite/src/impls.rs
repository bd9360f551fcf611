use martcore::platform::PlatformUrl;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

use crate::{
    MigrationProfile,
    SqliteBackend,
};

impl PlatformUrl for SqliteBackend {
    fn url(&self) -> &str {
        self.url.as_ref()
    }
}

impl SqliteBackend {
    pub async fn from_url(url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect(url).await?;
        Ok(Self {
            pool: Arc::new(pool),
            url: url.to_string(),
        })
    }

    pub async fn create_and_connect(url: &str) -> Result<Self, sqlx::Error> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            log::warn!("sqlite database {} does not exist; creating...", url);
            Sqlite::create_database(url).await?
        }
        Self::from_url(url).await
    }

    pub async fn run_migration_profile(
        self,
        profile: MigrationProfile,
    ) -> Result<Self, sqlx::Error> {
        match profile {
            MigrationProfile::Martac => {
                sqlx::migrate!("migrations/martac").run(&*self.pool).await?;
            }
        }
        Ok(self)
    }
}

mod ac;

mod default_impl {
    use martcore::platform::DefaultACPlatform;
    use crate::SqliteBackend;

    impl DefaultACPlatform for SqliteBackend {}
}
