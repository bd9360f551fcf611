use clap::Parser;
use martac::platform::Builder as PlatformBuilder;
use martapp::{
    config::Config,
    http::{
        self,
        AppState,
    },
};
use martdb_sqlite::{
    MigrationProfile,
    SqliteBackend,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    stderrlog::new()
        .module(module_path!())
        .module("martdb_sqlite")
        .verbosity((config.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap();

    let backend = SqliteBackend::create_and_connect(&config.martapp_db_url)
        .await?
        .run_migration_profile(MigrationProfile::Martac)
        .await?;
    let platform = PlatformBuilder::new()
        .ac_platform(backend)
        .build();
    let provisioned = platform.seed_permission_catalog().await?;
    if provisioned > 0 {
        log::info!("permission catalog synced; {provisioned} new entries");
    }

    let app = http::router(AppState { platform });

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    log::info!("listening on http://{}", &config.listen);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
