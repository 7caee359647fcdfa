use std::sync::Arc;

use anyhow::Context;
use postkit_core::{AppConfig, AppConfigTrait};
use postkit_http::{init_logging, AppState, HttpConfig, HttpServer, LoggingConfig};
use postkit_orm::{seed_demo_data, MemoryStore, PgStore, PostStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading application config")?;
    config.validate().context("validating application config")?;

    let logging = LoggingConfig::for_environment(&config.environment)
        .with_app_settings(&config.logging)
        .with_service(&config.name);
    init_logging(logging)
        .map_err(|e| anyhow::anyhow!("initializing logging: {}", e))?;

    info!(
        name = %config.name,
        environment = ?config.environment,
        version = postkit_core::version(),
        "Starting postkit"
    );

    let store = open_store(&config).await?;

    if config.seed_demo_data {
        if let Some(user) = seed_demo_data(store.as_ref()).await? {
            info!("Demo user available at /api/v1/users/{}/posts", user.id);
        }
    }

    let http_config = HttpConfig::from_env().context("loading HTTP config")?;
    http_config.validate().context("validating HTTP config")?;

    let server = HttpServer::bind(config.bind_address(), AppState::new(store), http_config).await?;
    server.run().await?;

    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn PostStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url)
                .await
                .context("connecting to PostgreSQL")?;
            store.migrate().await.context("running migrations")?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set, posts are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
