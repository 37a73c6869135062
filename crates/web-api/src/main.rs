use std::sync::Arc;

use optsync_core::ConfigLoader;
use optsync_data::Database;
use optsync_web_api::{ApiServer, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ConfigLoader::load()?;

    let db = Database::connect(&config.database.url, config.database.max_connections).await?;
    db.migrate().await?;
    tracing::info!("Database connected and migrated");

    let state = AppState::new(db.pool(), &config)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    ApiServer::new(Arc::new(state)).serve(&addr).await
}
