//! Song catalog server binary

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_catalog::api::{create_router, AppState};
use song_catalog::config::{AppConfig, LogFormat};
use song_catalog::seed;
use song_catalog::store::{create_store, SongStore, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    // A missing store host aborts startup here, before anything is served
    let store_config = config
        .store_runtime()
        .context("invalid store configuration")?;

    match &store_config {
        StoreConfig::Mongo {
            database,
            collection,
            ..
        } => tracing::info!(%database, %collection, "Using MongoDB store"),
        StoreConfig::Memory => tracing::info!("Using in-memory store"),
    }

    let store: Arc<dyn SongStore> = Arc::from(create_store(store_config).await?);

    // Destructive reseed: the collection is rebuilt from the seed dataset
    // on every start, discarding whatever it held before.
    let songs = seed::load(&config.seed).context("failed to load seed data")?;
    let seeded = store.replace_all(songs).await?;
    tracing::info!(songs = seeded, "Seeded song collection");

    let state = AppState::new(store);
    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("song_catalog=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}
