use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movielens_api::{
    api::{create_router, AppState},
    config::{Config, LibraryBackend},
    db::{self, Cache, CacheWriterHandle},
    services::{
        CatalogProvider, LibraryStore, MemoryLibraryStore, PgLibraryStore, RedisLibraryStore,
        TmdbProvider,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movielens_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let redis_client = if config.needs_redis() {
        Some(db::create_redis_client(&config.redis_url)?)
    } else {
        None
    };

    let library: Arc<dyn LibraryStore> = match config.library_backend {
        LibraryBackend::Memory => {
            tracing::warn!("Using the in-memory library; records are lost on restart");
            Arc::new(MemoryLibraryStore::new())
        }
        LibraryBackend::Postgres => {
            let pool = db::create_pool(&config.database_url).await?;
            db::run_migrations(&pool).await?;
            Arc::new(PgLibraryStore::new(pool))
        }
        LibraryBackend::Redis => {
            let client = redis_client
                .clone()
                .context("Redis library backend selected without a Redis client")?;
            Arc::new(RedisLibraryStore::new(client))
        }
    };

    let mut tmdb = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.http_timeout(),
    )?;

    let mut cache_writer: Option<CacheWriterHandle> = None;
    if config.cache_catalog {
        if let Some(client) = redis_client {
            let (cache, writer) = Cache::new(client);
            tmdb = tmdb.with_cache(cache);
            cache_writer = Some(writer);
        }
    }

    let catalog: Arc<dyn CatalogProvider> = Arc::new(tmdb);

    tracing::info!(
        library = library.name(),
        catalog = catalog.name(),
        cache_catalog = config.cache_catalog,
        "Services initialized"
    );

    let app = create_router(AppState::new(catalog, library));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
