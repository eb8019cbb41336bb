//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, cache setup, service wiring, and Axum server lifecycle.

use crate::application::services::{Allocator, LinkService};
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::UrlStore;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryUrlStore, PgUrlStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - URL store (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Code generator, allocator and link service
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The code length is out of range
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;
    let cache = connect_cache(&config).await;

    let generator =
        CodeGenerator::os(config.code_length).context("Invalid short code settings")?;
    let allocator = Arc::new(Allocator::new(
        store.clone(),
        generator,
        config.allocator_config(),
    ));
    let link_service = Arc::new(LinkService::new(
        allocator,
        store,
        cache,
        config.base_url.clone(),
    ));

    let state = AppState::new(link_service);
    let app = app_router(
        state,
        &config.static_dir,
        Duration::from_secs(config.request_timeout_seconds),
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured [`UrlStore`].
///
/// The PostgreSQL backend applies pending migrations before returning.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn UrlStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, mappings will not survive a restart");
            Ok(Arc::new(MemoryUrlStore::new()))
        }
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
                .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
                .connect(&config.database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            let store = PgUrlStore::new(Arc::new(pool));
            store.migrate().await.context("Failed to migrate")?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(store))
        }
    }
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
///
/// If a handler cannot be installed the error is logged and that signal is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    tracing::info!("Shutdown signal received");
}
