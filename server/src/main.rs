use std::{net::SocketAddr, sync::Arc};

use project_dao::{PROJECTS_SCHEMA, ProjectDao};
use redis_connection::{
    CacheProvider, config::CacheBackendKind, connect_redis_db,
};
use sql_connection::{SqlConnect, connect_postgres_db};
use task_dao::{TASKS_SCHEMA, TaskDao};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod config;

use app::HealthState;
use config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let pool = connect_postgres_db(&config.database).await?;
    let db = SqlConnect::new(pool);
    db.migrate(&[PROJECTS_SCHEMA, TASKS_SCHEMA]).await?;
    info!("PostgreSQL pool initialized");

    let (cache, cache_backend) = build_cache(&config);
    info!(backend = cache_backend, namespace = %config.cache.namespace, "cache initialized");

    let app = app::compose(
        Arc::new(ProjectDao::new(db.clone())),
        Arc::new(TaskDao::new(db.clone())),
        cache,
        HealthState {
            db: Some(db),
            cache_backend,
        },
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Taskhub server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when configured and reachable to build, memory otherwise.
fn build_cache(config: &ServerConfig) -> (CacheProvider, &'static str) {
    match config.cache.backend {
        CacheBackendKind::Memory => (CacheProvider::memory(&config.cache), "memory"),
        CacheBackendKind::Redis => {
            match connect_redis_db(&config.redis) {
                Ok(pool) => (CacheProvider::redis(pool, &config.cache), "redis"),
                Err(err) => {
                    warn!(error = %err, "redis unavailable, falling back to in-memory cache");
                    (CacheProvider::memory(&config.cache), "memory")
                }
            }
        }
    }
}
