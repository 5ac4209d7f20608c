use deadpool_redis::{Config, CreatePoolError, Pool, Runtime};
use tracing::{info, instrument};
use url::Url;

pub mod cache;
pub mod cache_provider;
pub mod config;
pub mod key;
pub mod macros;

pub use cache::{CacheError, CacheStore, Invalidation, MemoryCache, RedisCache};
pub use cache_provider::{CacheEntry, CacheProvider};
pub use key::{CacheKey, KeyScheme, ListFilters, ListQueryKey};

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("invalid redis url: {0}")]
    Url(#[from] url::ParseError),
    #[error("redis url cannot carry credentials")]
    Credentials,
    #[error(transparent)]
    Pool(#[from] CreatePoolError),
}

pub fn redis_url<C>(config: &C) -> Result<Url, ConnectError>
where
    C: config::DbConnectConfig,
{
    let mut url = Url::parse(&format!(
        "redis://{}:{}/{}",
        config.host(),
        config.port(),
        config.db()
    ))?;

    if let Some(password) = config.password() {
        url.set_password(Some(password))
            .map_err(|()| ConnectError::Credentials)?;
    }
    Ok(url)
}

/// Build a lazily connecting pool; no connection is opened until first use.
#[instrument(skip_all, name = "connect-redis")]
pub fn connect_redis_db<C>(config: &C) -> Result<Pool, ConnectError>
where
    C: config::DbConnectConfig,
{
    let url = redis_url(config)?;

    info!(
        redis.host = config.host(),
        redis.port = config.port(),
        redis.db = config.db(),
        redis.connect = true
    );

    let cfg = Config {
        url: Some(url.to_string()),
        pool: Some(deadpool_redis::PoolConfig::default()),
        connection: None,
    };

    Ok(cfg.create_pool(Some(Runtime::Tokio1))?)
}
