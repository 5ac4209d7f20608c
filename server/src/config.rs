use std::{fmt::Display, str::FromStr};

use redis_connection::config::{CacheConfig, MemoryConfig, RedisDbConfig};
use sql_connection::PostgresDbConfig;

pub const DEFAULT_PORT: u16 = 8880;

#[derive(Debug, thiserror::Error)]
#[error("invalid value `{value}` for {name}: {reason}")]
pub struct ConfigError {
    name: &'static str,
    value: String,
    reason: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database: PostgresDbConfig,
    pub redis: RedisDbConfig,
    pub cache: CacheConfig,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables keep their defaults.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let database = PostgresDbConfig::default();
        let redis = RedisDbConfig::default();
        let cache = CacheConfig::default();

        Ok(Self {
            database: PostgresDbConfig {
                uri: lookup("DATABASE_URL").unwrap_or(database.uri),
                max_conn: parse(&lookup, "DATABASE_MAX_CONN")?.or(database.max_conn),
                min_conn: parse(&lookup, "DATABASE_MIN_CONN")?.or(database.min_conn),
            },
            redis: RedisDbConfig {
                host: lookup("REDIS_HOST").unwrap_or(redis.host),
                port: parse(&lookup, "REDIS_PORT")?.unwrap_or(redis.port),
                db: parse(&lookup, "REDIS_DB")?.unwrap_or(redis.db),
            },
            cache: CacheConfig {
                backend: parse(&lookup, "CACHE_BACKEND")?.unwrap_or(cache.backend),
                namespace: lookup("CACHE_NAMESPACE").unwrap_or(cache.namespace),
                default_ttl_secs: parse(&lookup, "CACHE_DEFAULT_TTL_SECS")?
                    .unwrap_or(cache.default_ttl_secs),
                memory: MemoryConfig {
                    capacity: parse(&lookup, "CACHE_MEMORY_CAPACITY")?
                        .unwrap_or(cache.memory.capacity),
                },
            },
            port: parse(&lookup, "SERVER_PORT")?.unwrap_or(DEFAULT_PORT),
        })
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>, name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = lookup(name)
    else {
        return Ok(None);
    };
    value.trim().parse().map(Some).map_err(|err: T::Err| {
        ConfigError {
            name,
            reason: err.to_string(),
            value,
        }
    })
}
