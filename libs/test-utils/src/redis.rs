use std::time::Duration;

use deadpool_redis::{Config, Pool, Runtime};
use tokio::time::sleep;

/// Connection to the Redis used by ignored integration tests, taken from
/// `TEST_REDIS_URL` (default `redis://localhost:6380`).
pub struct TestRedis {
    pub pool: Pool,
    pub connection_string: String,
}

impl TestRedis {
    pub async fn new() -> anyhow::Result<Self> {
        let url = std::env::var("TEST_REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6380".to_string());
        Self::new_with_connection_string(&url).await
    }

    pub async fn new_with_connection_string(
        connection_string: &str,
    ) -> anyhow::Result<Self> {
        let connection_string = connection_string.to_string();

        let mut cfg = Config::from_url(&connection_string);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(10));
        let pool = cfg.create_pool(Some(Runtime::Tokio1))?;

        let mut attempts = 0;
        loop {
            let ping = async {
                let mut conn = pool.get().await?;
                deadpool_redis::redis::cmd("PING")
                    .query_async::<()>(&mut conn)
                    .await?;
                anyhow::Ok(())
            };
            match ping.await {
                Ok(()) => break,
                Err(_) if attempts < 10 => {
                    attempts += 1;
                    sleep(Duration::from_millis(200 * attempts)).await;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self {
            pool,
            connection_string,
        })
    }

    pub async fn flush_db(&self) -> anyhow::Result<()> {
        let mut conn = self.pool.get().await?;
        deadpool_redis::redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }
}
