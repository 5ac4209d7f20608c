use deadpool_postgres::{Object, Pool, PoolError};
use tracing::{info, instrument};

/// Shared handle on the PostgreSQL pool, handed to every DAO.
#[derive(Debug, Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub async fn get_client(&self) -> Result<Object, PoolError> {
        self.pool.get().await
    }

    /// `(available, size)` of the pool.
    pub fn pool_status(&self) -> (usize, usize) {
        let status = self.pool.status();
        (status.available, status.size)
    }

    /// Run idempotent DDL scripts in order, each as one batch.
    #[instrument(skip_all, name = "migrate")]
    pub async fn migrate(&self, scripts: &[&str]) -> anyhow::Result<()> {
        let client = self.get_client().await?;
        for script in scripts {
            client.batch_execute(script).await?;
        }
        info!(scripts = scripts.len(), "schema up to date");
        Ok(())
    }
}

impl From<Pool> for SqlConnect {
    fn from(pool: Pool) -> Self { Self::new(pool) }
}
