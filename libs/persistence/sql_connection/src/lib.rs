pub use config::{DbConnectConfig, DbOptionsConfig, PostgresDbConfig};
pub use connect::SqlConnect;
pub use deadpool_postgres;
pub use pool::connect_postgres_db;
pub use tokio_postgres;

pub mod config;
mod connect;
mod pool;
