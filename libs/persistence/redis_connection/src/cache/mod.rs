pub mod glob;
pub mod invalidation;
pub mod memory;
pub mod redis_cache;
pub mod r#trait;

pub use invalidation::Invalidation;
pub use memory::MemoryCache;
pub use r#trait::{CacheError, CacheResult, CacheStore};
pub use redis_cache::RedisCache;
