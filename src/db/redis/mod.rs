//! Redis access shared by the catalog cache and the document library store
pub mod cache;
mod macros;

pub use cache::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
