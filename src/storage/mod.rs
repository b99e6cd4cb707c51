//! Persistent string-keyed storage for the watchlist
//!
//! The watchlist only ever needs one slot holding its serialized JSON. Backends
//! are swappable so the same store logic runs against Redis in production and
//! process memory in tests or single-user setups.
use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    error::AppResult,
};

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Trait for persistent key-value backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw string stored under `key`, `None` if never written
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Overwrite the slot at `key`
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds the backend selected in configuration
pub async fn create_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
    };

    tracing::info!(backend = store.name(), "Watchlist storage ready");

    Ok(store)
}
