use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::{error::AppResult, storage::KeyValueStore};

/// Redis-backed watchlist slot
///
/// Writes are synchronous from the caller's view: `set` resolves only once
/// Redis has acknowledged the write, so the watchlist can notify observers
/// knowing the durable copy is current.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Opens a managed connection that reconnects on failure
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        tracing::debug!(key = %key, bytes = value.len(), "Watchlist written to Redis");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
