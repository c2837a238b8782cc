use super::{BackendResult, KeyValueBackend, RankedSetBackend};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

/// Redis-backed key-value and ranked-set primitives
///
/// Wraps a [`ConnectionManager`], which reconnects on its own and is cheap to
/// clone per command.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Connect to Redis and verify the server answers `PING`
    pub async fn connect(url: &str) -> BackendResult<Self> {
        info!("Connecting to Redis at {}", url);

        let client = redis::Client::open(url)?;
        let mut conn = ConnectionManager::new(client).await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!("Redis PING -> {}", pong);

        Ok(Self { conn })
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl KeyValueBackend for RedisBackend {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        debug!("GET key={}", key);
        let value: Option<String> = self.conn().get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        debug!("SET key={}, size={}", key, value.len());
        let _: () = self.conn().set(key, value).await?;
        Ok(())
    }
}

#[async_trait]
impl RankedSetBackend for RedisBackend {
    async fn zincrby(&self, set: &str, increment: f64, member: &str) -> BackendResult<f64> {
        debug!("ZINCRBY set={}, member={}, increment={}", set, member, increment);
        let score: f64 = self.conn().zincr(set, member, increment).await?;
        Ok(score)
    }

    async fn zrevrange_withscores(
        &self,
        set: &str,
        start: isize,
        stop: isize,
    ) -> BackendResult<Vec<(String, f64)>> {
        debug!("ZREVRANGE set={}, start={}, stop={}", set, start, stop);
        let members: Vec<(String, f64)> =
            self.conn().zrevrange_withscores(set, start, stop).await?;
        Ok(members)
    }

    async fn zrangebyscore_withscores(
        &self,
        set: &str,
        min: f64,
        max: f64,
        offset: isize,
        count: isize,
    ) -> BackendResult<Vec<(String, f64)>> {
        debug!("ZRANGEBYSCORE set={}, min={}, max={}", set, min, max);
        let members: Vec<(String, f64)> = self
            .conn()
            .zrangebyscore_limit_withscores(set, min, max, offset, count)
            .await?;
        Ok(members)
    }

    async fn del(&self, set: &str) -> BackendResult<bool> {
        debug!("DEL set={}", set);
        let removed: usize = self.conn().del(set).await?;
        Ok(removed > 0)
    }
}
