//! Storage backends behind the result cache and the frequency ranking
//!
//! Two technologies provide the primitives:
//! - Embedded: in-process [`KVStore`] and [`SortedSetStore`]
//! - Redis: [`RedisBackend`] over a managed async connection
//!
//! Both are selected once at startup and shared behind `Arc`.

pub mod kv_store;
pub mod redis_backend;
pub mod sorted_set;

use async_trait::async_trait;
use thiserror::Error;

pub use kv_store::{KVConfig, KVStats, KVStore};
pub use redis_backend::RedisBackend;
pub use sorted_set::{OrderedFloat, ScoredMember, SortedSetStore, SortedSetValue};

/// Failure reported by a storage backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("command failed: {0}")]
    Command(String),

    #[error("memory limit exceeded")]
    MemoryLimitExceeded,
}

impl From<redis::RedisError> for BackendError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            Self::Connection(err.to_string())
        } else {
            Self::Command(err.to_string())
        }
    }
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Flat string key-value primitive (`GET` / `SET` without expiry)
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    async fn get(&self, key: &str) -> BackendResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> BackendResult<()>;
}

/// Scored-set primitive with Redis sorted set semantics
#[async_trait]
pub trait RankedSetBackend: Send + Sync {
    /// Atomically add `increment` to the member's score, creating it at `increment`
    async fn zincrby(&self, set: &str, increment: f64, member: &str) -> BackendResult<f64>;

    /// Members by descending score, rank `start..=stop`
    async fn zrevrange_withscores(
        &self,
        set: &str,
        start: isize,
        stop: isize,
    ) -> BackendResult<Vec<(String, f64)>>;

    /// Members with `min <= score <= max` by ascending score then member
    async fn zrangebyscore_withscores(
        &self,
        set: &str,
        min: f64,
        max: f64,
        offset: isize,
        count: isize,
    ) -> BackendResult<Vec<(String, f64)>>;

    /// Delete the whole set, returning whether it existed
    async fn del(&self, set: &str) -> BackendResult<bool>;
}
