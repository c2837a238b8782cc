//! Cache-aside storage for computed sequences
//!
//! [`ResultCache`] has two variants chosen at startup: [`NoOpCache`] when
//! caching is disabled, and [`BackendCache`] over any [`KeyValueBackend`].

use crate::core::{FizzBuzzError, ParameterKey, Result};
use crate::storage::KeyValueBackend;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up a previously computed sequence
    async fn get(&self, key: &ParameterKey) -> Result<Option<String>>;

    /// Store a computed sequence under the key, replacing any previous value
    async fn set(&self, key: &ParameterKey, value: &str) -> Result<()>;
}

/// Cache that never holds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait]
impl ResultCache for NoOpCache {
    async fn get(&self, _key: &ParameterKey) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &ParameterKey, _value: &str) -> Result<()> {
        Ok(())
    }
}

/// Cache stored in a key-value backend under the canonical key, without expiry
pub struct BackendCache<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: KeyValueBackend + ?Sized> BackendCache<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: KeyValueBackend + ?Sized> ResultCache for BackendCache<B> {
    async fn get(&self, key: &ParameterKey) -> Result<Option<String>> {
        let canonical = key.canonical();
        let value = self
            .backend
            .get(&canonical)
            .await
            .map_err(|e| FizzBuzzError::CacheUnavailable(e.to_string()))?;
        let outcome = if value.is_some() { "hit" } else { "miss" };
        debug!("Cache {} for key={}", outcome, canonical);
        Ok(value)
    }

    async fn set(&self, key: &ParameterKey, value: &str) -> Result<()> {
        self.backend
            .set(&key.canonical(), value)
            .await
            .map_err(|e| FizzBuzzError::CacheUnavailable(e.to_string()))
    }
}
