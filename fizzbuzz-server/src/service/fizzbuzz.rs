use crate::cache::{NoOpCache, ResultCache};
use crate::core::{ParameterKey, Result, SequenceEngine};
use crate::stats::FrequencyStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Serves generate requests: cache-aside lookup, computation on miss, hit counting
#[derive(Clone)]
pub struct FizzBuzzService {
    engine: SequenceEngine,
    cache: Arc<dyn ResultCache>,
    store: Arc<dyn FrequencyStore>,
}

impl FizzBuzzService {
    /// Create a service with caching disabled
    pub fn new(store: Arc<dyn FrequencyStore>) -> Self {
        Self {
            engine: SequenceEngine::new(),
            cache: Arc::new(NoOpCache),
            store,
        }
    }

    /// Use the given result cache
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Produce the sequence for the parameters and count the request
    ///
    /// Parameters are checked before the cache is consulted, so an entry stored
    /// under an invalid key is never served. A failed cache read falls back to
    /// computing. A failed cache write or a failed increment fails the whole
    /// request and discards the result.
    pub async fn generate_fizzbuzz(
        &self,
        first_divisor: i64,
        second_divisor: i64,
        limit: i64,
        first_word: &str,
        second_word: &str,
    ) -> Result<String> {
        SequenceEngine::validate(first_divisor, second_divisor, limit)?;
        let key = ParameterKey::new(first_divisor, second_divisor, limit, first_word, second_word);

        let result = self.cached_or_calculate(&key).await?;
        self.store.increment(&key).await?;

        Ok(result)
    }

    async fn cached_or_calculate(&self, key: &ParameterKey) -> Result<String> {
        match self.cache.get(key).await {
            Ok(Some(cached)) if !cached.is_empty() => {
                debug!("Serving key={} from cache", key);
                return Ok(cached);
            }
            Ok(_) => {}
            Err(e) => warn!("Cache read failed for key={}, recomputing: {}", key, e),
        }

        let result = self.engine.calculate(
            key.first_divisor,
            key.second_divisor,
            key.limit,
            &key.first_word,
            &key.second_word,
        )?;
        debug!("Calculated key={} ({} bytes)", key, result.len());

        self.cache.set(key, &result).await?;
        Ok(result)
    }
}
