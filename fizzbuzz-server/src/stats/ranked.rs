use super::FrequencyStore;
use crate::core::{FizzBuzzError, FrequencyEntry, ParameterKey, Result};
use crate::storage::{BackendError, RankedSetBackend};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Sorted set holding one member per canonical key, scored by hit count
pub const STATS_SET_KEY: &str = "fizzbuzz:stats";

/// Largest integer an f64 score represents exactly
const MAX_EXACT_SCORE: f64 = 9_007_199_254_740_992.0;

/// Frequency store over a ranked-set backend
///
/// Increments are a single atomic `ZINCRBY`. The top entry is read with
/// `ZREVRANGE 0 0`, then narrowed to the smallest member at that score so ties
/// resolve the same way as the in-memory store.
pub struct RankedFrequencyStore<B: ?Sized> {
    backend: Arc<B>,
    set_key: String,
}

impl<B: RankedSetBackend + ?Sized> RankedFrequencyStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_set_key(backend, STATS_SET_KEY)
    }

    /// Track counts under a custom sorted set name
    pub fn with_set_key(backend: Arc<B>, set_key: impl Into<String>) -> Self {
        Self {
            backend,
            set_key: set_key.into(),
        }
    }

    pub fn set_key(&self) -> &str {
        &self.set_key
    }
}

fn unavailable(err: BackendError) -> FizzBuzzError {
    FizzBuzzError::StoreUnavailable(err.to_string())
}

/// Convert a backend score into an exact hit count
fn score_to_hits(member: &str, score: f64) -> Result<u64> {
    if !score.is_finite() || score < 0.0 || score.fract() != 0.0 || score > MAX_EXACT_SCORE {
        return Err(FizzBuzzError::CorruptEntry(format!(
            "invalid hit count {} for key '{}'",
            score, member
        )));
    }
    Ok(score as u64)
}

#[async_trait]
impl<B: RankedSetBackend + ?Sized> FrequencyStore for RankedFrequencyStore<B> {
    async fn increment(&self, key: &ParameterKey) -> Result<()> {
        let hits = self
            .backend
            .zincrby(&self.set_key, 1.0, &key.canonical())
            .await
            .map_err(unavailable)?;
        debug!("Incremented key={} hits={}", key, hits);
        Ok(())
    }

    async fn top_entry(&self) -> Result<Option<FrequencyEntry>> {
        let highest = self
            .backend
            .zrevrange_withscores(&self.set_key, 0, 0)
            .await
            .map_err(unavailable)?;
        let Some((member, score)) = highest.into_iter().next() else {
            return Ok(None);
        };

        let hits = score_to_hits(&member, score)?;
        if hits == 0 {
            return Ok(None);
        }

        // Smallest member sharing the top score; fall back to the first read
        let smallest = self
            .backend
            .zrangebyscore_withscores(&self.set_key, score, score, 0, 1)
            .await
            .map_err(unavailable)?;
        let member = smallest.into_iter().next().map(|(m, _)| m).unwrap_or(member);

        let key = ParameterKey::parse(&member)?;
        Ok(Some(FrequencyEntry::new(key, hits)))
    }

    async fn reset(&self) -> Result<()> {
        debug!("Resetting frequency set {}", self.set_key);
        self.backend
            .del(&self.set_key)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
