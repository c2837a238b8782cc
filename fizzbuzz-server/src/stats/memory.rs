use super::FrequencyStore;
use crate::core::{FrequencyEntry, ParameterKey, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Process-local frequency store
///
/// All access goes through one mutex, so concurrent increments never lose
/// updates. Counts are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryFrequencyStore {
    hits: Mutex<HashMap<ParameterKey, u64>>,
}

impl InMemoryFrequencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current hit count for a key
    pub fn hits(&self, key: &ParameterKey) -> u64 {
        self.hits.lock().get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys tracked
    pub fn len(&self) -> usize {
        self.hits.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.lock().is_empty()
    }
}

#[async_trait]
impl FrequencyStore for InMemoryFrequencyStore {
    async fn increment(&self, key: &ParameterKey) -> Result<()> {
        let mut hits = self.hits.lock();
        let count = hits.entry(key.clone()).or_insert(0);
        *count += 1;
        debug!("Incremented key={} hits={}", key, count);
        Ok(())
    }

    async fn top_entry(&self) -> Result<Option<FrequencyEntry>> {
        let hits = self.hits.lock();

        // Linear scan: highest count, then smallest canonical key
        let mut best: Option<(&ParameterKey, u64, String)> = None;
        for (key, &count) in hits.iter() {
            if count == 0 {
                continue;
            }
            let better = match &best {
                None => true,
                Some((_, best_count, best_canonical)) => match count.cmp(best_count) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => key.canonical() < *best_canonical,
                },
            };
            if better {
                best = Some((key, count, key.canonical()));
            }
        }

        Ok(best.map(|(key, count, _)| FrequencyEntry::new(key.clone(), count)))
    }

    async fn reset(&self) -> Result<()> {
        debug!("Resetting in-memory frequency store");
        self.hits.lock().clear();
        Ok(())
    }
}
