use crate::core::{FizzBuzzError, FrequencyEntry, Result};
use crate::stats::FrequencyStore;
use std::sync::Arc;

/// Read facade over the frequency store
#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn FrequencyStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn FrequencyStore>) -> Self {
        Self { store }
    }

    /// Most requested parameters, or [`FizzBuzzError::NoRequestsFound`] when nothing was recorded
    pub async fn get_stats(&self) -> Result<FrequencyEntry> {
        self.store
            .top_entry()
            .await?
            .ok_or(FizzBuzzError::NoRequestsFound)
    }

    /// Drop all recorded statistics
    pub async fn reset_stats(&self) -> Result<()> {
        self.store.reset().await
    }
}
