//! Request frequency tracking
//!
//! Every successful generate call increments the count of its
//! [`ParameterKey`]; the top entry is the key with the most hits. Among equal
//! counts the lexicographically smallest canonical key wins, in every variant.

pub mod memory;
pub mod ranked;

use crate::core::{FrequencyEntry, ParameterKey, Result};
use async_trait::async_trait;

pub use memory::InMemoryFrequencyStore;
pub use ranked::{RankedFrequencyStore, STATS_SET_KEY};

#[async_trait]
pub trait FrequencyStore: Send + Sync {
    /// Record one more hit for the key, creating it at one
    async fn increment(&self, key: &ParameterKey) -> Result<()>;

    /// Entry with the highest hit count, `None` when nothing has been recorded
    async fn top_entry(&self) -> Result<Option<FrequencyEntry>>;

    /// Erase every tracked entry
    async fn reset(&self) -> Result<()>;
}
