use super::{BackendError, BackendResult, KeyValueBackend};
use async_trait::async_trait;
use parking_lot::RwLock;
use radix_trie::Trie;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for the embedded KV store
#[derive(Debug, Clone)]
pub struct KVConfig {
    /// Maximum memory in MB
    pub max_memory_mb: usize,
}

impl Default for KVConfig {
    fn default() -> Self {
        Self { max_memory_mb: 512 }
    }
}

/// Statistics for the embedded KV store
#[derive(Debug, Default, Clone)]
pub struct KVStats {
    /// Total number of keys
    pub total_keys: usize,
    /// Estimated memory usage in bytes
    pub total_memory_bytes: usize,
    /// Number of GET operations
    pub gets: u64,
    /// Number of SET operations
    pub sets: u64,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
}

impl KVStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Key-Value store using radix trie for memory-efficient storage
///
/// Values never expire; the memory limit rejects writes that would exceed it.
#[derive(Clone)]
pub struct KVStore {
    data: Arc<RwLock<Trie<String, String>>>,
    stats: Arc<RwLock<KVStats>>,
    config: KVConfig,
}

impl KVStore {
    /// Create a new KV store with the given configuration
    pub fn new(config: KVConfig) -> Self {
        info!(
            "Initializing embedded KV store with max_memory={}MB",
            config.max_memory_mb
        );

        Self {
            data: Arc::new(RwLock::new(Trie::new())),
            stats: Arc::new(RwLock::new(KVStats::default())),
            config,
        }
    }

    /// Set a key-value pair, replacing any previous value
    pub fn set(&self, key: &str, value: String) -> BackendResult<()> {
        debug!("SET key={}, size={}", key, value.len());

        let entry_size = Self::estimate_entry_size(key, &value);
        let max_bytes = self.config.max_memory_mb * 1024 * 1024;

        let mut data = self.data.write();
        let mut stats = self.stats.write();

        let previous_size = data
            .get(key)
            .map(|old| Self::estimate_entry_size(key, old))
            .unwrap_or(0);
        let projected = stats.total_memory_bytes - previous_size + entry_size;
        if projected > max_bytes {
            warn!(
                "Memory limit exceeded: {}/{}",
                stats.total_memory_bytes, max_bytes
            );
            return Err(BackendError::MemoryLimitExceeded);
        }

        let is_new = data.insert(key.to_string(), value).is_none();

        stats.sets += 1;
        stats.total_memory_bytes = projected;
        if is_new {
            stats.total_keys += 1;
        }

        Ok(())
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<String> {
        debug!("GET key={}", key);

        let data = self.data.read();
        let mut stats = self.stats.write();
        stats.gets += 1;

        match data.get(key) {
            Some(value) => {
                stats.hits += 1;
                Some(value.clone())
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    /// Check if a key exists
    pub fn exists(&self, key: &str) -> bool {
        self.data.read().get(key).is_some()
    }

    /// Get statistics
    pub fn stats(&self) -> KVStats {
        self.stats.read().clone()
    }

    /// Estimate memory size of an entry
    fn estimate_entry_size(key: &str, value: &str) -> usize {
        key.len() + value.len() + std::mem::size_of::<String>() * 2
    }
}

#[async_trait]
impl KeyValueBackend for KVStore {
    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(KVStore::get(self, key))
    }

    async fn set(&self, key: &str, value: &str) -> BackendResult<()> {
        KVStore::set(self, key, value.to_string())
    }
}
