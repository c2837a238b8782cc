//! Composition root: builds every shared component once from configuration

use crate::cache::{BackendCache, NoOpCache, ResultCache};
use crate::config::{BackendKind, ServerConfig, StatsStoreKind};
use crate::server::AppState;
use crate::service::{FizzBuzzService, StatsService};
use crate::stats::{FrequencyStore, InMemoryFrequencyStore, RankedFrequencyStore};
use crate::storage::{KVStore, RedisBackend, SortedSetStore};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

/// Build the application state for the configured backend and variants
pub async fn build_app_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let storage = &config.storage;
    info!(
        "Storage backend={:?}, stats_store={:?}, cache_enabled={}",
        storage.backend, storage.stats_store, storage.cache_enabled
    );

    let (cache, ranked) = match storage.backend {
        BackendKind::Embedded => {
            let kv = Arc::new(KVStore::new(config.to_kv_config()));
            let sorted_sets = Arc::new(SortedSetStore::new());
            let cache: Arc<dyn ResultCache> = Arc::new(BackendCache::new(kv));
            let ranked: Arc<dyn FrequencyStore> = Arc::new(RankedFrequencyStore::new(sorted_sets));
            (cache, ranked)
        }
        BackendKind::Redis => {
            let redis = Arc::new(
                RedisBackend::connect(&config.redis.url)
                    .await
                    .with_context(|| {
                        format!("failed to connect to Redis at {}", config.redis.url)
                    })?,
            );
            let cache: Arc<dyn ResultCache> = Arc::new(BackendCache::new(redis.clone()));
            let ranked: Arc<dyn FrequencyStore> = Arc::new(RankedFrequencyStore::new(redis));
            (cache, ranked)
        }
    };

    let store: Arc<dyn FrequencyStore> = match storage.stats_store {
        StatsStoreKind::Memory => Arc::new(InMemoryFrequencyStore::new()),
        StatsStoreKind::Ranked => ranked,
    };
    let cache: Arc<dyn ResultCache> = if storage.cache_enabled {
        cache
    } else {
        Arc::new(NoOpCache)
    };

    Ok(AppState {
        fizzbuzz: FizzBuzzService::new(store.clone()).with_cache(cache),
        stats: StatsService::new(store),
        max_limit: config.api.max_limit,
        request_timeout: config.request_timeout(),
    })
}
