pub mod app;
pub mod cache;
pub mod config;
pub mod core;
pub mod server;
pub mod service;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use app::build_app_state;
pub use cache::{BackendCache, NoOpCache, ResultCache};
pub use config::ServerConfig;
pub use self::core::{FizzBuzzError, FrequencyEntry, ParameterKey, SequenceEngine};
pub use server::{AppState, create_router};
pub use service::{FizzBuzzService, StatsService};
pub use stats::{FrequencyStore, InMemoryFrequencyStore, RankedFrequencyStore};
pub use storage::{KVConfig, KVStore, RedisBackend, SortedSetStore};
