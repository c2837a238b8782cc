use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::storage::KVConfig;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: Server,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub redis: RedisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    /// Upper bound for one request's cache and store calls
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Largest accepted `limit` in a generate request
    pub max_limit: i64,
}

/// Technology providing the key-value and ranked-set primitives
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process KV store and sorted sets
    #[default]
    Embedded,
    /// External Redis server
    Redis,
}

/// Variant of the frequency store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatsStoreKind {
    /// Mutex-guarded map, scanned for the top entry
    Memory,
    /// Sorted set on the configured backend
    #[default]
    Ranked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub stats_store: StatsStoreKind,
    pub cache_enabled: bool,
    /// Memory limit of the embedded KV store
    pub max_memory_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub url: String,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_ms: 5000,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { max_limit: 500_000 }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Embedded,
            stats_store: StatsStoreKind::Ranked,
            cache_enabled: true,
            max_memory_mb: 512,
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl ServerConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply `FIZZBUZZ_*` environment variables on top of the loaded values
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("FIZZBUZZ_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FIZZBUZZ_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid FIZZBUZZ_PORT '{}'", port))?;
        }
        if let Some(url) = lookup("FIZZBUZZ_REDIS_URL") {
            self.redis.url = url;
        }
        if let Some(backend) = lookup("FIZZBUZZ_STORAGE_BACKEND") {
            self.storage.backend = parse_enum(&backend, "FIZZBUZZ_STORAGE_BACKEND")?;
        }
        if let Some(store) = lookup("FIZZBUZZ_STATS_STORE") {
            self.storage.stats_store = parse_enum(&store, "FIZZBUZZ_STATS_STORE")?;
        }
        if let Some(enabled) = lookup("FIZZBUZZ_USE_CACHE") {
            self.storage.cache_enabled = enabled
                .parse()
                .with_context(|| format!("invalid FIZZBUZZ_USE_CACHE '{}'", enabled))?;
        }
        Ok(())
    }

    /// Convert to the embedded KV store configuration
    pub fn to_kv_config(&self) -> KVConfig {
        KVConfig {
            max_memory_mb: self.storage.max_memory_mb,
        }
    }

    /// Get server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

/// Parse a lowercase enum name the same way the YAML loader does
fn parse_enum<T: serde::de::DeserializeOwned>(raw: &str, name: &str) -> anyhow::Result<T> {
    serde_yaml::from_str(&raw.to_lowercase()).with_context(|| format!("invalid {} '{}'", name, raw))
}
