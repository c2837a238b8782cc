// Configuration Module Tests
// Tests for ServerConfig, loading, defaults, overrides and conversions

use fizzbuzz_server::ServerConfig;
use fizzbuzz_server::config::{BackendKind, LogFormat, StatsStoreKind};
use std::collections::HashMap;
use std::fs;
use std::time::Duration;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_config_default_values() {
    let config = ServerConfig::default();

    // Server defaults
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.request_timeout(), Duration::from_millis(5000));

    // Storage defaults
    assert_eq!(config.storage.backend, BackendKind::Embedded);
    assert_eq!(config.storage.stats_store, StatsStoreKind::Ranked);
    assert!(config.storage.cache_enabled);
    assert_eq!(config.to_kv_config().max_memory_mb, 512);

    assert_eq!(config.api.max_limit, 500_000);
    assert_eq!(config.redis.url, "redis://127.0.0.1:6379");

    // Logging defaults
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_config_server_addr() {
    let config = ServerConfig::default();
    assert_eq!(config.server_addr(), "0.0.0.0:8080");

    let mut custom_config = ServerConfig::default();
    custom_config.server.host = "127.0.0.1".to_string();
    custom_config.server.port = 9090;
    assert_eq!(custom_config.server_addr(), "127.0.0.1:9090");
}

#[test]
fn test_config_from_partial_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.yml");
    fs::write(
        &path,
        r#"
server:
  port: 18080
storage:
  backend: redis
  stats_store: memory
  cache_enabled: false
redis:
  url: "redis://cache:6379"
"#,
    )
    .unwrap();

    let config = ServerConfig::from_file(&path).unwrap();

    assert_eq!(config.server.port, 18080);
    // Unspecified fields keep defaults
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.storage.backend, BackendKind::Redis);
    assert_eq!(config.storage.stats_store, StatsStoreKind::Memory);
    assert!(!config.storage.cache_enabled);
    assert_eq!(config.storage.max_memory_mb, 512);
    assert_eq!(config.redis.url, "redis://cache:6379");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_config_from_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = ServerConfig::from_file(dir.path().join("absent.yml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_config_rejects_unknown_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.yml");
    fs::write(&path, "storage:\n  backend: memcached\n").unwrap();

    assert!(ServerConfig::from_file(&path).is_err());
}

#[test]
fn test_config_log_format_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.yml");

    fs::write(&path, "logging:\n  format: pretty\n").unwrap();
    let config = ServerConfig::from_file(&path).unwrap();
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert_eq!(config.logging.level, "info");

    fs::write(&path, "logging:\n  format: jsno\n").unwrap();
    assert!(ServerConfig::from_file(&path).is_err());
}

#[test]
fn test_env_overrides() {
    let mut config = ServerConfig::default();
    config
        .apply_overrides(lookup(&[
            ("FIZZBUZZ_HOST", "127.0.0.1"),
            ("FIZZBUZZ_PORT", "3000"),
            ("FIZZBUZZ_REDIS_URL", "redis://other:6380"),
            ("FIZZBUZZ_STORAGE_BACKEND", "Redis"),
            ("FIZZBUZZ_STATS_STORE", "memory"),
            ("FIZZBUZZ_USE_CACHE", "false"),
        ]))
        .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:3000");
    assert_eq!(config.redis.url, "redis://other:6380");
    assert_eq!(config.storage.backend, BackendKind::Redis);
    assert_eq!(config.storage.stats_store, StatsStoreKind::Memory);
    assert!(!config.storage.cache_enabled);
}

#[test]
fn test_env_overrides_absent_keep_values() {
    let mut config = ServerConfig::default();
    config.apply_overrides(lookup(&[])).unwrap();
    assert_eq!(config.server_addr(), "0.0.0.0:8080");
    assert!(config.storage.cache_enabled);
}

#[test]
fn test_env_overrides_reject_invalid_values() {
    let mut config = ServerConfig::default();
    assert!(
        config
            .apply_overrides(lookup(&[("FIZZBUZZ_PORT", "eighty")]))
            .is_err()
    );
    assert!(
        config
            .apply_overrides(lookup(&[("FIZZBUZZ_STATS_STORE", "disk")]))
            .is_err()
    );
    assert!(
        config
            .apply_overrides(lookup(&[("FIZZBUZZ_USE_CACHE", "maybe")]))
            .is_err()
    );
}
