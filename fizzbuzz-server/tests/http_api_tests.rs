// HTTP API Tests
// Drives the REST surface end to end against a server bound to a random port

use async_trait::async_trait;
use fizzbuzz_server::config::{ServerConfig, StatsStoreKind};
use fizzbuzz_server::core::Result;
use fizzbuzz_server::{
    AppState, FizzBuzzError, FizzBuzzService, FrequencyEntry, FrequencyStore, ParameterKey,
    StatsService, build_app_state, create_router,
};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const CLASSIC: &str = "1,2,Fizz,4,Buzz,Fizz,7,8,Fizz,Buzz,11,Fizz,13,14,FizzBuzz";

async fn serve(state: AppState) -> String {
    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    url
}

async fn spawn_test_server(stats_store: StatsStoreKind) -> String {
    let mut config = ServerConfig::default();
    config.storage.stats_store = stats_store;
    config.api.max_limit = 1000;

    serve(build_app_state(&config).await.unwrap()).await
}

async fn post_fizzbuzz(client: &Client, base_url: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/fizzbuzz", base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
}

// ==================== GENERATE ====================

#[tokio::test]
async fn test_fizzbuzz_returns_sequence() {
    let base_url = spawn_test_server(StatsStoreKind::Ranked).await;
    let client = Client::new();

    let response = post_fizzbuzz(
        &client,
        &base_url,
        json!({"int1": 3, "int2": 5, "limit": 15, "str1": "Fizz", "str2": "Buzz"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response"], CLASSIC);
}

#[tokio::test]
async fn test_fizzbuzz_equal_divisors() {
    let base_url = spawn_test_server(StatsStoreKind::Memory).await;
    let client = Client::new();

    let response = post_fizzbuzz(
        &client,
        &base_url,
        json!({"int1": 3, "int2": 3, "limit": 5, "str1": "Fizz", "str2": "Buzz"}),
    )
    .await;

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response"], "1,2,FizzBuzz,4,5");
}

#[tokio::test]
async fn test_fizzbuzz_validation_returns_400() {
    let base_url = spawn_test_server(StatsStoreKind::Ranked).await;
    let client = Client::new();

    let response = post_fizzbuzz(
        &client,
        &base_url,
        json!({"int1": 0, "int2": 5, "limit": 5000, "str1": "a", "str2": "b"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "invalid_request");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("int1 must be greater than 0"));
    assert!(message.contains("limit must be less than 1000"));
}

#[tokio::test]
async fn test_fizzbuzz_malformed_payload_returns_400() {
    let base_url = spawn_test_server(StatsStoreKind::Ranked).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/fizzbuzz", base_url))
        .header("content-type", "application/json")
        .body(r#"{"int1": "three"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "invalid_payload");
}

// ==================== STATS ====================

#[tokio::test]
async fn test_stats_empty_returns_404() {
    for kind in [StatsStoreKind::Memory, StatsStoreKind::Ranked] {
        let base_url = spawn_test_server(kind).await;
        let client = Client::new();

        let response = client
            .get(format!("{}/stats", base_url))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], "no_requests_found");
    }
}

#[tokio::test]
async fn test_stats_reports_most_frequent_request() {
    for kind in [StatsStoreKind::Memory, StatsStoreKind::Ranked] {
        let base_url = spawn_test_server(kind).await;
        let client = Client::new();

        for _ in 0..3 {
            post_fizzbuzz(
                &client,
                &base_url,
                json!({"int1": 2, "int2": 7, "limit": 100, "str1": "foo", "str2": "bar"}),
            )
            .await;
        }
        post_fizzbuzz(
            &client,
            &base_url,
            json!({"int1": 3, "int2": 5, "limit": 15, "str1": "Fizz", "str2": "Buzz"}),
        )
        .await;

        let response = client
            .get(format!("{}/stats", base_url))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({"int1": 2, "int2": 7, "limit": 100, "str1": "foo", "str2": "bar", "hits": 3})
        );
    }
}

#[tokio::test]
async fn test_stats_reset_then_404() {
    let base_url = spawn_test_server(StatsStoreKind::Ranked).await;
    let client = Client::new();

    post_fizzbuzz(
        &client,
        &base_url,
        json!({"int1": 3, "int2": 5, "limit": 15, "str1": "Fizz", "str2": "Buzz"}),
    )
    .await;

    let response = client
        .delete(format!("{}/stats", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let response = client
        .get(format!("{}/stats", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_requests_counted_exactly() {
    let base_url = spawn_test_server(StatsStoreKind::Memory).await;
    let client = Client::new();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        let base_url = base_url.clone();
        handles.push(tokio::spawn(async move {
            let response = post_fizzbuzz(
                &client,
                &base_url,
                json!({"int1": 3, "int2": 5, "limit": 15, "str1": "Fizz", "str2": "Buzz"}),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let body: Value = client
        .get(format!("{}/stats", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["hits"], 20);
}

// ==================== FAILURES ====================

struct DownStore;

#[async_trait]
impl FrequencyStore for DownStore {
    async fn increment(&self, _key: &ParameterKey) -> Result<()> {
        Err(FizzBuzzError::StoreUnavailable("connection refused".into()))
    }

    async fn top_entry(&self) -> Result<Option<FrequencyEntry>> {
        Err(FizzBuzzError::StoreUnavailable("connection refused".into()))
    }

    async fn reset(&self) -> Result<()> {
        Err(FizzBuzzError::StoreUnavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn test_store_failure_returns_503() {
    let store: Arc<dyn FrequencyStore> = Arc::new(DownStore);
    let base_url = serve(AppState {
        fizzbuzz: FizzBuzzService::new(store.clone()),
        stats: StatsService::new(store),
        max_limit: 1000,
        request_timeout: Duration::from_secs(5),
    })
    .await;
    let client = Client::new();

    let response = post_fizzbuzz(
        &client,
        &base_url,
        json!({"int1": 3, "int2": 5, "limit": 15, "str1": "Fizz", "str2": "Buzz"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "store_unavailable");

    let response = client
        .get(format!("{}/stats", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_check() {
    let base_url = spawn_test_server(StatsStoreKind::Ranked).await;

    let body: Value = Client::new()
        .get(format!("{}/health", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "fizzbuzz-server");
}
