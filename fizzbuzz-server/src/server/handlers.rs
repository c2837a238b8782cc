use crate::core::{FizzBuzzError, FrequencyEntry, Result};
use crate::service::{FizzBuzzService, StatsService};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub fizzbuzz: FizzBuzzService,
    pub stats: StatsService,
    /// Largest accepted `limit`
    pub max_limit: i64,
    /// Bound on each service call
    pub request_timeout: Duration,
}

// Request/Response types for REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FizzBuzzRequest {
    pub int1: i64,
    pub int2: i64,
    pub limit: i64,
    #[serde(default)]
    pub str1: String,
    #[serde(default)]
    pub str2: String,
}

impl FizzBuzzRequest {
    /// Check field ranges, reporting every violation at once
    pub fn validate(&self, max_limit: i64) -> Result<()> {
        let mut problems = Vec::new();

        if self.int1 < 1 {
            problems.push("int1 must be greater than 0".to_string());
        }
        if self.int2 < 1 {
            problems.push("int2 must be greater than 0".to_string());
        }
        if self.limit < 1 {
            problems.push("limit must be greater than 0".to_string());
        }
        if self.limit > max_limit {
            problems.push(format!("limit must be less than {}", max_limit));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(FizzBuzzError::InvalidRequest(problems.join(", ")))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FizzBuzzResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub int1: i64,
    pub int2: i64,
    pub limit: i64,
    pub str1: String,
    pub str2: String,
    pub hits: u64,
}

impl From<FrequencyEntry> for StatsResponse {
    fn from(entry: FrequencyEntry) -> Self {
        Self {
            int1: entry.key.first_divisor,
            int2: entry.key.second_divisor,
            limit: entry.key.limit,
            str1: entry.key.first_word,
            str2: entry.key.second_word,
            hits: entry.hits,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
}

/// Run a service call under the request timeout
///
/// Expiry drops the call future but cannot undo backend writes it already
/// issued: a generate call that times out after its increment reached the
/// store still answers 504 while the hit stays counted.
async fn with_timeout<T>(timeout: Duration, call: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| FizzBuzzError::Timeout(timeout.as_millis() as u64))?
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fizzbuzz-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// FIZZBUZZ endpoint - compute the sequence and count the request
pub async fn fizzbuzz_generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FizzBuzzRequest>, JsonRejection>,
) -> Result<Json<FizzBuzzResponse>> {
    let Json(req) = payload.map_err(|e| FizzBuzzError::InvalidPayload(e.body_text()))?;
    debug!(
        "REST FIZZBUZZ int1={}, int2={}, limit={}",
        req.int1, req.int2, req.limit
    );

    req.validate(state.max_limit)?;

    let response = with_timeout(
        state.request_timeout,
        state
            .fizzbuzz
            .generate_fizzbuzz(req.int1, req.int2, req.limit, &req.str1, &req.str2),
    )
    .await
    .inspect_err(|e| error!("Failed to generate FizzBuzz response: {}", e))?;

    Ok(Json(FizzBuzzResponse { response }))
}

/// STATS endpoint - most frequent request parameters
pub async fn stats_get(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    debug!("REST STATS");

    let entry = with_timeout(state.request_timeout, state.stats.get_stats()).await?;

    Ok(Json(entry.into()))
}

/// STATS RESET endpoint - drop all recorded statistics
pub async fn stats_reset(State(state): State<AppState>) -> Result<Json<ResetResponse>> {
    debug!("REST STATS RESET");

    with_timeout(state.request_timeout, state.stats.reset_stats())
        .await
        .inspect_err(|e| error!("Failed to reset statistics: {}", e))?;

    Ok(Json(ResetResponse { success: true }))
}
