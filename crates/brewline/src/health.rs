// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Health and readiness endpoints built on axum.
//!
//! `GET /health` reports process liveness; `GET /ready` additionally pings
//! storage, so orchestrators can tell a hung database apart from a hung
//! process.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;

use brewline_config::model::ServerConfig;
use brewline_core::BrewlineError;
use brewline_core::traits::StorageAdapter;
use brewline_core::types::HealthStatus;

/// Shared state for the health handlers.
#[derive(Clone)]
pub struct HealthState {
    pub storage: Arc<dyn StorageAdapter>,
    pub start_time: Instant,
}

/// Binds and serves the health router until aborted.
pub async fn run_server(
    config: ServerConfig,
    storage: Arc<dyn StorageAdapter>,
) -> Result<(), BrewlineError> {
    let state = HealthState {
        storage,
        start_time: Instant::now(),
    };

    let app = Router::new()
        .route("/health", get(get_health))
        .route("/ready", get(get_ready))
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BrewlineError::Internal(format!("failed to bind health server to {addr}: {e}")))?;

    tracing::info!("health server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| BrewlineError::Internal(format!("health server error: {e}")))?;

    Ok(())
}

/// Liveness: the process is up.
async fn get_health(State(state): State<HealthState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Readiness: storage answers.
async fn get_ready(
    State(state): State<HealthState>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "ready"})),
        ),
        Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"status": "not_ready", "reason": reason})),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"status": "not_ready", "reason": e.to_string()})),
        ),
    }
}
