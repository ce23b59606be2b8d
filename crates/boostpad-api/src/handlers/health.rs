//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: i64,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: String,
}

/// Liveness probe; does not touch dependencies
pub async fn health_check() -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp,
    })
}

/// Readiness probe; verifies the database answers
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    match state.db.health_check().await {
        Ok(health) if health.healthy => Ok(Json(ReadinessResponse {
            status: "ready".to_string(),
            database: "healthy".to_string(),
        })),
        _ => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}
