//! Liveness and fallback handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// Store connectivity; the key name is part of the public contract
    #[serde(rename = "mongodb")]
    pub database: String,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/health - Liveness plus store connectivity
///
/// Always 200 while the process is serving; the `mongodb` field reports
/// whether the credential store is reachable.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.auth_service.store().is_healthy().await {
        "Connected"
    } else {
        "Disconnected"
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running successfully".to_string(),
        database: database.to_string(),
        timestamp: Utc::now(),
    })
}

/// Fallback for unmatched routes
pub async fn not_found(uri: axum::http::Uri) -> ApiError {
    tracing::debug!(path = %uri.path(), "Route not found");
    ApiError::NotFound("API endpoint not found".to_string())
}
