use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    model::api::{HealthDto, StatusDto},
    state::AppState,
};

/// Keep-alive status.
///
/// # Returns
/// - `200 OK` - Process is up, with seconds since startup
pub async fn status(State(state): State<AppState>) -> Json<StatusDto> {
    Json(StatusDto {
        status: "online".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Health check for uptime monitors.
///
/// # Returns
/// - `200 OK` - Always, with the current time in RFC 3339
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
