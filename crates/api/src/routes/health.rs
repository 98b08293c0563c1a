//! Liveness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since startup.
    pub uptime: f64,
    pub environment: String,
}

/// Report that the process is up. Touches no stores.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let now: DateTime<Utc> = Utc::now();
    Json(HealthResponse {
        status: "OK",
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.uptime_secs(),
        environment: state.config().environment.clone(),
    })
}
