use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use serde::Serialize;

use crate::context::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    observations: usize,
    usable_rows: usize,
    last_observation: Option<NaiveDate>,
}

/// GET /healthz - liveness with a snapshot of the loaded series
pub async fn healthz(State(st): State<AppState>) -> impl IntoResponse {
    let station = &st.station;
    let response = HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now(),
        observations: station.history().len(),
        usable_rows: station.table().len(),
        last_observation: station.history().last().map(|o| o.date),
    };
    (StatusCode::OK, Json(response))
}
