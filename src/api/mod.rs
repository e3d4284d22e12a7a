pub mod alerts;
pub mod charts;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod model;
pub mod stations;
pub mod summary;

use axum::{routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::context::AppState;

pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.cfg.server.request_timeout_secs);

    Router::new()
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/alerts", get(alerts::get_alerts))
        .route("/api/stations", get(stations::list_stations))
        .route("/api/charts", get(charts::get_charts))
        .route("/api/summary", get(summary::get_summary))
        .route("/api/model", get(model::get_model))
        .route("/healthz", get(health::healthz))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TimeoutLayer::new(timeout)))
        .layer(TraceLayer::new_for_http())
}

/// Round to a fixed number of decimals for display
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
