use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{error::ApiError, round_to};
use crate::context::AppState;
use crate::forecast::round_score;

#[derive(Debug, Deserialize, Validate)]
pub struct DashboardQuery {
    /// Forecast horizon override
    #[validate(range(min = 1, max = 60))]
    pub days: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub predicted_groundwater: f64,
    pub station_pulse_score: f64,
    pub rainfall_dates: Vec<NaiveDate>,
    pub predicted_rainfall: Vec<f64>,
    pub rainfall_upper: Vec<f64>,
    pub rainfall_lower: Vec<f64>,
    pub gw_dates: Vec<NaiveDate>,
    pub predicted_gw: Vec<f64>,
    pub today_gw_level: f64,
}

/// GET /api/dashboard - today's prediction, pulse score and the recursive forecast
pub async fn get_dashboard(
    State(st): State<AppState>,
    Query(q): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    q.validate()?;

    let station = &st.station;
    let today = station.predict_today()?;
    let pulse = station.groundwater_stats().pulse_score(today);
    let points = match q.days {
        Some(days) => station.forecast_days(days)?,
        None => station.forecast()?,
    };

    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
    Ok(Json(DashboardResponse {
        predicted_groundwater: round_to(today, 2),
        station_pulse_score: round_score(pulse),
        rainfall_dates: dates.clone(),
        predicted_rainfall: points.iter().map(|p| round_to(p.rainfall_mm, 2)).collect(),
        rainfall_upper: points.iter().map(|p| round_to(p.rainfall_upper_mm, 2)).collect(),
        rainfall_lower: points.iter().map(|p| round_to(p.rainfall_lower_mm, 2)).collect(),
        gw_dates: dates,
        predicted_gw: points.iter().map(|p| round_to(p.groundwater_level_m, 3)).collect(),
        today_gw_level: round_to(today, 3),
    }))
}
