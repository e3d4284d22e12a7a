use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the multi-day forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Predicted groundwater level (m)
    pub groundwater_level_m: f64,
    /// Predicted rainfall (mm), never negative
    pub rainfall_mm: f64,
    pub rainfall_upper_mm: f64,
    pub rainfall_lower_mm: f64,
}

/// Fixed-ratio band around a rainfall prediction.
///
/// Returns `(lower, upper)` with `lower = max(0, p * (1 - ratio))` and
/// `upper = p * (1 + ratio)`.
pub fn rainfall_band(prediction_mm: f64, ratio: f64) -> (f64, f64) {
    let lower = (prediction_mm * (1.0 - ratio)).max(0.0);
    let upper = prediction_mm * (1.0 + ratio);
    (lower, upper)
}
