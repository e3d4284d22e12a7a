use chrono::NaiveDate;
use serde::Serialize;

use super::{AlertLevel, StatusColor};

/// Snapshot of the latest station day, as printed by the station report.
#[derive(Debug, Clone, Serialize)]
pub struct StationSummary {
    pub station_id: String,
    pub date: NaiveDate,
    pub predicted_groundwater_m: f64,
    pub groundwater_7day_avg_m: f64,
    pub rainfall_today_mm: f64,
    pub rainfall_7day_total_mm: f64,
    pub evaporation_today_mm: f64,
    pub pulse_score: f64,
    pub health_status: &'static str,
    pub alert_level: AlertLevel,
    pub color: StatusColor,
    pub message: &'static str,
    /// Mean groundwater change per mm of rainfall (m/mm); `None` when rainfall never varies
    pub rainfall_effect_m_per_mm: Option<f64>,
}
