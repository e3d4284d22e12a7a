use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::round_to;
use crate::context::AppState;
use crate::forecast::LinearTrend;

/// Rows in the water balance window
const BALANCE_DAYS: usize = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaporationPoint {
    pub date: NaiveDate,
    pub evaporation_mm: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WaterLevelPoint {
    pub date: NaiveDate,
    #[serde(rename = "Groundwatelevel_m")]
    pub groundwater_level_m: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartsResponse {
    pub evaporation: Vec<EvaporationPoint>,
    pub water_levels: Vec<WaterLevelPoint>,
    pub water_balance_pie: Vec<PieSlice>,
    /// Daily groundwater change against evaporation
    pub evaporation_trend: Option<TrendLine>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl From<LinearTrend> for TrendLine {
    fn from(trend: LinearTrend) -> Self {
        Self {
            slope: trend.slope,
            intercept: trend.intercept,
        }
    }
}

/// GET /api/charts - recent evaporation and level series with the weekly balance
pub async fn get_charts(State(st): State<AppState>) -> Json<ChartsResponse> {
    let station = &st.station;
    let recent = station.tail(station.forecast_config().chart_window);
    let week = station.tail(BALANCE_DAYS);

    let water_balance_pie = if week.is_empty() {
        Vec::new()
    } else {
        vec![
            PieSlice {
                name: "Evaporation".to_string(),
                value: round_to(week.iter().map(|d| d.evaporation_mm).sum(), 2),
            },
            PieSlice {
                name: "Water Level".to_string(),
                value: round_to(week.iter().map(|d| d.observation.groundwater_level_m).sum(), 2),
            },
        ]
    };

    Json(ChartsResponse {
        evaporation: recent
            .iter()
            .map(|d| EvaporationPoint {
                date: d.date(),
                evaporation_mm: d.evaporation_mm,
            })
            .collect(),
        water_levels: recent
            .iter()
            .map(|d| WaterLevelPoint {
                date: d.date(),
                groundwater_level_m: d.observation.groundwater_level_m,
            })
            .collect(),
        water_balance_pie,
        evaporation_trend: station.evaporation_trend().map(TrendLine::from),
    })
}
