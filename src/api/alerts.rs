use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ApiError;
use crate::context::AppState;
use crate::domain::{AlertLevel, StatusColor};

#[derive(Debug, Serialize, Deserialize)]
pub struct AlertResponse {
    pub station_id: String,
    pub pulse_score: f64,
    pub alert_level: AlertLevel,
    pub color: StatusColor,
    pub message: String,
}

/// GET /api/alerts - current alert tier of the station
pub async fn get_alerts(State(st): State<AppState>) -> Result<Json<Vec<AlertResponse>>, ApiError> {
    let status = st.station.station_status()?;
    let station_id = &st.station.station().alert_id;

    if status.alert_level.requires_notification() {
        warn!(
            station_id = %station_id,
            pulse_score = status.pulse_score,
            alert_level = %status.alert_level,
            "station alert raised"
        );
    }

    Ok(Json(vec![AlertResponse {
        station_id: station_id.clone(),
        pulse_score: status.pulse_score,
        alert_level: status.alert_level,
        color: status.color,
        message: status.message.to_string(),
    }]))
}
