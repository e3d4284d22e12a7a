use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::context::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StationResponse {
    pub id: String,
    pub name: String,
    pub status: String,
    pub last_update: NaiveDate,
}

/// GET /api/stations
pub async fn list_stations(State(st): State<AppState>) -> Json<Vec<StationResponse>> {
    let station = st.station.station();
    Json(vec![StationResponse {
        id: station.id.clone(),
        name: station.name.clone(),
        status: "Active".to_string(),
        last_update: st.station.latest().date(),
    }])
}
