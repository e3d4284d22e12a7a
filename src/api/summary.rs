use axum::{extract::State, Json};

use super::error::ApiError;
use crate::context::AppState;
use crate::domain::StationSummary;

/// GET /api/summary - latest station day with its status
pub async fn get_summary(State(st): State<AppState>) -> Result<Json<StationSummary>, ApiError> {
    Ok(Json(st.station.summary()?))
}
