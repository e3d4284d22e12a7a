use axum::{extract::State, Json};
use serde::Serialize;

use crate::context::AppState;
use crate::forecast::HistoricalStats;
use crate::ml::{metrics::ForecastQuality, ModelMetadata};

#[derive(Debug, Serialize)]
pub struct ModelEntry {
    #[serde(flatten)]
    pub metadata: ModelMetadata,
    /// Holdout quality grade, absent without a holdout
    pub quality: Option<ForecastQuality>,
}

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub models: Vec<ModelEntry>,
    pub groundwater_stats: HistoricalStats,
}

/// GET /api/model - predictor metadata and holdout metrics
pub async fn get_model(State(st): State<AppState>) -> Json<ModelResponse> {
    let models = st
        .station
        .models()
        .into_iter()
        .map(|meta| ModelEntry {
            metadata: meta.clone(),
            quality: meta.holdout_metrics.as_ref().map(|m| m.quality()),
        })
        .collect();

    Json(ModelResponse {
        models,
        groundwater_stats: *st.station.groundwater_stats(),
    })
}
