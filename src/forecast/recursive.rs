//! Multi-day forecasting by repeated one-step prediction.
//!
//! Each step appends a synthetic day to a private copy of the history,
//! rebuilds features over the whole extended series and feeds both
//! predictions back into the synthetic row before the next step.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use super::features::{FeatureBuilder, LONGEST_WINDOW};
use crate::domain::{rainfall_band, ForecastPoint, Observation};
use crate::ml::TrainedPredictor;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Insufficient history: need at least {required} rows, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Forecast horizon must be at least one day")]
    InvalidHorizon,

    #[error("Features undefined for {date}")]
    UndefinedFeatures { date: NaiveDate },

    #[error("Cannot extend the series past {last}")]
    DateOverflow { last: NaiveDate },

    #[error("Prediction failed at step {step}: {reason}")]
    Prediction { step: usize, reason: String },
}

/// Chains the groundwater and rainfall predictors over a horizon.
#[derive(Debug, Clone, Copy)]
pub struct RecursiveForecaster<'a> {
    groundwater: &'a TrainedPredictor,
    rainfall: &'a TrainedPredictor,
    band_ratio: f64,
    features: FeatureBuilder,
}

impl<'a> RecursiveForecaster<'a> {
    pub fn new(groundwater: &'a TrainedPredictor, rainfall: &'a TrainedPredictor) -> Self {
        Self {
            groundwater,
            rainfall,
            band_ratio: 0.1,
            features: FeatureBuilder,
        }
    }

    /// Relative half-width of the rainfall band
    pub fn with_band_ratio(mut self, band_ratio: f64) -> Self {
        self.band_ratio = band_ratio;
        self
    }

    /// Forecast `horizon` days past the end of `history`.
    ///
    /// `history` must be sorted by date without duplicates. It is never
    /// modified; synthetic days live only in a working copy.
    pub fn forecast(
        &self,
        history: &[Observation],
        horizon: usize,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        if horizon == 0 {
            return Err(ForecastError::InvalidHorizon);
        }
        let Some(&last_real) = history.last().filter(|_| history.len() >= LONGEST_WINDOW) else {
            return Err(ForecastError::InsufficientHistory {
                required: LONGEST_WINDOW,
                available: history.len(),
            });
        };

        let mut working = Vec::with_capacity(history.len() + horizon);
        working.extend_from_slice(history);

        let mut previous = last_real;
        let mut points = Vec::with_capacity(horizon);

        for step in 1..=horizon {
            let synthetic = previous
                .next_day(previous.groundwater_level_m, previous.rainfall_mm)
                .ok_or(ForecastError::DateOverflow { last: previous.date })?;
            working.push(synthetic);

            let derived = self.features.build(&working);
            let row = derived
                .last()
                .and_then(|d| d.feature_vector())
                .ok_or(ForecastError::UndefinedFeatures { date: synthetic.date })?;

            let groundwater = self
                .groundwater
                .predict(&row)
                .map_err(|e| ForecastError::Prediction { step, reason: e.to_string() })?;
            let rainfall = self
                .rainfall
                .predict(&row)
                .map_err(|e| ForecastError::Prediction { step, reason: e.to_string() })?
                .max(0.0);
            let (lower, upper) = rainfall_band(rainfall, self.band_ratio);

            debug!(step, date = %synthetic.date, groundwater, rainfall, "forecast step");

            if let Some(last) = working.last_mut() {
                last.groundwater_level_m = groundwater;
                last.rainfall_mm = rainfall;
                previous = *last;
            }

            points.push(ForecastPoint {
                date: synthetic.date,
                groundwater_level_m: groundwater,
                rainfall_mm: rainfall,
                rainfall_upper_mm: upper,
                rainfall_lower_mm: lower,
            });
        }

        Ok(points)
    }
}
