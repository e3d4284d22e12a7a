//! ML Inference Engine
//!
//! A trained predictor owns its model and both scalers, so callers feed raw
//! feature vectors and get predictions back in physical units.

use super::{models::Regressor, ModelMetadata, StandardScaler};
use anyhow::Result;

pub struct TrainedPredictor {
    pub metadata: ModelMetadata,
    model: Box<dyn Regressor>,
    input_scaler: StandardScaler,
    output_scaler: StandardScaler,
}

impl TrainedPredictor {
    pub fn new(
        model: Box<dyn Regressor>,
        input_scaler: StandardScaler,
        output_scaler: StandardScaler,
        metadata: ModelMetadata,
    ) -> Self {
        Self {
            metadata,
            model,
            input_scaler,
            output_scaler,
        }
    }

    /// Scale, predict, and map the result back to target units
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let scaled = self.input_scaler.transform(features)?;
        let raw = self.model.predict(&scaled)?;
        let value = self.output_scaler.inverse_value(raw)?;
        if !value.is_finite() {
            anyhow::bail!("{} produced a non-finite prediction", self.metadata.model_id);
        }
        Ok(value)
    }

    pub fn n_features(&self) -> usize {
        self.input_scaler.n_features()
    }
}

impl std::fmt::Debug for TrainedPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedPredictor")
            .field("metadata", &self.metadata)
            .field("n_features", &self.n_features())
            .finish()
    }
}
