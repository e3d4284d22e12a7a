//! Machine Learning Module
//!
//! Predictors behind the forecaster:
//! - Standard scaling of inputs and targets
//! - Regressors (gradient boosting and random forest on smartcore, linear fallback)
//! - Chronological training and holdout evaluation
//! - Trained predictors combining model and scalers for inference

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Variable;

pub mod inference;
pub mod metrics;
pub mod models;
pub mod scaler;
pub mod training;

#[cfg(feature = "ml")]
pub mod smartcore;

pub use inference::TrainedPredictor;
pub use metrics::{ForecastMetrics, MetricsError};
pub use models::{LinearRegressionModel, Regressor};
pub use scaler::StandardScaler;
pub use training::{ModelTrainer, TrainingConfig, TrainingDataset};

/// ML Model Type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelType {
    GradientBoosting,
    RandomForest,
    #[serde(alias = "linear")]
    LinearRegression,
}

/// ML Model Metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub model_type: ModelType,
    pub target: Variable,
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    pub feature_names: Vec<String>,
    /// Metrics on the chronological holdout, absent when the holdout is empty
    pub holdout_metrics: Option<ForecastMetrics>,
}

impl ModelMetadata {
    pub fn new(
        target: Variable,
        model_type: ModelType,
        training_samples: usize,
        feature_names: Vec<String>,
    ) -> Self {
        Self {
            model_id: format!("{}_{}", target, model_type),
            model_type,
            target,
            trained_at: Utc::now(),
            training_samples,
            feature_names,
            holdout_metrics: None,
        }
    }
}
