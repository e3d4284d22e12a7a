//! ML Model Training Pipeline
//!
//! Fits one predictor per target on the usable feature table, split
//! chronologically into a training prefix and a holdout suffix.

use super::{
    inference::TrainedPredictor, metrics::ForecastMetrics, models::Regressor,
    LinearRegressionModel, ModelMetadata, ModelType, StandardScaler,
};
use crate::domain::Variable;
use crate::forecast::features::{DerivedObservation, FEATURE_NAMES};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Training Dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDataset {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl TrainingDataset {
    pub fn new(features: Vec<Vec<f64>>, targets: Vec<f64>) -> Result<Self> {
        if features.len() != targets.len() {
            anyhow::bail!(
                "Feature and target count mismatch: {} features, {} targets",
                features.len(),
                targets.len()
            );
        }
        Ok(Self { features, targets })
    }

    /// Complete rows of the feature table against one target variable
    pub fn from_table(table: &[DerivedObservation], target: Variable) -> Self {
        let (features, targets) = table
            .iter()
            .filter_map(|row| {
                let x = row.feature_vector()?;
                Some((x.to_vec(), row.observation.value_of(target)))
            })
            .unzip();
        Self { features, targets }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Split chronologically: the first `floor(len * train_ratio)` rows train
    pub fn split(&self, train_ratio: f64) -> Result<(TrainingDataset, TrainingDataset)> {
        if train_ratio <= 0.0 || train_ratio >= 1.0 {
            anyhow::bail!("Train ratio must be between 0 and 1");
        }

        let split_idx = (self.len() as f64 * train_ratio).floor() as usize;

        let train = TrainingDataset {
            features: self.features[..split_idx].to_vec(),
            targets: self.targets[..split_idx].to_vec(),
        };

        let val = TrainingDataset {
            features: self.features[split_idx..].to_vec(),
            targets: self.targets[split_idx..].to_vec(),
        };

        Ok((train, val))
    }
}

/// Model selection and hyper-parameters
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TrainingConfig {
    pub kind: ModelType,
    #[validate(range(min = 0.5, max = 0.95))]
    pub train_ratio: f64,
    /// Boosting stages or forest trees
    #[validate(range(min = 1, max = 2000))]
    pub n_estimators: usize,
    /// Shrinkage for boosting, step size for the linear model
    #[validate(range(min = 0.0001, max = 1.0))]
    pub learning_rate: f64,
    #[validate(range(min = 1, max = 32))]
    pub max_depth: u16,
    #[validate(range(min = 2))]
    pub min_samples_split: usize,
    /// Gradient descent iterations for the linear model
    #[validate(range(min = 1))]
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            kind: ModelType::GradientBoosting,
            train_ratio: 0.8,
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 5,
            min_samples_split: 2,
            max_iterations: 1000,
            seed: 42,
        }
    }
}

/// Model Trainer
pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Fit scalers and model for `target` on the training split, then score
    /// the holdout split in physical units.
    pub fn train(&self, target: Variable, dataset: &TrainingDataset) -> Result<TrainedPredictor> {
        let (train, holdout) = dataset.split(self.config.train_ratio)?;
        if train.is_empty() {
            anyhow::bail!(
                "Not enough rows to train the {} model: {} usable rows",
                target,
                dataset.len()
            );
        }

        let input_scaler = StandardScaler::fit(&train.features)?;
        let output_scaler = StandardScaler::fit_column(&train.targets)?;

        let x: Vec<Vec<f64>> = train
            .features
            .iter()
            .map(|row| input_scaler.transform(row))
            .collect::<Result<_>>()?;
        let y: Vec<f64> = train
            .targets
            .iter()
            .map(|t| output_scaler.transform_value(*t))
            .collect::<Result<_>>()?;

        let model = self.fit_model(&x, &y)?;
        let metadata = ModelMetadata::new(
            target,
            model.model_type(),
            train.len(),
            FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        );
        let mut predictor = TrainedPredictor::new(model, input_scaler, output_scaler, metadata);

        if !holdout.is_empty() {
            let predicted = holdout
                .features
                .iter()
                .map(|row| predictor.predict(row))
                .collect::<Result<Vec<f64>>>()?;
            let metrics = ForecastMetrics::calculate(&holdout.targets, &predicted)?;
            info!(
                model = %predictor.metadata.model_id,
                train_rows = train.len(),
                holdout_rows = holdout.len(),
                mae = metrics.mae,
                rmse = metrics.rmse,
                r2 = metrics.r2,
                "model trained"
            );
            predictor.metadata.holdout_metrics = Some(metrics);
        } else {
            info!(
                model = %predictor.metadata.model_id,
                train_rows = train.len(),
                "model trained without holdout"
            );
        }

        Ok(predictor)
    }

    fn fit_model(&self, x: &[Vec<f64>], y: &[f64]) -> Result<Box<dyn Regressor>> {
        let cfg = &self.config;
        match cfg.kind {
            ModelType::LinearRegression => Ok(Box::new(LinearRegressionModel::fit(
                x,
                y,
                cfg.learning_rate,
                cfg.max_iterations,
            )?)),
            #[cfg(feature = "ml")]
            ModelType::GradientBoosting => Ok(Box::new(
                super::smartcore::SmartcoreGradientBoosting::train(
                    x,
                    y,
                    cfg.n_estimators,
                    cfg.learning_rate,
                    cfg.max_depth,
                    cfg.min_samples_split,
                )?,
            )),
            #[cfg(feature = "ml")]
            ModelType::RandomForest => {
                let params = super::smartcore::SmartcoreRandomForest::parameters(
                    cfg.n_estimators,
                    cfg.max_depth,
                    cfg.min_samples_split,
                    cfg.seed,
                );
                Ok(Box::new(super::smartcore::SmartcoreRandomForest::train(
                    x, y, params,
                )?))
            }
            #[cfg(not(feature = "ml"))]
            kind => anyhow::bail!("{} models require the `ml` feature", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize) -> TrainingDataset {
        let features = (0..n).map(|i| vec![i as f64, 1.0]).collect();
        let targets = (0..n).map(|i| 2.0 * i as f64 + 1.0).collect();
        TrainingDataset::new(features, targets).unwrap()
    }

    #[test]
    fn test_dataset_split() {
        let (train, val) = dataset(10).split(0.8).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(val.len(), 2);
        assert_eq!(val.targets[0], 17.0);

        assert!(dataset(4).split(1.0).is_err());
    }

    #[test]
    fn test_dataset_rejects_mismatch() {
        assert!(TrainingDataset::new(vec![vec![1.0]], vec![]).is_err());
    }

    #[test]
    fn test_train_linear_with_holdout() {
        let trainer = ModelTrainer::new(TrainingConfig {
            kind: ModelType::LinearRegression,
            learning_rate: 0.1,
            max_iterations: 3000,
            ..TrainingConfig::default()
        });

        let predictor = trainer.train(Variable::GroundwaterLevel, &dataset(20)).unwrap();

        assert_eq!(predictor.metadata.training_samples, 16);
        assert_eq!(predictor.metadata.model_type, ModelType::LinearRegression);
        let metrics = predictor.metadata.holdout_metrics.as_ref().unwrap();
        assert_eq!(metrics.sample_count, 4);
        assert!(metrics.mae < 0.5);
        assert!((predictor.predict(&[25.0, 1.0]).unwrap() - 51.0).abs() < 0.5);
    }

    #[test]
    fn test_train_needs_rows() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        assert!(trainer.train(Variable::Rainfall, &dataset(1)).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrainingConfig::default().validate().is_ok());
        let bad = TrainingConfig {
            train_ratio: 0.99,
            ..TrainingConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[cfg(feature = "ml")]
    #[test]
    fn test_train_gradient_boosting() {
        let trainer = ModelTrainer::new(TrainingConfig {
            n_estimators: 50,
            ..TrainingConfig::default()
        });
        let predictor = trainer.train(Variable::Rainfall, &dataset(30)).unwrap();
        assert_eq!(predictor.metadata.model_type, ModelType::GradientBoosting);
        assert_eq!(predictor.metadata.model_id, "rainfall_gradient_boosting");
    }
}
