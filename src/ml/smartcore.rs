//! smartcore-backed regressors
//!
//! Tree ensembles for the groundwater and rainfall models. Gradient boosting
//! is built from smartcore regression trees fitted to successive residuals;
//! the random forest wraps smartcore's own ensemble.

use super::{models::Regressor, ModelType};
use anyhow::Result;

use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;
type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Row-major samples to a smartcore matrix
fn to_matrix(x: &[Vec<f64>]) -> Result<DenseMatrix<f64>> {
    let Some(first) = x.first() else {
        anyhow::bail!("Cannot train on empty dataset");
    };
    let n_samples = x.len();
    let n_features = first.len();

    let mut flat_data = Vec::with_capacity(n_samples * n_features);
    for row in x {
        if row.len() != n_features {
            anyhow::bail!("All feature vectors must have the same length");
        }
        flat_data.extend_from_slice(row);
    }

    Ok(DenseMatrix::new(n_samples, n_features, flat_data, false))
}

fn check_targets(x: &[Vec<f64>], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        anyhow::bail!(
            "Feature and target count mismatch: {} features, {} targets",
            x.len(),
            y.len()
        );
    }
    Ok(())
}

/// Gradient-boosted regression trees (squared loss)
pub struct SmartcoreGradientBoosting {
    base_prediction: f64,
    learning_rate: f64,
    n_features: usize,
    stages: Vec<Tree>,
}

impl SmartcoreGradientBoosting {
    pub fn train(
        x: &[Vec<f64>],
        y: &[f64],
        n_estimators: usize,
        learning_rate: f64,
        max_depth: u16,
        min_samples_split: usize,
    ) -> Result<Self> {
        check_targets(x, y)?;
        let matrix = to_matrix(x)?;

        let base_prediction = y.iter().sum::<f64>() / y.len() as f64;
        let mut current = vec![base_prediction; y.len()];
        let mut stages = Vec::with_capacity(n_estimators);

        for _ in 0..n_estimators {
            let residuals: Vec<f64> = y.iter().zip(&current).map(|(t, p)| t - p).collect();
            let params = DecisionTreeRegressorParameters::default()
                .with_max_depth(max_depth)
                .with_min_samples_split(min_samples_split);

            let tree = DecisionTreeRegressor::fit(&matrix, &residuals, params)
                .map_err(|e| anyhow::anyhow!("Boosting stage training failed: {:?}", e))?;
            let update = tree
                .predict(&matrix)
                .map_err(|e| anyhow::anyhow!("Boosting stage prediction failed: {:?}", e))?;

            for (c, u) in current.iter_mut().zip(&update) {
                *c += learning_rate * u;
            }
            stages.push(tree);
        }

        Ok(Self {
            base_prediction,
            learning_rate,
            n_features: x[0].len(),
            stages,
        })
    }

    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }
}

impl Regressor for SmartcoreGradientBoosting {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            anyhow::bail!(
                "Feature count mismatch: expected {}, got {}",
                self.n_features,
                features.len()
            );
        }
        let x = DenseMatrix::new(1, self.n_features, features.to_vec(), false);

        let mut value = self.base_prediction;
        for tree in &self.stages {
            let out = tree
                .predict(&x)
                .map_err(|e| anyhow::anyhow!("Prediction failed: {:?}", e))?;
            value += self.learning_rate * out[0];
        }
        Ok(value)
    }

    fn model_type(&self) -> ModelType {
        ModelType::GradientBoosting
    }
}

/// smartcore RandomForest wrapper
pub struct SmartcoreRandomForest {
    model: Forest,
    n_features: usize,
}

impl SmartcoreRandomForest {
    pub fn parameters(
        n_trees: usize,
        max_depth: u16,
        min_samples_split: usize,
        seed: u64,
    ) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            max_depth: Some(max_depth),
            min_samples_leaf: 1,
            min_samples_split,
            n_trees,
            m: None,
            keep_samples: false,
            seed,
        }
    }

    pub fn train(x: &[Vec<f64>], y: &[f64], params: RandomForestRegressorParameters) -> Result<Self> {
        check_targets(x, y)?;
        let matrix = to_matrix(x)?;

        let model = RandomForestRegressor::fit(&matrix, &y.to_vec(), params)
            .map_err(|e| anyhow::anyhow!("RandomForest training failed: {:?}", e))?;

        Ok(Self {
            model,
            n_features: x[0].len(),
        })
    }
}

impl Regressor for SmartcoreRandomForest {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            anyhow::bail!(
                "Feature count mismatch: expected {}, got {}",
                self.n_features,
                features.len()
            );
        }
        let x = DenseMatrix::new(1, self.n_features, features.to_vec(), false);

        let predictions = self
            .model
            .predict(&x)
            .map_err(|e| anyhow::anyhow!("Prediction failed: {:?}", e))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Model returned empty predictions"))
    }

    fn model_type(&self) -> ModelType {
        ModelType::RandomForest
    }
}
