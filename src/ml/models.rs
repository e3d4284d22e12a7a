//! Regressor seam and the dependency-free linear model.

use super::ModelType;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A fitted model mapping a scaled feature row to a scaled target.
pub trait Regressor: Send + Sync {
    /// Predict a value from one feature row
    fn predict(&self, features: &[f64]) -> Result<f64>;

    fn model_type(&self) -> ModelType;
}

/// Linear regression fitted by batch gradient descent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Fit on (already scaled) rows
    pub fn fit(x: &[Vec<f64>], y: &[f64], learning_rate: f64, iterations: usize) -> Result<Self> {
        if x.is_empty() || y.is_empty() {
            anyhow::bail!("Cannot train on empty dataset");
        }
        if x.len() != y.len() {
            anyhow::bail!(
                "Feature and target count mismatch: {} features, {} targets",
                x.len(),
                y.len()
            );
        }

        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            anyhow::bail!("All feature vectors must have the same length");
        }

        let n = x.len() as f64;
        let mut coefficients = vec![0.0; n_features];
        let mut intercept = 0.0;

        for _ in 0..iterations {
            let mut coef_gradients = vec![0.0; n_features];
            let mut intercept_gradient = 0.0;

            for (row, target) in x.iter().zip(y) {
                let error = dot(row, &coefficients) + intercept - target;
                for (g, f) in coef_gradients.iter_mut().zip(row) {
                    *g += error * f / n;
                }
                intercept_gradient += error / n;
            }

            for (c, g) in coefficients.iter_mut().zip(&coef_gradients) {
                *c -= learning_rate * g;
            }
            intercept -= learning_rate * intercept_gradient;
        }

        Ok(Self::new(coefficients, intercept))
    }
}

impl Regressor for LinearRegressionModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            anyhow::bail!(
                "Feature count mismatch: expected {}, got {}",
                self.coefficients.len(),
                features.len()
            );
        }
        Ok(dot(features, &self.coefficients) + self.intercept)
    }

    fn model_type(&self) -> ModelType {
        ModelType::LinearRegression
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
