//! Pulse score: how far a predicted level sits from its historical norm.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Standard deviations below this are treated as zero
const MIN_STD_DEV: f64 = 1e-10;
/// Score lost per standard deviation of distance from the mean
const POINTS_PER_SIGMA: f64 = 20.0;

/// Sample mean and standard deviation of a historical series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoricalStats {
    pub mean: f64,
    /// Sample (n-1) standard deviation, NaN with fewer than two samples
    pub std_dev: f64,
    pub samples: usize,
}

impl HistoricalStats {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            mean: values.iter().copied().mean(),
            std_dev: values.iter().copied().std_dev(),
            samples: values.len(),
        }
    }

    pub fn pulse_score(&self, predicted: f64) -> f64 {
        pulse_score(predicted, self.mean, self.std_dev)
    }
}

/// `clamp(100 - 20|z|, 0, 100)`; a zero or undefined spread scores 100
pub fn pulse_score(predicted: f64, mean: f64, std_dev: f64) -> f64 {
    match z_score(predicted, mean, std_dev) {
        Some(z) => (100.0 - POINTS_PER_SIGMA * z.abs()).clamp(0.0, 100.0),
        None => 100.0,
    }
}

/// Standard score of `value`, `None` when the spread is zero or undefined
fn z_score(value: f64, mean: f64, std_dev: f64) -> Option<f64> {
    if std_dev.is_nan() || std_dev.abs() < MIN_STD_DEV {
        return None;
    }
    Some((value - mean) / std_dev)
}

/// Score rounded to one decimal, the precision it is reported and classified at
pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
