//! Per-column standardization, fitted on training rows only.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Columns with a standard deviation below this keep a unit scale
const MIN_SCALE: f64 = 1e-10;

/// Zero-mean, unit-variance scaling per column.
///
/// Uses the population standard deviation. Constant columns get scale 1 so
/// they map to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit on row-major samples
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let Some(first) = rows.first() else {
            anyhow::bail!("Cannot fit scaler on empty data");
        };
        let n_features = first.as_ref().len();
        if rows.iter().any(|r| r.as_ref().len() != n_features) {
            anyhow::bail!("All rows must have the same number of columns");
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; n_features];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row.as_ref()) {
                *m += v;
            }
        }
        for m in means.iter_mut() {
            *m /= n;
        }

        let mut variances = vec![0.0; n_features];
        for row in rows {
            for ((var, v), m) in variances.iter_mut().zip(row.as_ref()).zip(&means) {
                *var += (v - m).powi(2);
            }
        }

        let scales = variances
            .into_iter()
            .map(|var| {
                let std = (var / n).sqrt();
                if std < MIN_SCALE {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        Ok(Self { means, scales })
    }

    /// Fit a single-column scaler (for targets)
    pub fn fit_column(values: &[f64]) -> Result<Self> {
        let rows: Vec<[f64; 1]> = values.iter().map(|v| [*v]).collect();
        Self::fit(&rows)
    }

    /// Scaler that leaves values unchanged
    pub fn identity(n_features: usize) -> Self {
        Self {
            means: vec![0.0; n_features],
            scales: vec![1.0; n_features],
        }
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row)?;
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    pub fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row)?;
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (m, s))| v * s + m)
            .collect())
    }

    /// Scale a single-column value
    pub fn transform_value(&self, value: f64) -> Result<f64> {
        Ok(self.transform(&[value])?[0])
    }

    /// Undo scaling of a single-column value
    pub fn inverse_value(&self, value: f64) -> Result<f64> {
        Ok(self.inverse_transform(&[value])?[0])
    }

    fn check_width(&self, row: &[f64]) -> Result<()> {
        if row.len() != self.n_features() {
            anyhow::bail!(
                "Scaler column mismatch: expected {}, got {}",
                self.n_features(),
                row.len()
            );
        }
        Ok(())
    }
}
