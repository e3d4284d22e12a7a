use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of station telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// Groundwater level (m)
    pub groundwater_level_m: f64,
    /// Daily rainfall (mm)
    pub rainfall_mm: f64,
    /// Air temperature (Celsius)
    pub temperature_c: f64,
    /// Relative humidity (0-100%)
    pub humidity_pct: f64,
}

impl Observation {
    /// Synthetic observation for the following day.
    ///
    /// Weather is carried over unchanged; groundwater and rainfall are seeded
    /// with the given values. Returns `None` past the last representable date.
    pub fn next_day(&self, groundwater_level_m: f64, rainfall_mm: f64) -> Option<Self> {
        Some(Self {
            date: self.date.succ_opt()?,
            groundwater_level_m,
            rainfall_mm,
            ..*self
        })
    }

    pub fn value_of(&self, variable: Variable) -> f64 {
        match variable {
            Variable::GroundwaterLevel => self.groundwater_level_m,
            Variable::Rainfall => self.rainfall_mm,
        }
    }
}

/// Variables the station predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Variable {
    GroundwaterLevel,
    Rainfall,
}
