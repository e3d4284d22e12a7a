//! Forecasting core: evaporation, features, recursive forecast and pulse
//! scoring.

pub mod evaporation;
pub mod features;
pub mod pulse;
pub mod recursive;
pub mod trend;

pub use evaporation::evaporation_mm;
pub use features::{DerivedObservation, FeatureBuilder, FEATURE_COUNT, FEATURE_NAMES, LONGEST_WINDOW};
pub use pulse::{pulse_score, round_score, HistoricalStats};
pub use recursive::{ForecastError, RecursiveForecaster};
pub use trend::{daily_changes, LinearTrend};
