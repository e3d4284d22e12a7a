//! Groundwater station monitoring: feature engineering, recursive
//! multi-day forecasting and pulse scoring over daily telemetry.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod forecast;
pub mod ingest;
pub mod ml;
pub mod telemetry;
