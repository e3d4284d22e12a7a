//! Station telemetry ingestion

pub mod loader;

pub use loader::{load_observations, read_observations, LoadError, REQUIRED_COLUMNS};
