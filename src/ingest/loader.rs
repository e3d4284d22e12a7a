//! CSV telemetry loader
//!
//! Reads the station export, validates its schema and returns observations
//! sorted by date. Every problem is fatal: a forecast built on a partially
//! read series is worse than none.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::domain::Observation;

/// Header of the groundwater column in station exports
pub const GROUNDWATER_COLUMN: &str = "Groundwatelevel_m";
const GROUNDWATER_ALIAS: &str = "groundwater_level_m";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "date",
    GROUNDWATER_COLUMN,
    "rainfall_mm",
    "temperature_c",
    "humidity_pct",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid date {value:?} on line {line}")]
    InvalidDate { line: u64, value: String },

    #[error("Invalid record on line {line}: {source}")]
    InvalidRecord {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Non-finite {column} value {value} on line {line}")]
    NonFinite {
        line: u64,
        column: &'static str,
        value: f64,
    },

    #[error("Both Groundwatelevel_m and groundwater_level_m columns present")]
    AmbiguousGroundwaterColumn,

    #[error("Duplicate date {0}")]
    DuplicateDate(NaiveDate),

    #[error("No observations in input")]
    Empty,

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct TelemetryRecord {
    date: String,
    #[serde(rename = "Groundwatelevel_m", alias = "groundwater_level_m")]
    groundwater_level_m: f64,
    rainfall_mm: f64,
    temperature_c: f64,
    humidity_pct: f64,
}

/// Load observations from a CSV file
pub fn load_observations<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let observations = read_observations(file)?;
    info!(
        path = %path.display(),
        rows = observations.len(),
        first = %observations[0].date,
        last = %observations[observations.len() - 1].date,
        "telemetry loaded"
    );
    Ok(observations)
}

/// Parse observations from any CSV source; the result is sorted by date
pub fn read_observations<R: Read>(source: R) -> Result<Vec<Observation>, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let headers = reader.headers()?.clone();
    check_columns(&headers)?;

    let mut observations = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: TelemetryRecord = record
            .deserialize(Some(&headers))
            .map_err(|source| LoadError::InvalidRecord { line, source })?;

        let values = [
            (GROUNDWATER_COLUMN, raw.groundwater_level_m),
            ("rainfall_mm", raw.rainfall_mm),
            ("temperature_c", raw.temperature_c),
            ("humidity_pct", raw.humidity_pct),
        ];
        if let Some(&(column, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LoadError::NonFinite { line, column, value });
        }

        observations.push(Observation {
            date: parse_date(&raw.date).ok_or_else(|| LoadError::InvalidDate {
                line,
                value: raw.date.clone(),
            })?,
            groundwater_level_m: raw.groundwater_level_m,
            rainfall_mm: raw.rainfall_mm,
            temperature_c: raw.temperature_c,
            humidity_pct: raw.humidity_pct,
        });
    }

    if observations.is_empty() {
        return Err(LoadError::Empty);
    }

    observations.sort_by_key(|o| o.date);
    if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(LoadError::DuplicateDate(pair[0].date));
    }

    Ok(observations)
}

fn check_columns(headers: &StringRecord) -> Result<(), LoadError> {
    let has = |name: &str| headers.iter().any(|h| h == name);
    if has(GROUNDWATER_COLUMN) && has(GROUNDWATER_ALIAS) {
        return Err(LoadError::AmbiguousGroundwaterColumn);
    }
    for column in REQUIRED_COLUMNS {
        let present = has(column) || (column == GROUNDWATER_COLUMN && has(GROUNDWATER_ALIAS));
        if !present {
            return Err(LoadError::MissingColumn(column));
        }
    }
    Ok(())
}

/// `YYYY-MM-DD` or `DD-MM-YYYY`, optionally followed by a time of day
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.split([' ', 'T']).next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}
