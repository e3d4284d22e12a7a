#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use groundwater_pulse::config::{Config, DataConfig, ForecastConfig, ServerConfig, StationConfig};
use groundwater_pulse::context::StationContext;
use groundwater_pulse::domain::Observation;
use groundwater_pulse::ml::{ModelType, TrainingConfig};
use std::io::Write;
use std::path::PathBuf;

pub fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// Constant level 10 m, no rain, 20 °C, 50 % humidity
pub fn constant_series(days: usize) -> Vec<Observation> {
    (0..days)
        .map(|i| Observation {
            date: start() + Days::new(i as u64),
            groundwater_level_m: 10.0,
            rainfall_mm: 0.0,
            temperature_c: 20.0,
            humidity_pct: 50.0,
        })
        .collect()
}

/// Seasonal-looking series with rain pulses recharging the level
pub fn varied_series(days: usize) -> Vec<Observation> {
    let mut level = 12.0;
    (0..days)
        .map(|i| {
            let rain = if i % 5 == 0 { 4.0 + (i % 3) as f64 } else { 0.0 };
            level += 0.03 * rain - 0.02;
            Observation {
                date: start() + Days::new(i as u64),
                groundwater_level_m: level,
                rainfall_mm: rain,
                temperature_c: 18.0 + (i % 7) as f64,
                humidity_pct: 45.0 + (i % 11) as f64,
            }
        })
        .collect()
}

pub fn station() -> StationConfig {
    StationConfig {
        id: "GW-001".into(),
        alert_id: "TGPH2SW0203".into(),
        name: "Station A".into(),
    }
}

pub fn training(kind: ModelType) -> TrainingConfig {
    TrainingConfig {
        kind,
        n_estimators: 50,
        ..TrainingConfig::default()
    }
}

pub fn config(csv_path: PathBuf) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            request_timeout_secs: 30,
        },
        data: DataConfig { csv_path },
        station: station(),
        model: training(ModelType::LinearRegression),
        forecast: ForecastConfig::default(),
    }
}

pub fn context(history: Vec<Observation>, kind: ModelType) -> StationContext {
    StationContext::from_observations(history, station(), &training(kind), ForecastConfig::default())
        .unwrap()
}

/// Write observations in the station export format
pub fn write_csv(observations: &[Observation]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "date,Groundwatelevel_m,rainfall_mm,temperature_c,humidity_pct").unwrap();
    for o in observations {
        writeln!(
            file,
            "{},{},{},{},{}",
            o.date.format("%Y-%m-%d"),
            o.groundwater_level_m,
            o.rainfall_mm,
            o.temperature_c,
            o.humidity_pct
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}
