use anyhow::{Context, Result};
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use validator::Validate;

use crate::ml::TrainingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "GWP__";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub server: ServerConfig,
    pub data: DataConfig,
    #[validate(nested)]
    pub station: StationConfig,
    #[serde(default)]
    #[validate(nested)]
    pub model: TrainingConfig,
    #[serde(default)]
    #[validate(nested)]
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub csv_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StationConfig {
    /// Identifier listed by `/api/stations`
    #[validate(length(min = 1))]
    pub id: String,
    /// Identifier reported on alerts
    #[validate(length(min = 1))]
    pub alert_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ForecastConfig {
    #[validate(range(min = 1, max = 60))]
    pub horizon_days: usize,
    /// Relative half-width of the rainfall band
    #[validate(range(min = 0.0, max = 1.0))]
    pub band_ratio: f64,
    /// Rows returned by the chart series
    #[validate(range(min = 1))]
    pub chart_window: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            band_ratio: 0.1,
            chart_window: 100,
        }
    }
}

impl Config {
    /// `.env`, then `config/default.toml`, then `GWP__` environment overrides
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let figment = Figment::new()
            .merge(Toml::file(DEFAULT_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Self = figment.extract().context("invalid configuration")?;
        cfg.validate().context("configuration failed validation")?;
        Ok(cfg)
    }
}
