//! Station context: the immutable state every request reads.
//!
//! Built once at startup by load -> validate schema -> build features ->
//! fit predictors, then shared behind an `Arc`.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, ForecastConfig, StationConfig};
use crate::domain::{ForecastPoint, Observation, StationStatus, StationSummary, Variable};
use crate::forecast::{
    daily_changes, round_score, DerivedObservation, FeatureBuilder, ForecastError,
    HistoricalStats, LinearTrend, RecursiveForecaster, LONGEST_WINDOW,
};
use crate::ingest::load_observations;
use crate::ml::{ModelMetadata, ModelTrainer, TrainedPredictor, TrainingConfig, TrainingDataset};

/// Rows summed for the latest-week figures
const WEEK: usize = 7;

pub struct StationContext {
    station: StationConfig,
    forecast: ForecastConfig,
    history: Vec<Observation>,
    table: Vec<DerivedObservation>,
    groundwater: TrainedPredictor,
    rainfall: TrainedPredictor,
    groundwater_stats: HistoricalStats,
}

impl StationContext {
    pub fn load(cfg: &Config) -> Result<Self> {
        let history = load_observations(&cfg.data.csv_path)
            .with_context(|| format!("loading {}", cfg.data.csv_path.display()))?;
        Self::from_observations(history, cfg.station.clone(), &cfg.model, cfg.forecast.clone())
    }

    /// Build features and fit both predictors over a sorted, deduplicated series
    pub fn from_observations(
        history: Vec<Observation>,
        station: StationConfig,
        training: &TrainingConfig,
        forecast: ForecastConfig,
    ) -> Result<Self> {
        let table = FeatureBuilder.build_usable(&history);
        if table.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                required: LONGEST_WINDOW,
                available: history.len(),
            }
            .into());
        }
        info!(rows = history.len(), usable_rows = table.len(), "feature table built");

        let trainer = ModelTrainer::new(training.clone());
        let groundwater = trainer
            .train(
                Variable::GroundwaterLevel,
                &TrainingDataset::from_table(&table, Variable::GroundwaterLevel),
            )
            .context("training groundwater model")?;
        let rainfall = trainer
            .train(
                Variable::Rainfall,
                &TrainingDataset::from_table(&table, Variable::Rainfall),
            )
            .context("training rainfall model")?;

        let levels: Vec<f64> = table.iter().map(|d| d.observation.groundwater_level_m).collect();
        let groundwater_stats = HistoricalStats::from_values(&levels);

        Ok(Self {
            station,
            forecast,
            history,
            table,
            groundwater,
            rainfall,
            groundwater_stats,
        })
    }

    pub fn station(&self) -> &StationConfig {
        &self.station
    }

    pub fn forecast_config(&self) -> &ForecastConfig {
        &self.forecast
    }

    pub fn history(&self) -> &[Observation] {
        &self.history
    }

    /// Usable feature table (complete rows only)
    pub fn table(&self) -> &[DerivedObservation] {
        &self.table
    }

    pub fn latest(&self) -> &DerivedObservation {
        // non-empty by construction
        &self.table[self.table.len() - 1]
    }

    /// Last `n` rows of the usable table
    pub fn tail(&self, n: usize) -> &[DerivedObservation] {
        &self.table[self.table.len().saturating_sub(n)..]
    }

    pub fn groundwater_stats(&self) -> &HistoricalStats {
        &self.groundwater_stats
    }

    /// Groundwater level predicted for the latest usable day
    pub fn predict_today(&self) -> Result<f64> {
        let row = self
            .latest()
            .feature_vector()
            .ok_or(ForecastError::UndefinedFeatures {
                date: self.latest().date(),
            })?;
        self.groundwater.predict(&row)
    }

    pub fn pulse_score(&self) -> Result<f64> {
        Ok(self.groundwater_stats.pulse_score(self.predict_today()?))
    }

    /// Classification of the pulse score at its reported precision
    pub fn station_status(&self) -> Result<StationStatus> {
        Ok(StationStatus::classify(round_score(self.pulse_score()?)))
    }

    /// Configured-horizon forecast from the full history
    pub fn forecast(&self) -> Result<Vec<ForecastPoint>, ForecastError> {
        self.forecast_days(self.forecast.horizon_days)
    }

    pub fn forecast_days(&self, horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError> {
        RecursiveForecaster::new(&self.groundwater, &self.rainfall)
            .with_band_ratio(self.forecast.band_ratio)
            .forecast(&self.history, horizon)
    }

    /// Daily groundwater change regressed on evaporation
    pub fn evaporation_trend(&self) -> Option<LinearTrend> {
        let (x, y) = self.changes_against(|d| d.evaporation_mm, false);
        LinearTrend::fit(&x, &y)
    }

    /// Mean groundwater change per mm of rainfall
    pub fn rainfall_effect(&self) -> Option<f64> {
        let (x, y) = self.changes_against(|d| d.observation.rainfall_mm, true);
        LinearTrend::fit(&x, &y).map(|t| t.slope)
    }

    /// Pairs `(driver, daily change)`; the first row's missing change is
    /// dropped or counted as zero
    fn changes_against<F>(&self, driver: F, first_as_zero: bool) -> (Vec<f64>, Vec<f64>)
    where
        F: Fn(&DerivedObservation) -> f64,
    {
        let levels: Vec<f64> = self.table.iter().map(|d| d.observation.groundwater_level_m).collect();
        self.table
            .iter()
            .zip(daily_changes(&levels))
            .filter_map(|(row, change)| {
                let change = match change {
                    Some(c) => c,
                    None if first_as_zero => 0.0,
                    None => return None,
                };
                Some((driver(row), change))
            })
            .unzip()
    }

    pub fn summary(&self) -> Result<StationSummary> {
        let latest = self.latest();
        let predicted = self.predict_today()?;
        let status = self.station_status()?;
        let week = self.tail(WEEK);

        Ok(StationSummary {
            station_id: self.station.id.clone(),
            date: latest.date(),
            predicted_groundwater_m: predicted,
            groundwater_7day_avg_m: latest.gw_rolling_mean[0]
                .unwrap_or_else(|| mean(week.iter().map(|d| d.observation.groundwater_level_m))),
            rainfall_today_mm: latest.observation.rainfall_mm,
            rainfall_7day_total_mm: latest.rainfall_sum[0]
                .unwrap_or_else(|| week.iter().map(|d| d.observation.rainfall_mm).sum()),
            evaporation_today_mm: latest.evaporation_mm,
            pulse_score: status.pulse_score,
            health_status: status.alert_level.health_label(),
            alert_level: status.alert_level,
            color: status.color,
            message: status.message,
            rainfall_effect_m_per_mm: self.rainfall_effect(),
        })
    }

    /// Metadata of the groundwater and rainfall predictors
    pub fn models(&self) -> [&ModelMetadata; 2] {
        [&self.groundwater.metadata, &self.rainfall.metadata]
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub station: Arc<StationContext>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let station = StationContext::load(&cfg)?;
        Ok(Self::with_station(cfg, station))
    }

    pub fn with_station(cfg: Config, station: StationContext) -> Self {
        Self {
            cfg: Arc::new(cfg),
            station: Arc::new(station),
        }
    }
}
