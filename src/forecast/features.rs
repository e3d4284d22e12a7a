//! Feature engineering for the groundwater and rainfall models
//!
//! Turns a chronological series of observations into rolling, lag and
//! calendar features. Windows count rows; the series is daily.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::f64::consts::PI;

use super::evaporation::evaporation_mm;
use crate::domain::Observation;

/// Trailing window sizes for rolling features
pub const ROLLING_WINDOWS: [usize; 3] = [7, 14, 30];
/// Lag offsets for lag features
pub const LAGS: [usize; 3] = [1, 7, 14];
/// Rows of lead-in needed before a row has every feature
pub const LONGEST_WINDOW: usize = 30;

pub const FEATURE_COUNT: usize = 19;

/// Model input columns, in feature-vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gw_rolling_mean_7",
    "gw_rolling_mean_14",
    "gw_rolling_mean_30",
    "rainfall_sum_7",
    "rainfall_sum_14",
    "rainfall_sum_30",
    "gw_lag_1",
    "gw_lag_7",
    "gw_lag_14",
    "rain_lag_1",
    "rain_lag_7",
    "rain_lag_14",
    "rainfall_mm",
    "temperature_c",
    "humidity_pct",
    "evaporation_mm",
    "day_of_year",
    "month_sin",
    "month_cos",
];

/// Observation extended with derived features
///
/// Rolling and lag columns are `None` where the window reaches back before
/// the start of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedObservation {
    pub observation: Observation,
    /// Evaporation estimate (mm)
    pub evaporation_mm: f64,
    /// Mean groundwater level over each of `ROLLING_WINDOWS`
    pub gw_rolling_mean: [Option<f64>; 3],
    /// Total rainfall over each of `ROLLING_WINDOWS`
    pub rainfall_sum: [Option<f64>; 3],
    /// Groundwater level at each of `LAGS`
    pub gw_lag: [Option<f64>; 3],
    /// Rainfall at each of `LAGS`
    pub rain_lag: [Option<f64>; 3],
    /// Day of year (1-366)
    pub day_of_year: u32,
    pub month_sin: f64,
    pub month_cos: f64,
}

impl DerivedObservation {
    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }

    /// Model input for this row, or `None` while any window is incomplete
    /// or any value is non-finite
    pub fn feature_vector(&self) -> Option<[f64; FEATURE_COUNT]> {
        let [m7, m14, m30] = self.gw_rolling_mean;
        let [s7, s14, s30] = self.rainfall_sum;
        let [g1, g7, g14] = self.gw_lag;
        let [r1, r7, r14] = self.rain_lag;
        let obs = &self.observation;

        let vector = [
            m7?,
            m14?,
            m30?,
            s7?,
            s14?,
            s30?,
            g1?,
            g7?,
            g14?,
            r1?,
            r7?,
            r14?,
            obs.rainfall_mm,
            obs.temperature_c,
            obs.humidity_pct,
            self.evaporation_mm,
            self.day_of_year as f64,
            self.month_sin,
            self.month_cos,
        ];
        vector.iter().all(|v| v.is_finite()).then_some(vector)
    }

    /// True once every rolling and lag feature is defined
    pub fn is_complete(&self) -> bool {
        self.feature_vector().is_some()
    }
}

/// Builds derived features over a whole series.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Derive features for every row.
    ///
    /// The input must be sorted by date without duplicates; the output has
    /// the same length and order.
    pub fn build(&self, observations: &[Observation]) -> Vec<DerivedObservation> {
        let levels: Vec<f64> = observations.iter().map(|o| o.groundwater_level_m).collect();
        let rainfall: Vec<f64> = observations.iter().map(|o| o.rainfall_mm).collect();

        let level_sums = ROLLING_WINDOWS.map(|w| rolling_sums(&levels, w));
        let rain_sums = ROLLING_WINDOWS.map(|w| rolling_sums(&rainfall, w));
        let level_lags = LAGS.map(|l| lagged(&levels, l));
        let rain_lags = LAGS.map(|l| lagged(&rainfall, l));

        observations
            .iter()
            .enumerate()
            .map(|(i, obs)| {
                let (month_sin, month_cos) = month_harmonics(obs.date);
                DerivedObservation {
                    observation: *obs,
                    evaporation_mm: evaporation_mm(obs.temperature_c, obs.humidity_pct),
                    gw_rolling_mean: std::array::from_fn(|k| {
                        level_sums[k][i].map(|sum| sum / ROLLING_WINDOWS[k] as f64)
                    }),
                    rainfall_sum: std::array::from_fn(|k| rain_sums[k][i]),
                    gw_lag: std::array::from_fn(|k| level_lags[k][i]),
                    rain_lag: std::array::from_fn(|k| rain_lags[k][i]),
                    day_of_year: obs.date.ordinal(),
                    month_sin,
                    month_cos,
                }
            })
            .collect()
    }

    /// Derive features and keep only the complete rows
    pub fn build_usable(&self, observations: &[Observation]) -> Vec<DerivedObservation> {
        self.build(observations)
            .into_iter()
            .filter(DerivedObservation::is_complete)
            .collect()
    }
}

/// `(sin, cos)` of the month angle `2π·month/12`
pub fn month_harmonics(date: NaiveDate) -> (f64, f64) {
    let angle = 2.0 * PI * date.month() as f64 / 12.0;
    (angle.sin(), angle.cos())
}

/// Trailing window sums aligned with `values`; `None` until a full window exists
pub fn rolling_sums(values: &[f64], window_size: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            (window_size > 0 && i + 1 >= window_size)
                .then(|| values[i + 1 - window_size..=i].iter().sum::<f64>())
        })
        .collect()
}

/// Values shifted back by `lag` rows, aligned with `values`
pub fn lagged(values: &[f64], lag: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| i.checked_sub(lag).map(|j| values[j]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn series(n: usize) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..n)
            .map(|i| Observation {
                date: start + chrono::Duration::days(i as i64),
                groundwater_level_m: 10.0 + i as f64,
                rainfall_mm: (i % 5) as f64,
                temperature_c: 20.0,
                humidity_pct: 50.0,
            })
            .collect()
    }

    #[rstest]
    #[case(0, 7)]
    #[case(1, 14)]
    #[case(2, 30)]
    fn test_rolling_window_boundary(#[case] k: usize, #[case] window: usize) {
        let rows = FeatureBuilder.build(&series(40));

        assert!(rows[window - 2].gw_rolling_mean[k].is_none());
        assert!(rows[window - 2].rainfall_sum[k].is_none());
        assert!(rows[window - 1].gw_rolling_mean[k].is_some());
        assert!(rows[window - 1].rainfall_sum[k].is_some());
    }

    #[test]
    fn test_rolling_mean_values() {
        let rows = FeatureBuilder.build(&series(40));
        // levels 10..=16 over the first week
        assert_eq!(rows[6].gw_rolling_mean[0], Some(13.0));
        // rainfall 0,1,2,3,4,0,1
        assert_eq!(rows[6].rainfall_sum[0], Some(11.0));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 7)]
    #[case(2, 14)]
    fn test_lag_equals_earlier_row(#[case] k: usize, #[case] lag: usize) {
        let obs = series(40);
        let rows = FeatureBuilder.build(&obs);

        assert!(rows[lag - 1].gw_lag[k].is_none());
        for i in lag..obs.len() {
            assert_eq!(rows[i].gw_lag[k], Some(obs[i - lag].groundwater_level_m));
            assert_eq!(rows[i].rain_lag[k], Some(obs[i - lag].rainfall_mm));
        }
    }

    #[test]
    fn test_usable_rows_start_after_longest_window() {
        let obs = series(40);
        let rows = FeatureBuilder.build(&obs);
        let first = rows.iter().position(DerivedObservation::is_complete);
        assert_eq!(first, Some(LONGEST_WINDOW - 1));

        let usable = FeatureBuilder.build_usable(&obs);
        assert_eq!(usable.len(), 40 - (LONGEST_WINDOW - 1));
        assert_eq!(usable[0].date(), obs[LONGEST_WINDOW - 1].date);
    }

    #[test]
    fn test_short_series_has_no_usable_rows() {
        assert!(FeatureBuilder.build_usable(&series(LONGEST_WINDOW - 1)).is_empty());
        assert!(FeatureBuilder.build(&[]).is_empty());
    }

    #[test]
    fn test_calendar_features_always_defined() {
        let rows = FeatureBuilder.build(&series(3));
        assert_eq!(rows[0].day_of_year, 1);
        assert_eq!(rows[2].day_of_year, 3);
        let (sin, cos) = month_harmonics(rows[0].date());
        assert_eq!(rows[0].month_sin, sin);
        assert_eq!(rows[0].month_cos, cos);
    }

    #[test]
    fn test_harmonics_on_unit_circle_and_periodic() {
        for month in 1..=12 {
            let date = NaiveDate::from_ymd_opt(2021, month, 15).unwrap();
            let next_year = NaiveDate::from_ymd_opt(2022, month, 15).unwrap();
            let (sin, cos) = month_harmonics(date);
            assert!((sin * sin + cos * cos - 1.0).abs() < 1e-12);
            assert_eq!(month_harmonics(next_year), (sin, cos));
        }
    }

    #[test]
    fn test_feature_vector_order() {
        let rows = FeatureBuilder.build(&series(40));
        let row = rows[35];
        let v = row.feature_vector().unwrap();

        assert_eq!(v.len(), FEATURE_NAMES.len());
        assert_eq!(v[6], row.observation.groundwater_level_m - 1.0); // gw_lag_1
        assert_eq!(v[12], row.observation.rainfall_mm);
        assert_eq!(v[15], row.evaporation_mm);
        assert_eq!(v[16], row.day_of_year as f64);
    }

    #[test]
    fn test_non_finite_rows_are_not_usable() {
        let mut obs = series(60);
        obs[45].rainfall_mm = f64::NAN;
        let rows = FeatureBuilder.build(&obs);

        // the NaN reaches row 45 directly, later rows through the rain windows and lags
        assert!(rows[44].is_complete());
        assert!(!rows[45].is_complete());
        assert!(!rows[59].is_complete());

        let usable = FeatureBuilder.build_usable(&obs);
        assert!(usable.iter().all(|r| r.feature_vector().unwrap().iter().all(|v| v.is_finite())));
        assert_eq!(usable.len(), 45 - (LONGEST_WINDOW - 1));
    }

    #[test]
    fn test_rolling_sums_and_lags() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(
            rolling_sums(&values, 3),
            vec![None, None, Some(6.0), Some(9.0), Some(12.0)]
        );
        assert_eq!(lagged(&values, 2), vec![None, None, Some(1.0), Some(2.0), Some(3.0)]);
        assert!(rolling_sums(&values, 0).iter().all(Option::is_none));
    }
}
