//! End-to-end: observations -> features -> predictors -> forecast -> status

mod common;

use common::{constant_series, context, varied_series};
use groundwater_pulse::domain::AlertLevel;
use groundwater_pulse::forecast::FeatureBuilder;
use groundwater_pulse::ml::ModelType;
#[cfg(feature = "ml")]
use rstest::rstest;

#[test]
fn constant_history_evaporation() {
    let derived = FeatureBuilder.build(&constant_series(40));
    assert_eq!(derived.len(), 40);
    for row in &derived {
        assert!((row.evaporation_mm - 0.61476).abs() < 1e-4);
    }
}

fn assert_constant_forecast(kind: ModelType) {
    let ctx = context(constant_series(40), kind);

    let points = ctx.forecast().unwrap();
    assert_eq!(points.len(), 7);
    for p in &points {
        assert!((p.groundwater_level_m - 10.0).abs() < 1e-6, "{p:?}");
        assert!(p.rainfall_mm.abs() < 1e-6);
        assert!(p.rainfall_lower_mm >= 0.0);
    }

    assert!((ctx.predict_today().unwrap() - 10.0).abs() < 1e-6);
    let status = ctx.station_status().unwrap();
    assert_eq!(status.pulse_score, 100.0);
    assert_eq!(status.alert_level, AlertLevel::Normal);
}

#[test]
fn constant_history_forecast_linear() {
    assert_constant_forecast(ModelType::LinearRegression);
}

#[cfg(feature = "ml")]
#[rstest]
#[case(ModelType::GradientBoosting)]
#[case(ModelType::RandomForest)]
fn constant_history_forecast_trees(#[case] kind: ModelType) {
    assert_constant_forecast(kind);
}

fn assert_repeatable(kind: ModelType) {
    let ctx = context(varied_series(120), kind);
    let first = ctx.forecast().unwrap();
    let second = ctx.forecast().unwrap();
    assert_eq!(first, second);

    let last = ctx.history().last().unwrap().date;
    assert_eq!(first[0].date, last.succ_opt().unwrap());
    for p in &first {
        assert!(p.groundwater_level_m.is_finite());
        assert!(p.rainfall_lower_mm <= p.rainfall_mm && p.rainfall_mm <= p.rainfall_upper_mm);
    }
}

#[test]
fn forecast_is_repeatable_linear() {
    assert_repeatable(ModelType::LinearRegression);
}

#[cfg(feature = "ml")]
#[test]
fn forecast_is_repeatable_gradient_boosting() {
    assert_repeatable(ModelType::GradientBoosting);
}

#[test]
fn holdout_metrics_are_recorded() {
    let ctx = context(varied_series(120), ModelType::LinearRegression);
    // 91 usable rows, floor(0.8 * 91) train
    assert_eq!(ctx.table().len(), 91);
    for meta in ctx.models() {
        assert_eq!(meta.training_samples, 72);
        let metrics = meta.holdout_metrics.as_ref().unwrap();
        assert_eq!(metrics.sample_count, 19);
        assert!(metrics.rmse.is_finite());
    }
}

#[test]
fn summary_matches_latest_row() {
    let ctx = context(varied_series(90), ModelType::LinearRegression);
    let summary = ctx.summary().unwrap();
    let latest = ctx.latest();

    assert_eq!(summary.date, latest.date());
    assert_eq!(summary.rainfall_today_mm, latest.observation.rainfall_mm);
    assert_eq!(summary.evaporation_today_mm, latest.evaporation_mm);
    assert_eq!(summary.health_status, summary.alert_level.health_label());
    assert!((0.0..=100.0).contains(&summary.pulse_score));
    assert!(summary.rainfall_effect_m_per_mm.unwrap() > 0.0);
}
