//! Empirical evaporation estimate from temperature and humidity.

/// Empirical coefficient (mm / (°C · sqrt(%)))
pub const EVAPORATION_COEFFICIENT: f64 = 0.0023;
/// Temperature offset (°C)
pub const TEMPERATURE_OFFSET_C: f64 = 17.8;

/// Daily evaporation (mm) for a temperature (°C) and relative humidity (%).
///
/// `0.0023 * (t + 17.8) * sqrt(100 - h)` with humidity clamped to [0, 100]
/// first. The result is floored at zero, so temperatures below -17.8 °C give
/// no evaporation.
pub fn evaporation_mm(temperature_c: f64, humidity_pct: f64) -> f64 {
    let humidity = humidity_pct.clamp(0.0, 100.0);
    let rate = EVAPORATION_COEFFICIENT * (temperature_c + TEMPERATURE_OFFSET_C) * (100.0 - humidity).sqrt();
    rate.max(0.0)
}
