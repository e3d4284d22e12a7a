//! Prints the latest station summary and forecast as JSON.

use anyhow::Result;
use groundwater_pulse::{config::Config, context::StationContext, telemetry};
use serde_json::json;

fn main() -> Result<()> {
    telemetry::init_tracing_stderr();

    let cfg = Config::load()?;
    let station = StationContext::load(&cfg)?;

    let report = json!({
        "summary": station.summary()?,
        "forecast": station.forecast()?,
        "models": station.models(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
