use anyhow::Result;
use groundwater_pulse::{api, config::Config, context::AppState, telemetry};
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    let app_state = AppState::new(cfg.clone())?;

    for meta in app_state.station.models() {
        match &meta.holdout_metrics {
            Some(metrics) => info!(model = %meta.model_id, %metrics, "holdout evaluation"),
            None => warn!(model = %meta.model_id, "no holdout rows, model left unevaluated"),
        }
    }

    let app = api::router(app_state);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - service will be reachable from the network");
    }

    info!(%addr, station = %cfg.station.id, "starting groundwater pulse");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
