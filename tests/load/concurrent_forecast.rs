//! Concurrent forecasts over one shared station context
//!
//! Every request forecasts from its own working copy, so parallel callers
//! must see identical results and leave the shared history untouched.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use crate::common::{context, varied_series};
use groundwater_pulse::ml::ModelType;

async fn run_concurrent(clients: usize, requests_per_client: usize) -> Duration {
    let station = Arc::new(context(varied_series(365), ModelType::LinearRegression));
    let history_before = station.history().to_vec();
    let expected = station.forecast().unwrap();

    let start = Instant::now();
    let mut tasks = JoinSet::new();
    for _ in 0..clients {
        let station = Arc::clone(&station);
        tasks.spawn_blocking(move || {
            (0..requests_per_client)
                .map(|_| station.forecast().unwrap())
                .collect::<Vec<_>>()
        });
    }

    let mut completed = 0;
    while let Some(result) = tasks.join_next().await {
        for forecast in result.unwrap() {
            assert_eq!(forecast, expected);
            completed += 1;
        }
    }
    let elapsed = start.elapsed();

    assert_eq!(completed, clients * requests_per_client);
    assert_eq!(station.history(), history_before.as_slice());
    elapsed
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_forecasts_agree() {
    run_concurrent(8, 2).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn sustained_forecast_load() {
    let clients = 50;
    let requests = 10;
    let elapsed = run_concurrent(clients, requests).await;

    let per_request = elapsed / (clients * requests) as u32;
    println!(
        "{} forecasts in {:?} ({:?} per request)",
        clients * requests,
        elapsed,
        per_request
    );
    assert!(elapsed < Duration::from_secs(120));
}
