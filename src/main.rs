use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use forage_sim::config::SimConfig;
use forage_sim::engine::runner::run_headless;
use forage_sim::metrics;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SimConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!("{e}");
        return ExitCode::from(2);
    }
    metrics::register_metrics();

    // Ctrl-C ends the run after the current tick.
    let stop = Arc::new(AtomicBool::new(false));
    let stop_on_signal = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current tick");
            stop_on_signal.store(true, Ordering::Relaxed);
        }
    });

    let run_config = config.clone();
    let run = tokio::task::spawn_blocking(move || run_headless(&run_config, &stop)).await;

    let report = match run {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            tracing::error!("Run failed: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!("Run task panicked: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("Failed to serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "{} after {} ticks: {} survivors, {} deaths, {} food eaten (slowest tick {}us)",
            report.outcome.label(),
            report.ticks_run,
            report.survivors,
            report.stats.deaths,
            report.stats.food_eaten,
            report.slowest_tick_us
        );
    }

    if config.metrics {
        print!("{}", metrics::gather_metrics());
    }

    ExitCode::SUCCESS
}
