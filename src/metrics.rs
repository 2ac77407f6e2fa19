// Prometheus metrics definitions for the foraging simulation.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Creatures currently registered in the arena.
    pub static ref LIVE_CREATURES: IntGauge =
        IntGauge::new("forage_live_creatures", "Creatures currently alive").unwrap();

    /// Food items currently on the grid.
    pub static ref LIVE_FOOD: IntGauge =
        IntGauge::new("forage_live_food", "Food items currently on the grid").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Total creatures spawned, by origin (founder, offspring).
    pub static ref CREATURES_SPAWNED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("forage_creatures_spawned_total", "Total creatures spawned"),
        &["origin"],
    )
    .unwrap();

    /// Total creatures that ran out of energy.
    pub static ref CREATURES_DIED_TOTAL: IntCounter = IntCounter::new(
        "forage_creatures_died_total",
        "Total creatures that died",
    )
    .unwrap();

    /// Total food items eaten.
    pub static ref FOOD_EATEN_TOTAL: IntCounter =
        IntCounter::new("forage_food_eaten_total", "Total food items eaten").unwrap();

    /// Total food items spawned.
    pub static ref FOOD_SPAWNED_TOTAL: IntCounter =
        IntCounter::new("forage_food_spawned_total", "Total food items spawned").unwrap();

    /// Total rests (energy reset plus border relocation).
    pub static ref RESTS_TOTAL: IntCounter =
        IntCounter::new("forage_rests_total", "Total rests").unwrap();

    /// Total runs finished, by outcome (completed, extinct, stopped).
    pub static ref RUNS_FINISHED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("forage_runs_finished_total", "Total runs finished"),
        &["outcome"],
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Per-tick processing time in milliseconds.
    pub static ref TICK_DURATION_MS: Histogram = Histogram::with_opts(
        HistogramOpts::new("forage_tick_duration_ms", "Per-tick processing time in ms")
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 50.0]),
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(LIVE_CREATURES.clone()),
        Box::new(LIVE_FOOD.clone()),
        Box::new(CREATURES_SPAWNED_TOTAL.clone()),
        Box::new(CREATURES_DIED_TOTAL.clone()),
        Box::new(FOOD_EATEN_TOTAL.clone()),
        Box::new(FOOD_SPAWNED_TOTAL.clone()),
        Box::new(RESTS_TOTAL.clone()),
        Box::new(RUNS_FINISHED_TOTAL.clone()),
        Box::new(TICK_DURATION_MS.clone()),
    ];

    for c in collectors {
        // Registering twice (e.g. from several tests) is harmless.
        if let Err(e) = REGISTRY.register(c) {
            tracing::debug!("metric already registered: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_metrics_returns_string() {
        register_metrics();
        register_metrics();
        let output = gather_metrics();
        assert!(output.is_empty() || output.contains("forage_"));
    }

    #[test]
    fn test_metric_increments() {
        LIVE_CREATURES.set(4);
        assert_eq!(LIVE_CREATURES.get(), 4);
        LIVE_FOOD.inc();
        LIVE_FOOD.dec();

        CREATURES_SPAWNED_TOTAL
            .with_label_values(&["offspring"])
            .inc();
        CREATURES_DIED_TOTAL.inc();
        FOOD_EATEN_TOTAL.inc();
        FOOD_SPAWNED_TOTAL.inc_by(3);
        RESTS_TOTAL.inc();
        RUNS_FINISHED_TOTAL.with_label_values(&["completed"]).inc();
        TICK_DURATION_MS.observe(0.2);
        assert!(FOOD_SPAWNED_TOTAL.get() >= 3);
    }
}
