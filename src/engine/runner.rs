// Headless run driver: seeds an arena, ticks it until done and reports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::Serialize;

use crate::config::SimConfig;
use crate::error::Result;
use crate::metrics;

use super::arena::{Arena, ArenaSnapshot, ArenaStats, TickTimings};

/// Log population every this many ticks.
const PROGRESS_INTERVAL: u64 = 100;

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The configured number of ticks was reached.
    Completed,
    /// No creature was left alive.
    Extinct,
    /// The stop flag was raised.
    Stopped,
}

impl RunOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Extinct => "extinct",
            RunOutcome::Stopped => "stopped",
        }
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub ticks_run: u64,
    pub outcome: RunOutcome,
    pub survivors: usize,
    pub elapsed_seconds: f64,
    /// Longest single tick of the run, in microseconds.
    pub slowest_tick_us: u64,
    pub last_tick: TickTimings,
    pub stats: ArenaStats,
    pub snapshot: ArenaSnapshot,
}

/// Build an arena from `config`, seed it with food and founders, then tick
/// until the tick limit, extinction, or `stop` is raised (checked between
/// ticks). Runs synchronously on the calling thread.
pub fn run_headless(config: &SimConfig, stop: &AtomicBool) -> Result<RunReport> {
    config.validate()?;
    let started = Instant::now();

    let mut arena = Arena::new(config.arena_params())?;
    let food = arena.scatter_food(config.initial_food);
    let traits = config.founder_traits();
    for i in 1..=config.creatures {
        arena.spawn_founder(format!("creature-{i}"), traits)?;
    }

    tracing::info!(
        width = config.width,
        height = config.height,
        creatures = config.creatures,
        food,
        ticks = config.ticks,
        seed = config.seed,
        "Starting run"
    );

    let mut slowest_tick_us = 0;
    let outcome = loop {
        if arena.is_extinct() {
            break RunOutcome::Extinct;
        }
        if arena.tick_count >= config.ticks {
            break RunOutcome::Completed;
        }
        if stop.load(Ordering::Relaxed) {
            break RunOutcome::Stopped;
        }
        arena.tick()?;
        slowest_tick_us = slowest_tick_us.max(arena.last_tick_timings.total_us);

        if arena.tick_count % PROGRESS_INTERVAL == 0 {
            tracing::debug!(
                tick = arena.tick_count,
                creatures = arena.creature_count(),
                food = arena.foods().len(),
                "Progress"
            );
        }
    };

    metrics::RUNS_FINISHED_TOTAL
        .with_label_values(&[outcome.label()])
        .inc();

    let elapsed_seconds = started.elapsed().as_secs_f64();
    tracing::info!(
        outcome = outcome.label(),
        ticks = arena.tick_count,
        survivors = arena.creature_count(),
        slowest_tick_us,
        "Run finished in {elapsed_seconds:.2}s"
    );

    Ok(RunReport {
        ticks_run: arena.tick_count,
        outcome,
        survivors: arena.creature_count(),
        elapsed_seconds,
        slowest_tick_us,
        last_tick: arena.last_tick_timings.clone(),
        stats: arena.stats().clone(),
        snapshot: arena.snapshot(),
    })
}
