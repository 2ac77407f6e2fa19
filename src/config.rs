// Simulation configuration, loaded from environment variables and CLI flags.

use std::str::FromStr;

use crate::engine::arena::ArenaParams;
use crate::engine::config::{
    DEFAULT_INTELLIGENCE, DEFAULT_SENSE, DEFAULT_SIZE, DEFAULT_SPEED, MAX_GRID_SIDE, MAX_SPEED,
};
use crate::engine::creature::Traits;
use crate::engine::habitat::perimeter_len;
use crate::error::{ForageError, Result};

/// Run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// Founders placed on the border before the first tick.
    pub creatures: usize,
    /// Food scattered at the end of every tick.
    pub food_per_tick: usize,
    /// Food scattered before the first tick.
    pub initial_food: usize,
    /// Tick limit for the run.
    pub ticks: u64,
    pub seed: u64,
    // Founder traits.
    pub speed: i32,
    pub size: i32,
    pub sense: i32,
    pub intelligence: f64,
    /// Print the final report as JSON.
    pub json: bool,
    /// Print Prometheus metrics after the run.
    pub metrics: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            width: 40,
            height: 40,
            creatures: 12,
            food_per_tick: 4,
            initial_food: 40,
            ticks: 500,
            seed: 42,
            speed: DEFAULT_SPEED,
            size: DEFAULT_SIZE,
            sense: DEFAULT_SENSE,
            intelligence: DEFAULT_INTELLIGENCE,
            json: false,
            metrics: false,
        }
    }
}

impl SimConfig {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `FORAGE_WIDTH`, `FORAGE_HEIGHT` - grid size (default 40x40)
    /// - `FORAGE_CREATURES` - founder count (default 12)
    /// - `FORAGE_FOOD_PER_TICK` - food added per tick (default 4)
    /// - `FORAGE_INITIAL_FOOD` - food present at start (default 40)
    /// - `FORAGE_TICKS` - tick limit (default 500)
    /// - `FORAGE_SEED` - RNG seed (default 42)
    /// - `FORAGE_SPEED`, `FORAGE_SIZE`, `FORAGE_SENSE`, `FORAGE_INTELLIGENCE` - founder traits
    ///
    /// CLI flags take precedence: `--width`, `--height`, `--creatures`,
    /// `--food-per-tick`, `--initial-food`, `--ticks`, `--seed`, `--speed`,
    /// `--size`, `--sense`, `--intelligence`, plus the switches `--json` and
    /// `--metrics`.
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// Build a configuration from explicit argument and environment sources.
    /// Values that fail to parse fall back to the next source.
    pub fn from_sources<F>(args: &[String], env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = SimConfig::default();

        SimConfig {
            width: Self::pick(args, &env, "--width", "FORAGE_WIDTH").unwrap_or(d.width),
            height: Self::pick(args, &env, "--height", "FORAGE_HEIGHT").unwrap_or(d.height),
            creatures: Self::pick(args, &env, "--creatures", "FORAGE_CREATURES")
                .unwrap_or(d.creatures),
            food_per_tick: Self::pick(args, &env, "--food-per-tick", "FORAGE_FOOD_PER_TICK")
                .unwrap_or(d.food_per_tick),
            initial_food: Self::pick(args, &env, "--initial-food", "FORAGE_INITIAL_FOOD")
                .unwrap_or(d.initial_food),
            ticks: Self::pick(args, &env, "--ticks", "FORAGE_TICKS").unwrap_or(d.ticks),
            seed: Self::pick(args, &env, "--seed", "FORAGE_SEED").unwrap_or(d.seed),
            speed: Self::pick(args, &env, "--speed", "FORAGE_SPEED").unwrap_or(d.speed),
            size: Self::pick(args, &env, "--size", "FORAGE_SIZE").unwrap_or(d.size),
            sense: Self::pick(args, &env, "--sense", "FORAGE_SENSE").unwrap_or(d.sense),
            intelligence: Self::pick(args, &env, "--intelligence", "FORAGE_INTELLIGENCE")
                .unwrap_or(d.intelligence),
            json: args.iter().any(|a| a == "--json")
                || env("FORAGE_JSON").is_some_and(|v| is_truthy(&v)),
            metrics: args.iter().any(|a| a == "--metrics")
                || env("FORAGE_METRICS").is_some_and(|v| is_truthy(&v)),
        }
    }

    /// CLI flag first, then the environment variable.
    fn pick<T, F>(args: &[String], env: &F, flag: &str, var: &str) -> Option<T>
    where
        T: FromStr,
        F: Fn(&str) -> Option<String>,
    {
        Self::parse_cli_value(args, flag)
            .and_then(|v| v.parse().ok())
            .or_else(|| env(var).and_then(|v| v.parse().ok()))
    }

    /// Parse a CLI flag value like `--ticks 200`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ForageError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(ForageError::InvalidConfig(format!(
                "grid sides must be <= {MAX_GRID_SIDE}, got {}x{}",
                self.width, self.height
            )));
        }
        if self.speed <= 0 || self.speed > MAX_SPEED {
            return Err(ForageError::InvalidConfig(format!(
                "founder speed must be in 1..={MAX_SPEED}, got {}",
                self.speed
            )));
        }
        if self.sense < 0 {
            return Err(ForageError::InvalidConfig(format!(
                "founder sense must be >= 0, got {}",
                self.sense
            )));
        }
        let border = perimeter_len(self.width, self.height);
        if self.creatures > border {
            return Err(ForageError::InvalidConfig(format!(
                "{} founders do not fit on {} border cells",
                self.creatures, border
            )));
        }
        Ok(())
    }

    pub fn arena_params(&self) -> ArenaParams {
        ArenaParams {
            width: self.width,
            height: self.height,
            food_per_tick: self.food_per_tick,
            seed: self.seed,
        }
    }

    pub fn founder_traits(&self) -> Traits {
        Traits {
            speed: self.speed,
            size: self.size,
            sense: self.sense,
            intelligence: self.intelligence,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
