use std::collections::BTreeMap;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::{ForageError, Result};
use crate::metrics;

use super::config::{MAX_GRID_SIDE, TICK_BUDGET_US};
use super::creature::{Creature, Traits};
use super::food::Food;
use super::habitat::{find_free_perimeter_cell, Habitat};
use super::lifecycle::Fate;
use super::spatial::SpatialGrid;

/// Parameters for a new arena.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaParams {
    pub width: i32,
    pub height: i32,
    /// Food items scattered at the end of every tick.
    pub food_per_tick: usize,
    /// Seed for every random choice the arena and its creatures make.
    pub seed: u64,
}

impl Default for ArenaParams {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            food_per_tick: 4,
            seed: 42,
        }
    }
}

/// Running totals for one arena.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArenaStats {
    pub founders: u64,
    pub births: u64,
    pub deaths: u64,
    pub rests: u64,
    pub food_spawned: u64,
    pub food_eaten: u64,
}

/// Tick timing data for observability and budget monitoring.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TickTimings {
    /// Total tick duration in microseconds.
    pub total_us: u64,
    /// Time spent running creature turns in microseconds.
    pub creatures_us: u64,
}

/// Snapshot of a creature for reporting.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CreatureSnapshot {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub energy: i32,
    pub food_eaten: u32,
    pub offspring_count: u32,
    pub traits: Traits,
}

/// Snapshot of the whole arena.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ArenaSnapshot {
    pub tick: u64,
    pub width: i32,
    pub height: i32,
    pub creatures: Vec<CreatureSnapshot>,
    pub foods: Vec<Food>,
    pub stats: ArenaStats,
}

/// Live creatures and food. This is what creatures see as their `Habitat`.
///
/// The creature taking its turn is pulled out of `creatures` and `index` for
/// the duration of the turn; `acting` remembers who it is so a removal
/// request for it can still be honoured.
struct Registry {
    width: i32,
    height: i32,
    creatures: BTreeMap<u32, Creature>,
    foods: Vec<Food>,
    index: SpatialGrid,
    next_creature_id: u32,
    acting: Option<u32>,
    acting_removed: bool,
    stats: ArenaStats,
}

impl Registry {
    fn insert(&mut self, mut creature: Creature) -> u32 {
        let id = self.next_creature_id;
        self.next_creature_id += 1;
        creature.id = id;
        self.index.insert(creature.as_rival());
        self.creatures.insert(id, creature);
        id
    }

    /// Food within the square of half-side `radius` around (x, y).
    fn foods_near(&self, x: i32, y: i32, radius: i32) -> Vec<Food> {
        let radius = radius.max(0).unsigned_abs();
        self.foods
            .iter()
            .filter(|f| f.x().abs_diff(x) <= radius && f.y().abs_diff(y) <= radius)
            .cloned()
            .collect()
    }

    fn has_food_at(&self, x: i32, y: i32) -> bool {
        self.foods.iter().any(|f| f.position() == (x, y))
    }
}

impl Habitat for Registry {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.index.is_occupied(x, y)
    }

    fn remove_food(&mut self, food: &Food) {
        if let Some(pos) = self.foods.iter().position(|f| f == food) {
            self.foods.remove(pos);
            self.stats.food_eaten += 1;
            metrics::FOOD_EATEN_TOTAL.inc();
        }
    }

    fn remove_creature(&mut self, creature: &Creature) {
        let removed = if self.acting == Some(creature.id) {
            !std::mem::replace(&mut self.acting_removed, true)
        } else if let Some(gone) = self.creatures.remove(&creature.id) {
            self.index.remove(&gone.as_rival());
            true
        } else {
            false
        };

        if removed {
            self.stats.deaths += 1;
            metrics::CREATURES_DIED_TOTAL.inc();
        }
    }

    fn add_creature(&mut self, creature: Creature) {
        let name = creature.name.clone();
        let id = self.insert(creature);
        self.stats.births += 1;
        metrics::CREATURES_SPAWNED_TOTAL
            .with_label_values(&["offspring"])
            .inc();
        tracing::debug!(id, name = %name, "Offspring registered");
    }
}

/// A bounded grid world that owns the creature and food registries and
/// drives the per-tick loop.
pub struct Arena {
    registry: Registry,
    rng: StdRng,
    food_per_tick: usize,
    next_food_id: u64,
    pub tick_count: u64,
    /// Timing data from the last tick.
    pub last_tick_timings: TickTimings,
}

impl Arena {
    pub fn new(params: ArenaParams) -> Result<Self> {
        let side_ok = |side: i32| side > 0 && side <= MAX_GRID_SIDE;
        if !side_ok(params.width) || !side_ok(params.height) {
            return Err(ForageError::InvalidConfig(format!(
                "arena sides must be in 1..={MAX_GRID_SIDE}, got {}x{}",
                params.width, params.height
            )));
        }
        Ok(Arena {
            registry: Registry {
                width: params.width,
                height: params.height,
                creatures: BTreeMap::new(),
                foods: Vec::new(),
                index: SpatialGrid::new(params.width, params.height),
                next_creature_id: 1,
                acting: None,
                acting_removed: false,
                stats: ArenaStats::default(),
            },
            rng: StdRng::seed_from_u64(params.seed),
            food_per_tick: params.food_per_tick,
            next_food_id: 1,
            tick_count: 0,
            last_tick_timings: TickTimings::default(),
        })
    }

    pub fn width(&self) -> i32 {
        self.registry.width
    }

    pub fn height(&self) -> i32 {
        self.registry.height
    }

    pub fn creature(&self, id: u32) -> Option<&Creature> {
        self.registry.creatures.get(&id)
    }

    /// Live creatures in id order.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.registry.creatures.values()
    }

    pub fn creature_count(&self) -> usize {
        self.registry.creatures.len()
    }

    pub fn foods(&self) -> &[Food] {
        &self.registry.foods
    }

    pub fn stats(&self) -> &ArenaStats {
        &self.registry.stats
    }

    pub fn is_extinct(&self) -> bool {
        self.registry.creatures.is_empty()
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.registry.is_occupied(x, y)
    }

    /// Add a founder on a random free border cell. Returns its id.
    pub fn spawn_founder(&mut self, name: impl Into<String>, traits: Traits) -> Result<u32> {
        let (x, y) = find_free_perimeter_cell(&self.registry, &mut self.rng)?;
        Ok(self.place_creature(Creature::new(name, traits).at(x, y)))
    }

    /// Register a founder exactly where it stands. Returns its id.
    pub fn place_creature(&mut self, creature: Creature) -> u32 {
        let (x, y) = creature.position();
        let id = self.registry.insert(creature);
        self.registry.stats.founders += 1;
        metrics::CREATURES_SPAWNED_TOTAL
            .with_label_values(&["founder"])
            .inc();
        tracing::debug!(id, x, y, "Founder placed");
        id
    }

    /// Put a food item on (x, y). Returns false if the cell is off the grid
    /// or already holds food.
    pub fn add_food(&mut self, x: i32, y: i32) -> bool {
        let on_grid = x >= 0 && y >= 0 && x < self.width() && y < self.height();
        if !on_grid || self.registry.has_food_at(x, y) {
            return false;
        }
        let name = format!("food-{}", self.next_food_id);
        self.next_food_id += 1;
        self.registry.foods.push(Food::new(x, y, name));
        self.registry.stats.food_spawned += 1;
        metrics::FOOD_SPAWNED_TOTAL.inc();
        true
    }

    /// Drop up to `count` food items on random cells. A pick that lands on a
    /// cell already holding food is skipped. Returns how many were placed.
    pub fn scatter_food(&mut self, count: usize) -> usize {
        let mut placed = 0;
        for _ in 0..count {
            let x = self.rng.gen_range(0..self.registry.width);
            let y = self.rng.gen_range(0..self.registry.height);
            if self.add_food(x, y) {
                placed += 1;
            }
        }
        placed
    }

    /// Run one tick: every creature alive at the start of the tick takes one
    /// full turn in id order, then new food is scattered.
    ///
    /// Each turn sees the registry as left by the turns before it. An error
    /// aborts the rest of the tick and leaves `tick_count` unchanged.
    pub fn tick(&mut self) -> Result<()> {
        let tick_start = Instant::now();

        let ids: Vec<u32> = self.registry.creatures.keys().copied().collect();
        for id in ids {
            self.take_turn(id)?;
        }
        let creatures_us = tick_start.elapsed().as_micros() as u64;

        let spawned = self.scatter_food(self.food_per_tick);
        self.tick_count += 1;

        let total_us = tick_start.elapsed().as_micros() as u64;
        self.last_tick_timings = TickTimings {
            total_us,
            creatures_us,
        };
        metrics::TICK_DURATION_MS.observe(total_us as f64 / 1000.0);
        metrics::LIVE_CREATURES.set(self.creature_count() as i64);
        metrics::LIVE_FOOD.set(self.registry.foods.len() as i64);

        if total_us > TICK_BUDGET_US {
            tracing::warn!(
                tick = self.tick_count,
                total_us,
                creatures_us,
                creature_count = self.creature_count(),
                "Tick exceeded budget"
            );
        }
        tracing::trace!(
            tick = self.tick_count,
            creatures = self.creature_count(),
            food = self.registry.foods.len(),
            spawned,
            "Tick complete"
        );
        Ok(())
    }

    fn take_turn(&mut self, id: u32) -> Result<()> {
        let Some(mut creature) = self.registry.creatures.remove(&id) else {
            return Ok(());
        };
        self.registry.index.remove(&creature.as_rival());

        let sense = creature.traits.sense;
        let rivals = self.registry.index.query_radius(creature.x, creature.y, sense);
        let foods = self.registry.foods_near(creature.x, creature.y, sense);

        self.registry.acting = Some(id);
        self.registry.acting_removed = false;
        let outcome = creature.tick(&foods, &rivals, &mut self.registry, &mut self.rng);
        self.registry.acting = None;

        if let Ok(Some(Fate::Rested { .. })) = outcome {
            self.registry.stats.rests += 1;
            metrics::RESTS_TOTAL.inc();
        }

        if !self.registry.acting_removed && creature.is_alive() {
            self.registry.index.insert(creature.as_rival());
            self.registry.creatures.insert(id, creature);
        }

        outcome.map(|_| ())
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            tick: self.tick_count,
            width: self.width(),
            height: self.height(),
            creatures: self
                .creatures()
                .map(|c| CreatureSnapshot {
                    id: c.id,
                    name: c.name.clone(),
                    x: c.x,
                    y: c.y,
                    energy: c.energy,
                    food_eaten: c.food_eaten,
                    offspring_count: c.offspring_count,
                    traits: c.traits,
                })
                .collect(),
            foods: self.registry.foods.clone(),
            stats: self.registry.stats.clone(),
        }
    }
}
