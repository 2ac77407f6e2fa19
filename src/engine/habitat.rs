use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ForageError, Result};

use super::creature::Creature;
use super::food::Food;

/// The registry a creature acts against during its turn.
///
/// The arena implements this for real runs; tests plug in a recording double.
/// Removals are idempotent: removing something already gone does nothing.
pub trait Habitat {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// True if a live creature (other than the one taking its turn) sits on (x, y).
    fn is_occupied(&self, x: i32, y: i32) -> bool;

    fn remove_food(&mut self, food: &Food);
    fn remove_creature(&mut self, creature: &Creature);

    /// Register a newborn. It takes its first turn on the next tick.
    fn add_creature(&mut self, creature: Creature);
}

/// Number of cells on the outer ring of a `width` x `height` grid.
pub fn perimeter_len(width: i32, height: i32) -> usize {
    let ring = 2 * (i64::from(width) + i64::from(height)) - 4;
    usize::try_from(ring.max(1)).unwrap_or(usize::MAX)
}

/// Map a linear perimeter index to a cell.
///
/// The ring is walked clockwise starting at (0, 0): top edge left to right,
/// right edge downwards, bottom edge right to left, left edge upwards.
pub fn perimeter_cell(index: usize, width: i32, height: i32) -> (i32, i32) {
    let i = index as i64;
    let (w, h) = (i64::from(width), i64::from(height));
    let (x, y) = if i < w {
        (i, 0)
    } else if i < w + h - 1 {
        (w - 1, i - w + 1)
    } else if i < 2 * w + h - 2 {
        (2 * w + h - 3 - i, h - 1)
    } else {
        (0, 2 * (w + h) - 4 - i)
    };
    (x as i32, y as i32)
}

/// Returns true if (x, y) lies on the outer ring of the grid.
pub fn is_on_perimeter(x: i32, y: i32, width: i32, height: i32) -> bool {
    let inside = x >= 0 && y >= 0 && x < width && y < height;
    inside && (x == 0 || y == 0 || x == width - 1 || y == height - 1)
}

/// Pick a uniformly random free perimeter cell.
///
/// Visits every perimeter index at most once in shuffled order, so a fully
/// occupied border fails with `PerimeterFull` instead of spinning.
pub fn find_free_perimeter_cell<H, R>(habitat: &H, rng: &mut R) -> Result<(i32, i32)>
where
    H: Habitat + ?Sized,
    R: Rng + ?Sized,
{
    let (width, height) = (habitat.width(), habitat.height());
    let mut order: Vec<usize> = (0..perimeter_len(width, height)).collect();
    order.shuffle(rng);

    order
        .into_iter()
        .map(|i| perimeter_cell(i, width, height))
        .find(|&(x, y)| !habitat.is_occupied(x, y))
        .ok_or(ForageError::PerimeterFull { width, height })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;

    use super::*;
    use crate::engine::creature::Traits;

    pub fn traits(speed: i32, size: i32, sense: i32) -> Traits {
        Traits {
            speed,
            size,
            sense,
            intelligence: 1.0,
        }
    }

    /// Habitat double that records every call.
    pub struct TestHabitat {
        pub width: i32,
        pub height: i32,
        pub occupied: HashSet<(i32, i32)>,
        pub removed_food: Vec<Food>,
        pub removed_creatures: Vec<String>,
        pub added: Vec<Creature>,
    }

    impl TestHabitat {
        pub fn new(width: i32, height: i32) -> Self {
            TestHabitat {
                width,
                height,
                occupied: HashSet::new(),
                removed_food: Vec::new(),
                removed_creatures: Vec::new(),
                added: Vec::new(),
            }
        }
    }

    impl Habitat for TestHabitat {
        fn width(&self) -> i32 {
            self.width
        }

        fn height(&self) -> i32 {
            self.height
        }

        fn is_occupied(&self, x: i32, y: i32) -> bool {
            self.occupied.contains(&(x, y))
        }

        fn remove_food(&mut self, food: &Food) {
            if !self.removed_food.contains(food) {
                self.removed_food.push(food.clone());
            }
        }

        fn remove_creature(&mut self, creature: &Creature) {
            if !self.removed_creatures.contains(&creature.name) {
                self.removed_creatures.push(creature.name.clone());
            }
        }

        fn add_creature(&mut self, creature: Creature) {
            self.occupied.insert(creature.position());
            self.added.push(creature);
        }
    }
}
