use super::creature::{Creature, Rival};
use super::food::Food;

/// Exact Euclidean distance between two grid cells.
pub fn distance(x1: i32, y1: i32, x2: i32, y2: i32) -> f64 {
    let dx = f64::from(x2) - f64::from(x1);
    let dy = f64::from(y2) - f64::from(y1);
    (dx * dx + dy * dy).sqrt()
}

/// What a creature can see this tick. Both lists keep input order.
#[derive(Debug, Default)]
pub struct Perception<'a> {
    pub food: Vec<&'a Food>,
    pub rivals: Vec<&'a Rival>,
}

impl Creature {
    pub fn distance_to(&self, x: i32, y: i32) -> f64 {
        distance(self.x, self.y, x, y)
    }

    /// Food and other creatures within `sense` (inclusive). The creature
    /// itself is skipped if it shows up in `rivals`.
    pub fn perceive<'a>(&self, foods: &'a [Food], rivals: &'a [Rival]) -> Perception<'a> {
        let radius = self.traits.sense as f64;
        Perception {
            food: foods
                .iter()
                .filter(|f| self.distance_to(f.x(), f.y()) <= radius)
                .collect(),
            rivals: rivals
                .iter()
                .filter(|r| r.id != self.id && self.distance_to(r.x, r.y) <= radius)
                .collect(),
        }
    }
}
