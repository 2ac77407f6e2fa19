use rand::Rng;
use serde::Serialize;

use crate::error::Result;

use super::config::INITIAL_ENERGY;
use super::food::Food;
use super::habitat::Habitat;
use super::lifecycle::Fate;

/// Heritable traits. Offspring get a copy of these at birth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Traits {
    /// Grid cells covered per move. Must be positive.
    pub speed: i32,
    /// Only used to break contention: the larger creature always wins.
    pub size: i32,
    /// Euclidean perception radius.
    pub sense: i32,
    /// Inherited but not consulted by any decision rule yet.
    pub intelligence: f64,
}

/// Read-only view of another creature, as seen by a deciding creature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rival {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub speed: i32,
    pub size: i32,
}

/// A foraging agent.
#[derive(Clone, Debug)]
pub struct Creature {
    /// Assigned by the habitat on registration; 0 until then.
    pub id: u32,
    pub name: String,
    pub traits: Traits,
    pub energy: i32,
    pub food_eaten: u32,
    pub x: i32,
    pub y: i32,
    pub offspring_count: u32,
    pub(crate) alive: bool,
    actions: Vec<String>,
}

impl Creature {
    pub fn new(name: impl Into<String>, traits: Traits) -> Self {
        Creature {
            id: 0,
            name: name.into(),
            traits,
            energy: INITIAL_ENERGY,
            food_eaten: 0,
            x: 0,
            y: 0,
            offspring_count: 0,
            alive: true,
            actions: Vec::new(),
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Everything this creature has done, oldest first.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn as_rival(&self) -> Rival {
        Rival {
            id: self.id,
            x: self.x,
            y: self.y,
            speed: self.traits.speed,
            size: self.traits.size,
        }
    }

    /// Append to the action log and mirror the entry to tracing.
    pub(crate) fn record(&mut self, entry: String) {
        tracing::debug!(creature = %self.name, id = self.id, "{entry}");
        self.actions.push(entry);
    }

    /// Decide, move and possibly eat. Does not run the status check.
    pub fn forage<H>(&mut self, foods: &[Food], rivals: &[Rival], habitat: &mut H) -> Result<()>
    where
        H: Habitat + ?Sized,
    {
        if !self.alive {
            return Ok(());
        }
        let action = self.decide(foods, rivals)?;
        self.perform(action, habitat);
        Ok(())
    }

    /// One full per-tick cycle: forage, then the status check.
    /// Returns None for a creature that was already dead.
    pub fn tick<H, R>(
        &mut self,
        foods: &[Food],
        rivals: &[Rival],
        habitat: &mut H,
        rng: &mut R,
    ) -> Result<Option<Fate>>
    where
        H: Habitat + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.alive {
            return Ok(None);
        }
        self.forage(foods, rivals, habitat)?;
        self.check_status(habitat, rng).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::habitat::testing::{traits, TestHabitat};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_creature() {
        let c = Creature::new("alpha", traits(2, 3, 4));
        assert_eq!(c.energy, INITIAL_ENERGY);
        assert_eq!(c.food_eaten, 0);
        assert_eq!(c.offspring_count, 0);
        assert_eq!(c.position(), (0, 0));
        assert!(c.is_alive());
        assert!(c.actions().is_empty());
    }

    #[test]
    fn test_as_rival() {
        let mut c = Creature::new("alpha", traits(2, 3, 4)).at(5, 6);
        c.id = 9;
        let r = c.as_rival();
        assert_eq!(
            r,
            Rival {
                id: 9,
                x: 5,
                y: 6,
                speed: 2,
                size: 3
            }
        );
    }

    #[test]
    fn test_tick_moves_then_rests() {
        let mut habitat = TestHabitat::new(20, 20);
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = Creature::new("alpha", traits(5, 1, 20)).at(10, 10);
        let foods = vec![Food::new(10, 18, "f")];

        let fate = c.tick(&foods, &[], &mut habitat, &mut rng).unwrap();
        assert_eq!(fate, Some(Fate::Rested { offspring: 0 }));
        assert_eq!(c.actions()[0], "Moved to (10, 18)");
        assert!(c.actions()[1].starts_with("Rested at ("));
        // Rest restores energy no matter what the move cost.
        assert_eq!(c.energy, INITIAL_ENERGY);
        assert!(habitat.removed_food.is_empty());
    }

    #[test]
    fn test_tick_on_dead_creature_is_noop() {
        let mut habitat = TestHabitat::new(20, 20);
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = Creature::new("alpha", traits(5, 1, 20)).at(10, 10);
        c.energy = 0;
        assert_eq!(
            c.tick(&[], &[], &mut habitat, &mut rng).unwrap(),
            Some(Fate::Died)
        );
        let log_len = c.actions().len();

        let foods = vec![Food::new(10, 15, "f")];
        assert_eq!(c.tick(&foods, &[], &mut habitat, &mut rng).unwrap(), None);
        assert_eq!(c.actions().len(), log_len);
        assert_eq!(c.position(), (10, 10));
        assert_eq!(habitat.removed_creatures.len(), 1);
    }

    #[test]
    fn test_forage_without_food_does_nothing() {
        let mut habitat = TestHabitat::new(20, 20);
        let mut c = Creature::new("alpha", traits(5, 1, 3)).at(10, 10);
        // Food exists but is outside the sense radius.
        let foods = vec![Food::new(0, 0, "far")];
        c.forage(&foods, &[], &mut habitat).unwrap();
        assert_eq!(c.energy, INITIAL_ENERGY);
        assert!(c.actions().is_empty());
    }
}
