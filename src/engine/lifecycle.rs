use rand::Rng;

use crate::error::Result;

use super::config::{EAT_COST, INITIAL_ENERGY};
use super::creature::Creature;
use super::food::Food;
use super::habitat::{find_free_perimeter_cell, Habitat};

/// How a creature's status check ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fate {
    Died,
    Rested { offspring: u32 },
}

impl Creature {
    /// Eat `food` if standing exactly on it. Returns whether anything was eaten.
    pub fn eat<H>(&mut self, food: &Food, habitat: &mut H) -> bool
    where
        H: Habitat + ?Sized,
    {
        if self.position() != food.position() {
            return false;
        }
        self.energy -= EAT_COST;
        self.food_eaten += 1;
        habitat.remove_food(food);
        self.record(format!("Ate food at ({}, {})", food.x(), food.y()));
        true
    }

    /// End-of-turn bookkeeping: die when out of energy, otherwise breed once
    /// per food eaten beyond the first and then rest on the border.
    pub fn check_status<H, R>(&mut self, habitat: &mut H, rng: &mut R) -> Result<Fate>
    where
        H: Habitat + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.alive || self.energy <= 0 {
            self.die(habitat);
            return Ok(Fate::Died);
        }

        let litter = self.food_eaten.saturating_sub(1);
        for _ in 0..litter {
            self.reproduce(habitat, rng)?;
        }
        self.rest(habitat, rng)?;
        Ok(Fate::Rested { offspring: litter })
    }

    /// Remove this creature from the habitat. Only the first call has any effect.
    pub fn die<H>(&mut self, habitat: &mut H)
    where
        H: Habitat + ?Sized,
    {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.energy = self.energy.max(0);
        self.record("Died".to_string());
        tracing::info!(creature = %self.name, id = self.id, "Creature died");
        habitat.remove_creature(self);
    }

    /// Spawn one offspring on a free border cell and hand it to the habitat.
    /// Returns the offspring's name.
    pub fn reproduce<H, R>(&mut self, habitat: &mut H, rng: &mut R) -> Result<String>
    where
        H: Habitat + ?Sized,
        R: Rng + ?Sized,
    {
        let name = format!("{}{}", self.name, self.offspring_count);
        let (x, y) = find_free_perimeter_cell(habitat, rng)?;

        let mut child = Creature::new(name.clone(), self.traits).at(x, y);
        child.record(format!("Born at ({x}, {y})"));
        habitat.add_creature(child);

        self.offspring_count += 1;
        self.record(format!("Reproduced, offspring: {name}"));
        Ok(name)
    }

    /// Restore energy, clear the food counter and move to a random free
    /// border cell.
    pub fn rest<H, R>(&mut self, habitat: &mut H, rng: &mut R) -> Result<()>
    where
        H: Habitat + ?Sized,
        R: Rng + ?Sized,
    {
        let (x, y) = match find_free_perimeter_cell(habitat, rng) {
            Ok(cell) => cell,
            Err(e) => {
                tracing::warn!(creature = %self.name, id = self.id, "Rest placement failed: {e}");
                return Err(e);
            }
        };

        self.energy = INITIAL_ENERGY;
        self.food_eaten = 0;
        self.x = x;
        self.y = y;
        self.record(format!("Rested at ({x}, {y})"));
        Ok(())
    }
}
