use super::config::MOVE_BASE_COST;
use super::creature::Creature;
use super::decision::Action;
use super::habitat::Habitat;

impl Creature {
    /// Take one step of exactly `speed` cells along the straight line to
    /// (tx, ty), rounding to the nearest cell. The step length does not shrink
    /// near the target, so a close target can be overshot. Rounding each axis
    /// can make a diagonal step shorter than `speed`: toward (10, 10) at
    /// speed 2 the creature lands on (1, 1).
    ///
    /// Costs `MOVE_BASE_COST + speed` energy. Returns false (and costs
    /// nothing) if the creature is already on the target.
    pub fn move_toward(&mut self, tx: i32, ty: i32) -> bool {
        let dx = f64::from(tx) - f64::from(self.x);
        let dy = f64::from(ty) - f64::from(self.y);
        let norm = (dx * dx + dy * dy).sqrt();
        if norm == 0.0 {
            return false;
        }

        let step = f64::from(self.traits.speed);
        self.x = self.x.saturating_add((dx / norm * step).round() as i32);
        self.y = self.y.saturating_add((dy / norm * step).round() as i32);

        let cost = MOVE_BASE_COST.saturating_add(self.traits.speed);
        self.energy = self.energy.saturating_sub(cost);
        self.record(format!("Moved to ({tx}, {ty})"));
        true
    }

    /// Carry out a decision: step toward the target and eat on exact arrival.
    pub(crate) fn perform<H>(&mut self, action: Action, habitat: &mut H)
    where
        H: Habitat + ?Sized,
    {
        if let Action::Pursue(food) = action {
            self.move_toward(food.x(), food.y());
            if self.position() == food.position() {
                self.eat(&food, habitat);
            }
        }
    }
}
