// Contention resolution: which visible food, if any, a creature may go for.
//
// A creature only commits to food it can win. It loses a candidate to any
// visible competitor that would arrive strictly sooner, and to any visible
// competitor that is strictly larger regardless of arrival time.

use crate::error::{ForageError, Result};

use super::config::CONTENTION_CANDIDATES;
use super::creature::{Creature, Rival};
use super::food::Food;
use super::perception::distance;

/// The outcome of one decision cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Nothing worth pursuing; stay put.
    Idle,
    /// Step toward this food and eat it on arrival.
    Pursue(Food),
}

/// Ticks needed to cover the straight line from (x, y) to `food`.
pub fn time_to_food(id: u32, x: i32, y: i32, speed: i32, food: &Food) -> Result<f64> {
    if speed <= 0 {
        return Err(ForageError::NonPositiveSpeed { id, speed });
    }
    Ok(distance(x, y, food.x(), food.y()) / speed as f64)
}

impl Rival {
    pub fn time_to_food(&self, food: &Food) -> Result<f64> {
        time_to_food(self.id, self.x, self.y, self.speed, food)
    }
}

impl Creature {
    pub fn time_to_food(&self, food: &Food) -> Result<f64> {
        time_to_food(self.id, self.x, self.y, self.traits.speed, food)
    }

    /// Pick the food to pursue among `visible`, given the competitors in `rivals`.
    ///
    /// Only the nearest `CONTENTION_CANDIDATES` items are weighed; equal
    /// distances keep their input order. Among claimable candidates the one
    /// with the smallest time-to-food wins.
    pub fn best_decision<'a>(
        &self,
        visible: &[&'a Food],
        rivals: &[&Rival],
    ) -> Result<Option<&'a Food>> {
        let mut ranked: Vec<(f64, &'a Food)> = visible
            .iter()
            .map(|f| (self.distance_to(f.x(), f.y()), *f))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut chosen = None;
        let mut best_time = f64::MAX;

        for &(_, food) in ranked.iter().take(CONTENTION_CANDIDATES) {
            let own_time = self.time_to_food(food)?;

            let mut claimable = true;
            for rival in rivals {
                if rival.time_to_food(food)? < own_time || rival.size > self.traits.size {
                    claimable = false;
                    break;
                }
            }

            if claimable && own_time < best_time {
                best_time = own_time;
                chosen = Some(food);
            }
        }

        Ok(chosen)
    }

    /// Perceive, resolve contention and turn the result into an action.
    pub fn decide(&self, foods: &[Food], rivals: &[Rival]) -> Result<Action> {
        let seen = self.perceive(foods, rivals);
        Ok(match self.best_decision(&seen.food, &seen.rivals)? {
            Some(food) => Action::Pursue(food.clone()),
            None => Action::Idle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::habitat::testing::traits;

    fn rival(id: u32, x: i32, y: i32, speed: i32, size: i32) -> Rival {
        Rival {
            id,
            x,
            y,
            speed,
            size,
        }
    }

    fn creature(speed: i32, size: i32, x: i32, y: i32) -> Creature {
        let mut c = Creature::new("decider", traits(speed, size, 50)).at(x, y);
        c.id = 1;
        c
    }

    #[test]
    fn test_time_to_food() {
        let food = Food::new(6, 8, "f");
        assert_eq!(time_to_food(1, 0, 0, 2, &food), Ok(5.0));
        assert_eq!(
            time_to_food(4, 0, 0, 0, &food),
            Err(ForageError::NonPositiveSpeed { id: 4, speed: 0 })
        );
        assert!(time_to_food(4, 0, 0, -3, &food).is_err());
    }

    #[test]
    fn test_no_food_no_target() {
        let c = creature(2, 1, 0, 0);
        assert_eq!(c.best_decision(&[], &[]), Ok(None));
        assert_eq!(c.decide(&[], &[]), Ok(Action::Idle));
    }

    #[test]
    fn test_picks_nearest_without_competition() {
        let c = creature(2, 1, 0, 0);
        let foods = vec![Food::new(9, 0, "far"), Food::new(3, 0, "near")];
        let action = c.decide(&foods, &[]).unwrap();
        assert_eq!(action, Action::Pursue(Food::new(3, 0, "near")));
    }

    #[test]
    fn test_faster_rival_blocks_claim() {
        let c = creature(1, 1, 0, 0);
        let food = Food::new(4, 0, "f");
        // Rival is 2 cells away with speed 1: time 2 < 4.
        let r = rival(2, 6, 0, 1, 1);
        assert_eq!(c.best_decision(&[&food], &[&r]), Ok(None));
    }

    #[test]
    fn test_equal_time_does_not_block() {
        let c = creature(1, 1, 0, 0);
        let food = Food::new(4, 0, "f");
        let r = rival(2, 8, 0, 1, 1);
        assert_eq!(c.best_decision(&[&food], &[&r]), Ok(Some(&food)));
    }

    #[test]
    fn test_larger_rival_wins_even_when_slower() {
        // A would arrive first, but B is larger.
        let a = creature(5, 1, 0, 0);
        let food = Food::new(5, 0, "contested");
        let b = rival(2, 10, 10, 1, 3);
        assert!(b.time_to_food(&food).unwrap() > a.time_to_food(&food).unwrap());
        assert_eq!(a.best_decision(&[&food], &[&b]), Ok(None));
    }

    #[test]
    fn test_smaller_slower_rival_does_not_block() {
        let c = creature(2, 3, 0, 0);
        let food = Food::new(4, 0, "f");
        let r = rival(2, 20, 0, 1, 1);
        assert_eq!(c.best_decision(&[&food], &[&r]), Ok(Some(&food)));
    }

    #[test]
    fn test_falls_back_to_second_candidate() {
        let c = creature(1, 1, 0, 0);
        let near = Food::new(2, 0, "near");
        let second = Food::new(0, 3, "second");
        // Rival sits on top of the nearest food.
        let r = rival(2, 2, 0, 1, 1);
        assert_eq!(
            c.best_decision(&[&near, &second], &[&r]),
            Ok(Some(&second))
        );
    }

    #[test]
    fn test_only_two_nearest_considered() {
        let c = creature(1, 1, 0, 0);
        let a = Food::new(2, 0, "a");
        let b = Food::new(2, 1, "b");
        let third = Food::new(-3, 0, "third");
        // The rival beats us to a and b; third would be ours but is not weighed.
        let r = rival(2, 3, 0, 1, 1);
        assert!(r.time_to_food(&third).unwrap() > c.time_to_food(&third).unwrap());
        assert_eq!(c.best_decision(&[&a, &b, &third], &[&r]), Ok(None));
        assert_eq!(c.best_decision(&[&third], &[&r]), Ok(Some(&third)));
    }

    #[test]
    fn test_equal_distance_keeps_input_order() {
        let c = creature(1, 1, 0, 0);
        let first = Food::new(0, 2, "first");
        let second = Food::new(2, 0, "second");
        assert_eq!(c.best_decision(&[&first, &second], &[]), Ok(Some(&first)));
        assert_eq!(c.best_decision(&[&second, &first], &[]), Ok(Some(&second)));
    }

    #[test]
    fn test_zero_speed_fails_only_with_candidates() {
        let mut c = creature(0, 1, 0, 0);
        c.id = 5;
        assert_eq!(c.decide(&[], &[]), Ok(Action::Idle));
        let foods = vec![Food::new(1, 0, "f")];
        assert_eq!(
            c.decide(&foods, &[]),
            Err(ForageError::NonPositiveSpeed { id: 5, speed: 0 })
        );
    }

    #[test]
    fn test_zero_speed_rival_fails() {
        let c = creature(1, 1, 0, 0);
        let food = Food::new(3, 0, "f");
        let r = rival(9, 5, 0, 0, 1);
        assert_eq!(
            c.best_decision(&[&food], &[&r]),
            Err(ForageError::NonPositiveSpeed { id: 9, speed: 0 })
        );
    }

    #[test]
    fn test_decide_ignores_unseen_rivals() {
        let mut c = Creature::new("decider", traits(1, 1, 5)).at(0, 0);
        c.id = 1;
        let foods = vec![Food::new(3, 0, "f")];
        // Larger rival, but outside the sense radius.
        let rivals = vec![rival(2, 30, 0, 1, 9)];
        assert_eq!(
            c.decide(&foods, &rivals),
            Ok(Action::Pursue(Food::new(3, 0, "f")))
        );
    }
}
