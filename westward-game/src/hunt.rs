//! Hunting settlement: the engine only books the tally the minigame hands
//! back; real-time aiming and movement are presentation concerns.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{QUICK_HUNT_MIN_AMMO, QUICK_HUNT_SUCCESS_CHANCE};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntAnimal {
    Squirrel,
    Rabbit,
    Deer,
    Bison,
}

impl HuntAnimal {
    #[must_use]
    pub const fn food_yield_lbs(self) -> i32 {
        match self {
            Self::Squirrel => 2,
            Self::Rabbit => 10,
            Self::Deer => 60,
            Self::Bison => 100,
        }
    }
}

/// Final ledger for one minigame session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntSettlement {
    pub rounds_spent: i32,
    pub food_gained_lbs: i32,
}

/// Debit ammunition by shots fired and credit food by the total yield of
/// the animals hit.
pub fn settle_hunt(gs: &mut GameState, shots_fired: i32, animals_hit: &[HuntAnimal]) -> HuntSettlement {
    let rounds_spent = shots_fired.min(gs.inventory.ammunition).max(0);
    let food_gained: i32 = animals_hit.iter().map(|a| a.food_yield_lbs()).sum();
    gs.inventory.ammunition = (gs.inventory.ammunition - shots_fired.max(0)).max(0);
    gs.inventory.food += food_gained;
    gs.is_paused = false;
    if food_gained > 0 {
        gs.push_message(format!(
            "Hunting successful! Gained {food_gained} pounds of food."
        ));
    } else {
        gs.push_message("Hunting unsuccessful.");
    }
    HuntSettlement {
        rounds_spent,
        food_gained_lbs: food_gained,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickHuntOutcome {
    /// A quick hunt needs at least ten rounds on hand.
    Blocked,
    Missed { rounds_spent: i32 },
    Bagged { rounds_spent: i32, food_lbs: i32 },
}

/// A hunt resolved in one roll from the travel screen, without the
/// minigame.
pub fn quick_hunt<R: Rng + ?Sized>(gs: &mut GameState, rng: &mut R) -> QuickHuntOutcome {
    if gs.inventory.ammunition < QUICK_HUNT_MIN_AMMO {
        gs.push_message("Not enough ammunition to hunt.");
        return QuickHuntOutcome::Blocked;
    }
    let rounds = rng.gen_range(5..10);
    gs.inventory.ammunition = (gs.inventory.ammunition - rounds).max(0);
    if rng.gen_bool(QUICK_HUNT_SUCCESS_CHANCE) {
        let food = rng.gen_range(30..80);
        gs.inventory.food += food;
        gs.push_message(format!(
            "Hunting successful! Gained {food} pounds of food."
        ));
        QuickHuntOutcome::Bagged {
            rounds_spent: rounds,
            food_lbs: food,
        }
    } else {
        gs.push_message("Hunting unsuccessful.");
        QuickHuntOutcome::Missed {
            rounds_spent: rounds,
        }
    }
}
