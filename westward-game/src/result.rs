//! End-of-run scoring and summary.
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::state::{Ending, GameState};

/// Point values for the final tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultConfig {
    pub points_per_survivor: i64,
    pub points_per_food_lb: i64,
    pub points_per_round: i64,
    pub points_per_clothing_set: i64,
    pub points_per_dollar: i64,
    pub points_per_spare_part: i64,
    pub early_arrival_bonus: i64,
    pub october_arrival_bonus: i64,
    pub late_arrival_bonus: i64,
}

impl ResultConfig {
    #[must_use]
    pub const fn default_config() -> Self {
        Self {
            points_per_survivor: 500,
            points_per_food_lb: 1,
            points_per_round: 2,
            points_per_clothing_set: 15,
            points_per_dollar: 5,
            points_per_spare_part: 25,
            early_arrival_bonus: 1_000,
            october_arrival_bonus: 500,
            late_arrival_bonus: 250,
        }
    }
}

impl Default for ResultConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub ending: Option<Ending>,
    pub days_on_trail: i64,
    pub miles: i32,
    pub survivors: usize,
    pub score: i64,
}

/// Tally the run. Survivors dominate; leftover supplies and an early
/// arrival pad the score.
#[must_use]
pub fn result_summary(gs: &GameState, cfg: &ResultConfig) -> ResultSummary {
    let survivors = gs.party.living_count();
    let inv = &gs.inventory;
    let mut score = survivors as i64 * cfg.points_per_survivor
        + i64::from(inv.food) * cfg.points_per_food_lb
        + i64::from(inv.ammunition) * cfg.points_per_round
        + i64::from(inv.clothing) * cfg.points_per_clothing_set
        + (gs.money_cents / 100) * cfg.points_per_dollar
        + i64::from(inv.total_spares()) * cfg.points_per_spare_part;
    score += match gs.date.date().month() {
        1..=9 => cfg.early_arrival_bonus,
        10 => cfg.october_arrival_bonus,
        _ => cfg.late_arrival_bonus,
    };
    ResultSummary {
        ending: gs.ending,
        days_on_trail: gs.day_count(),
        miles: gs.miles,
        survivors,
        score,
    }
}
