//! River crossings: ford, ferry, or wait out the water.
use chrono::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{FORD_DANGER_RANGE_FT, FORD_SAFE_DEPTH_FT, WAIT_CROSSING_SAFE_CHANCE};
use crate::state::{GameState, Health, MemberId, format_money_cents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingStrategy {
    Ford,
    Ferry,
    Wait,
}

impl CrossingStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ford => "ford",
            Self::Ferry => "ferry",
            Self::Wait => "wait",
        }
    }
}

impl fmt::Display for CrossingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrossingStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ford" => Ok(Self::Ford),
            "ferry" => Ok(Self::Ferry),
            "wait" => Ok(Self::Wait),
            _ => Err(()),
        }
    }
}

/// A surveyed river: depth and width drive the ford risk, and the ferry
/// operator quotes a price on the spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiverConditions {
    pub depth_ft: i32,
    pub width_ft: i32,
    pub ferry_price_cents: i64,
}

impl RiverConditions {
    /// Roll up a river at the current crossing.
    pub fn survey<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            depth_ft: rng.gen_range(1..=10),
            width_ft: rng.gen_range(50..150),
            ferry_price_cents: i64::from(rng.gen_range(5..25)) * 100,
        }
    }

    /// Probability that fording goes wrong, rising linearly past the safe
    /// depth.
    #[must_use]
    pub fn ford_danger(&self) -> f32 {
        if self.depth_ft <= FORD_SAFE_DEPTH_FT {
            return 0.0;
        }
        (self.depth_ft - FORD_SAFE_DEPTH_FT) as f32 / FORD_DANGER_RANGE_FT
    }
}

/// What happened at the river. `FerryRefused` signals the UI to reset the
/// strategy selection; every other variant resumes travel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossingOutcome {
    Crossed,
    SuppliesLost {
        food: i32,
        ammunition: i32,
        clothing: i32,
    },
    MemberInjured(MemberId),
    MemberDrowned(MemberId),
    FerryRefused {
        price_cents: i64,
    },
    Waited {
        days: i32,
        safe: bool,
        food_lost: i32,
    },
}

/// Advisor from the trail guide: which strategy suits the surveyed river
/// and the money on hand.
#[must_use]
pub fn suggest_strategy(river: &RiverConditions, money_cents: i64) -> CrossingStrategy {
    if river.depth_ft <= FORD_SAFE_DEPTH_FT {
        return CrossingStrategy::Ford;
    }
    if money_cents >= river.ferry_price_cents {
        return CrossingStrategy::Ferry;
    }
    if river.depth_ft > 6 {
        return CrossingStrategy::Wait;
    }
    CrossingStrategy::Ford
}

/// Resolve one crossing attempt. On every outcome except a refused ferry
/// the pause flag is cleared and travel resumes.
pub fn cross_river<R: Rng + ?Sized>(
    gs: &mut GameState,
    strategy: CrossingStrategy,
    river: &RiverConditions,
    rng: &mut R,
) -> CrossingOutcome {
    let outcome = match strategy {
        CrossingStrategy::Ford => ford(gs, river, rng),
        CrossingStrategy::Ferry => ferry(gs, river),
        CrossingStrategy::Wait => wait_out(gs, rng),
    };
    if !matches!(outcome, CrossingOutcome::FerryRefused { .. }) {
        gs.is_paused = false;
    }
    gs.refresh_ending();
    outcome
}

fn ford<R: Rng + ?Sized>(
    gs: &mut GameState,
    river: &RiverConditions,
    rng: &mut R,
) -> CrossingOutcome {
    if river.depth_ft <= FORD_SAFE_DEPTH_FT {
        gs.push_message("You safely forded the river. The crossing was easy.");
        return CrossingOutcome::Crossed;
    }
    if rng.r#gen::<f32>() >= river.ford_danger() {
        gs.push_message("You successfully forded the river, though it was difficult.");
        return CrossingOutcome::Crossed;
    }

    // Disaster sub-outcomes split 30/30/40.
    let disaster: f32 = rng.r#gen();
    if disaster < 0.3 {
        let food_lost = (gs.inventory.food as f32 * 0.3).floor() as i32;
        gs.inventory.food = (gs.inventory.food - food_lost).max(0);
        gs.push_message(format!(
            "Disaster! Your wagon tipped while crossing. You lost {food_lost} pounds of food."
        ));
        CrossingOutcome::SuppliesLost {
            food: food_lost,
            ammunition: 0,
            clothing: 0,
        }
    } else if disaster < 0.6 {
        let ammo_lost = (gs.inventory.ammunition as f32 * 0.3).floor() as i32;
        let clothing_lost = (gs.inventory.clothing as f32 * 0.3).floor() as i32;
        gs.inventory.ammunition = (gs.inventory.ammunition - ammo_lost).max(0);
        gs.inventory.clothing = (gs.inventory.clothing - clothing_lost).max(0);
        gs.push_message("Disaster! Your wagon tipped while crossing. You lost some supplies.");
        CrossingOutcome::SuppliesLost {
            food: 0,
            ammunition: ammo_lost,
            clothing: clothing_lost,
        }
    } else if let Some(id) = gs.party.random_living(rng) {
        let name = gs.party.get(id).map_or_else(String::new, |m| m.name.clone());
        if rng.gen_bool(0.5) {
            gs.party.get_mut(id).expect("member exists").health = Health::Poor;
            gs.push_message(format!(
                "{name} nearly drowned crossing the river and is now in poor health."
            ));
            CrossingOutcome::MemberInjured(id)
        } else {
            gs.party.get_mut(id).expect("member exists").health = Health::Dead;
            gs.push_message(format!("{name} drowned while crossing the river."));
            CrossingOutcome::MemberDrowned(id)
        }
    } else {
        CrossingOutcome::Crossed
    }
}

fn ferry(gs: &mut GameState, river: &RiverConditions) -> CrossingOutcome {
    let price = river.ferry_price_cents;
    if gs.money_cents < price {
        gs.push_message(
            "You don't have enough money for the ferry. You'll need to choose another option.",
        );
        return CrossingOutcome::FerryRefused { price_cents: price };
    }
    gs.money_cents -= price;
    gs.push_message(format!(
        "You paid {} to safely cross on the ferry.",
        format_money_cents(price)
    ));
    CrossingOutcome::Crossed
}

fn wait_out<R: Rng + ?Sized>(gs: &mut GameState, rng: &mut R) -> CrossingOutcome {
    let days = rng.gen_range(1..=3);
    let food_consumed = gs.party.living_count() as i32 * days * 2;
    gs.date += Duration::days(i64::from(days));
    gs.inventory.food = (gs.inventory.food - food_consumed).max(0);
    gs.push_message(format!("You waited {days} days for better conditions."));
    gs.push_message("The river seems a bit calmer now. You decide to ford it.");

    if rng.r#gen::<f32>() < WAIT_CROSSING_SAFE_CHANCE {
        gs.push_message("You crossed the river safely.");
        return CrossingOutcome::Waited {
            days,
            safe: true,
            food_lost: 0,
        };
    }
    let food_lost = (gs.inventory.food as f32 * 0.15).floor() as i32;
    gs.inventory.food = (gs.inventory.food - food_lost).max(0);
    gs.push_message(format!(
        "There were still some challenges crossing. You lost {food_lost} pounds of food."
    ));
    CrossingOutcome::Waited {
        days,
        safe: false,
        food_lost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn fresh_state() -> GameState {
        let members: Vec<String> = ["Silas", "Mercy", "Tobias", "June"]
            .iter()
            .map(ToString::to_string)
            .collect();
        GameState::new("Augusta", &members, 31)
    }

    fn shallow_river() -> RiverConditions {
        RiverConditions {
            depth_ft: 2,
            width_ft: 80,
            ferry_price_cents: 1_200,
        }
    }

    #[test]
    fn surveyed_rivers_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..64 {
            let river = RiverConditions::survey(&mut rng);
            assert!((1..=10).contains(&river.depth_ft));
            assert!((50..150).contains(&river.width_ft));
            assert!((500..2_500).contains(&river.ferry_price_cents));
        }
    }

    #[test]
    fn shallow_ford_is_always_safe() {
        let mut gs = fresh_state();
        gs.is_paused = true;
        let mut rng = SmallRng::seed_from_u64(2);
        let outcome = cross_river(&mut gs, CrossingStrategy::Ford, &shallow_river(), &mut rng);
        assert_eq!(outcome, CrossingOutcome::Crossed);
        assert!(!gs.is_paused, "crossing resumes travel");
    }

    #[test]
    fn deep_ford_danger_rises_linearly() {
        let river = RiverConditions {
            depth_ft: 10,
            width_ft: 100,
            ferry_price_cents: 1_000,
        };
        assert!((river.ford_danger() - 1.0).abs() < f32::EPSILON);
        let mid = RiverConditions {
            depth_ft: 5,
            ..river
        };
        assert!((mid.ford_danger() - 2.0 / 7.0).abs() < 1e-6);
        assert!((shallow_river().ford_danger()).abs() < f32::EPSILON);
    }

    #[test]
    fn ferry_without_funds_is_refused_and_keeps_money() {
        let mut gs = fresh_state();
        gs.money_cents = 500;
        gs.is_paused = true;
        let river = RiverConditions {
            depth_ft: 8,
            width_ft: 120,
            ferry_price_cents: 1_800,
        };
        let mut rng = SmallRng::seed_from_u64(3);
        let outcome = cross_river(&mut gs, CrossingStrategy::Ferry, &river, &mut rng);
        assert_eq!(outcome, CrossingOutcome::FerryRefused { price_cents: 1_800 });
        assert_eq!(gs.money_cents, 500);
        assert!(gs.is_paused, "refusal returns to strategy selection");
    }

    #[test]
    fn ferry_with_funds_debits_the_fare() {
        let mut gs = fresh_state();
        let river = RiverConditions {
            depth_ft: 8,
            width_ft: 120,
            ferry_price_cents: 1_800,
        };
        let mut rng = SmallRng::seed_from_u64(4);
        let outcome = cross_river(&mut gs, CrossingStrategy::Ferry, &river, &mut rng);
        assert_eq!(outcome, CrossingOutcome::Crossed);
        assert_eq!(gs.money_cents, 88_200);
    }

    #[test]
    fn waiting_eats_food_and_days() {
        let mut gs = fresh_state();
        let date_before = gs.date;
        let mut rng = SmallRng::seed_from_u64(5);
        let outcome = cross_river(&mut gs, CrossingStrategy::Wait, &shallow_river(), &mut rng);
        let CrossingOutcome::Waited { days, food_lost, safe } = outcome else {
            panic!("wait strategy yields a Waited outcome");
        };
        assert!((1..=3).contains(&days));
        let expected_food = 200 - 5 * days * 2 - food_lost;
        assert_eq!(gs.inventory.food, expected_food);
        assert_eq!(gs.date, date_before + Duration::days(i64::from(days)));
        if safe {
            assert_eq!(food_lost, 0);
        }
    }

    #[test]
    fn deep_ford_eventually_claims_a_victim() {
        let mut rng = SmallRng::seed_from_u64(6);
        let river = RiverConditions {
            depth_ft: 10,
            width_ft: 140,
            ferry_price_cents: 900,
        };
        let mut saw_party_harm = false;
        for _ in 0..64 {
            let mut gs = fresh_state();
            let outcome = cross_river(&mut gs, CrossingStrategy::Ford, &river, &mut rng);
            match outcome {
                CrossingOutcome::MemberDrowned(id) => {
                    assert_eq!(gs.party.get(id).unwrap().health, Health::Dead);
                    saw_party_harm = true;
                }
                CrossingOutcome::MemberInjured(id) => {
                    assert_eq!(gs.party.get(id).unwrap().health, Health::Poor);
                    saw_party_harm = true;
                }
                CrossingOutcome::SuppliesLost { .. } | CrossingOutcome::Crossed => {}
                other => panic!("unexpected outcome {other:?}"),
            }
            assert_eq!(gs.party.len(), 5, "crossings never shrink the party");
        }
        assert!(saw_party_harm, "64 max-depth fords should harm someone");
    }

    #[test]
    fn advisor_prefers_safe_options() {
        let shallow = shallow_river();
        assert_eq!(suggest_strategy(&shallow, 0), CrossingStrategy::Ford);
        let deep = RiverConditions {
            depth_ft: 9,
            width_ft: 100,
            ferry_price_cents: 1_000,
        };
        assert_eq!(suggest_strategy(&deep, 5_000), CrossingStrategy::Ferry);
        assert_eq!(suggest_strategy(&deep, 100), CrossingStrategy::Wait);
        let middling = RiverConditions {
            depth_ft: 5,
            width_ft: 100,
            ferry_price_cents: 1_000,
        };
        assert_eq!(suggest_strategy(&middling, 100), CrossingStrategy::Ford);
    }
}
