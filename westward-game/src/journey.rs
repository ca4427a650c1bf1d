//! The day-advancement engine: one call moves the whole aggregate forward
//! by a day, resolving consumption, mileage, weather, the event roll,
//! party health, and landmark detection in a fixed order.
use chrono::{Datelike, Duration};
use hmac::{Hmac, Mac};
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

use crate::constants::{
    DAILY_EVENT_CHANCE, EVENT_CHANCE_CAP, FAIR_HEALTH_RISK, FORT_MILES, INTERACTIVE_EVENT_SHARE,
    LOW_CLOTHING_RISK, NO_FOOD_RISK, POOR_HEALTH_RISK, RECOVERY_CHANCE_BASE,
    RECOVERY_CHANCE_GOOD_CONDITIONS, RIVER_MILES,
};
use crate::events;
use crate::state::{Ending, GameState, Health, PaceId, RationsId};
use crate::weather::{Weather, WeatherConfig, advance_weather};

/// Deterministic bundle of RNG streams segregated by simulation domain, so
/// a draw in one subsystem never perturbs another.
#[derive(Debug, Clone)]
pub struct RngBundle {
    weather: RefCell<SmallRng>,
    events: RefCell<SmallRng>,
    health: RefCell<SmallRng>,
    crossing: RefCell<SmallRng>,
    camp: RefCell<SmallRng>,
    hunt: RefCell<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let stream = |tag: &[u8]| RefCell::new(SmallRng::seed_from_u64(derive_stream_seed(seed, tag)));
        Self {
            weather: stream(b"weather"),
            events: stream(b"events"),
            health: stream(b"health"),
            crossing: stream(b"crossing"),
            camp: stream(b"camp"),
            hunt: stream(b"hunt"),
        }
    }

    #[must_use]
    pub fn weather(&self) -> RefMut<'_, SmallRng> {
        self.weather.borrow_mut()
    }

    #[must_use]
    pub fn events(&self) -> RefMut<'_, SmallRng> {
        self.events.borrow_mut()
    }

    #[must_use]
    pub fn health(&self) -> RefMut<'_, SmallRng> {
        self.health.borrow_mut()
    }

    #[must_use]
    pub fn crossing(&self) -> RefMut<'_, SmallRng> {
        self.crossing.borrow_mut()
    }

    #[must_use]
    pub fn camp(&self) -> RefMut<'_, SmallRng> {
        self.camp.borrow_mut()
    }

    #[must_use]
    pub fn hunt(&self) -> RefMut<'_, SmallRng> {
        self.hunt.borrow_mut()
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Tuning knobs for the daily tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayConfig {
    /// Base chance of any event on a travel day.
    pub event_chance: f32,
    /// Share of event days that surface an interactive event.
    pub interactive_share: f32,
    /// Scale the event chance by pace and weather instead of using the
    /// flat base chance.
    #[serde(default)]
    pub condition_scaled_events: bool,
    pub weather: WeatherConfig,
}

impl DayConfig {
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            event_chance: DAILY_EVENT_CHANCE,
            interactive_share: INTERACTIVE_EVENT_SHARE,
            condition_scaled_events: false,
            weather: WeatherConfig::default_config(),
        }
    }

    /// Load from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for DayConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Daily event chance scaled by pace and weather, capped at 95%.
#[must_use]
pub fn event_probability(base: f32, pace: PaceId, weather: Weather) -> f32 {
    (base + pace.event_chance_bonus() + weather.event_chance_bonus()).min(EVENT_CHANCE_CAP)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    Fort,
    River,
}

/// A fixed location on the trail, detected when the day's mileage carries
/// the party past its milepost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub kind: LandmarkKind,
    pub mile: i32,
}

impl Landmark {
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            LandmarkKind::Fort => format!("Fort at mile {}", self.mile),
            LandmarkKind::River => format!("River crossing at mile {}", self.mile),
        }
    }
}

/// First landmark whose milepost was crossed between the old and new
/// position. Forts take precedence when a single day crosses both.
#[must_use]
pub fn landmark_crossed(old_miles: i32, new_miles: i32) -> Option<Landmark> {
    for mile in FORT_MILES {
        if old_miles < mile && new_miles >= mile {
            return Some(Landmark {
                kind: LandmarkKind::Fort,
                mile,
            });
        }
    }
    for mile in RIVER_MILES {
        if old_miles < mile && new_miles >= mile {
            return Some(Landmark {
                kind: LandmarkKind::River,
                mile,
            });
        }
    }
    None
}

/// Result of one daily tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    /// False when the guard suppressed the tick (paused, event pending,
    /// terminal, or a deferred event fired instead).
    pub advanced: bool,
    pub miles_gained: i32,
    pub food_consumed: i32,
    pub event_fired: bool,
    pub landmark: Option<Landmark>,
    pub ending: Option<Ending>,
}

impl DayOutcome {
    fn skipped(gs: &GameState) -> Self {
        Self {
            advanced: false,
            miles_gained: 0,
            food_consumed: 0,
            event_fired: gs.in_event(),
            landmark: None,
            ending: gs.ending,
        }
    }
}

/// Advance the simulation by one day.
///
/// Preconditions: not paused, no pending event, not terminal — otherwise
/// the call is an idempotent no-op, not an error. A deferred event due at
/// this boundary becomes pending instead of the day advancing.
///
/// Each step reads the pre-advance state; the aggregate is replaced in one
/// pass with no partial update visible in between.
pub fn advance_day(gs: &mut GameState, cfg: &DayConfig, rngs: &RngBundle) -> DayOutcome {
    if !gs.can_advance() {
        debug!("advance_day suppressed by guard");
        return DayOutcome::skipped(gs);
    }
    if events::fire_deferred(gs) {
        return DayOutcome::skipped(gs);
    }

    // Step 1: food consumption.
    let food_consumed = gs.daily_food_consumption();
    let new_food = (gs.inventory.food - food_consumed).max(0);

    // Step 2: distance, from pre-advance weather and health.
    let miles_gained = gs.daily_miles();
    let old_miles = gs.miles;
    let new_miles = old_miles + miles_gained;

    // Step 3: weather transition for the new day.
    let month = gs.date.date().month();
    let new_weather = advance_weather(gs.weather, month, &cfg.weather, &mut *rngs.weather());

    // Step 4: the daily event roll. At most one event per day.
    let chance = if cfg.condition_scaled_events {
        event_probability(cfg.event_chance, gs.pace, gs.weather)
    } else {
        cfg.event_chance
    };
    let rolled = {
        let mut rng = rngs.events();
        if rng.r#gen::<f32>() < chance {
            if rng.r#gen::<f32>() < cfg.interactive_share {
                Some(RolledEvent::Interactive(events::pick_interactive(
                    new_miles, &mut *rng,
                )))
            } else {
                Some(RolledEvent::Fixed(events::pick_fixed(&mut *rng)))
            }
        } else {
            None
        }
    };

    // Step 5: party health, judged against the day's food and weather.
    update_party_health(gs, new_food == 0, new_weather, &mut *rngs.health());

    // Commit the aggregate.
    gs.date += Duration::days(1);
    gs.inventory.food = new_food;
    gs.miles = new_miles;
    gs.weather = new_weather;
    gs.push_message(format!(
        "Day {}: Traveled {} miles. {} miles total.",
        gs.day_count(),
        miles_gained,
        new_miles
    ));

    // Step 7: event announcement suspends the daily loop.
    let event_fired = rolled.is_some();
    match rolled {
        Some(RolledEvent::Fixed(event)) => events::activate_fixed(gs, event),
        Some(RolledEvent::Interactive(event)) => events::activate_interactive(gs, event),
        None => {}
    }

    // Step 6: landmark detection narrates; screen changes are the UI's job.
    let landmark = landmark_crossed(old_miles, new_miles);
    if let Some(landmark) = landmark {
        gs.push_message(format!("You've reached {}.", landmark.describe()));
    }

    let ending = gs.refresh_ending();
    DayOutcome {
        advanced: true,
        miles_gained,
        food_consumed,
        event_fired,
        landmark,
        ending,
    }
}

enum RolledEvent {
    Fixed(crate::data::FixedEvent),
    Interactive(&'static crate::data::InteractiveEvent),
}

/// Degrade-or-recover pass over every living member. Degradation is
/// checked first; recovery is only rolled when degradation did not fire,
/// and the two never both apply to a member on the same day.
fn update_party_health<R: Rng>(gs: &mut GameState, no_food: bool, weather: Weather, rng: &mut R) {
    let party_size = gs.party.len() as i32;
    let clothing_short = gs.inventory.clothing < party_size;
    let favorable = !no_food
        && weather == Weather::Good
        && gs.rations == RationsId::Filling
        && gs.pace == PaceId::Steady;
    let pace_risk = gs.pace.health_risk();
    let ration_risk = gs.rations.health_risk();

    for member in &mut gs.party.members {
        if !member.health.is_alive() {
            continue;
        }
        let mut risk = weather.health_risk() + pace_risk + ration_risk;
        if no_food {
            risk += NO_FOOD_RISK;
        }
        if clothing_short {
            risk += LOW_CLOTHING_RISK;
        }
        risk += match member.health {
            Health::Fair => FAIR_HEALTH_RISK,
            Health::Poor => POOR_HEALTH_RISK,
            _ => 0.0,
        };

        if rng.r#gen::<f32>() < risk {
            member.health = member.health.worsened();
            continue;
        }

        let recovery = if favorable {
            RECOVERY_CHANCE_GOOD_CONDITIONS
        } else {
            RECOVERY_CHANCE_BASE
        };
        if rng.r#gen::<f32>() < recovery && member.health != Health::Good {
            member.health = member.health.improved();
        }
    }
}

/// Estimated days to cover a stretch of trail at the given pace. The oxen
/// bonus rewards a deep team: +5% per head above two, up to +20%.
#[must_use]
pub fn travel_time_estimate(start_miles: i32, end_miles: i32, pace: PaceId, oxen_heads: i32) -> i32 {
    let distance = (end_miles - start_miles).max(0) as f32;
    let mut miles_per_day = crate::constants::BASE_MILES_PER_DAY * pace.travel_multiplier();
    miles_per_day *= 1.0 + ((oxen_heads - 2).clamp(0, 4) as f32) * 0.05;
    (distance / miles_per_day).ceil() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActiveEvent, DefeatReason};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn fresh_state(seed: u64) -> GameState {
        GameState::new("Augusta", &names(&["Silas", "Mercy", "Tobias", "June"]), seed)
    }

    /// Config with the stochastic branches pinned shut: no events, and
    /// weather that never resamples.
    fn quiet_config() -> DayConfig {
        let mut cfg = DayConfig::default_config();
        cfg.event_chance = 0.0;
        cfg.weather.persistence = 1.0;
        cfg
    }

    #[test]
    fn fresh_party_travels_twenty_miles_on_ten_pounds() {
        let mut gs = fresh_state(1);
        let rngs = RngBundle::from_user_seed(1);
        let outcome = advance_day(&mut gs, &quiet_config(), &rngs);
        assert!(outcome.advanced);
        assert_eq!(outcome.food_consumed, 10);
        assert_eq!(outcome.miles_gained, 20);
        assert_eq!(gs.inventory.food, 190);
        assert_eq!(gs.miles, 20);
        assert_eq!(gs.day_count(), 2);
    }

    #[test]
    fn guard_makes_advance_a_no_op() {
        let rngs = RngBundle::from_user_seed(2);
        let cfg = quiet_config();

        let mut paused = fresh_state(2);
        paused.is_paused = true;
        let before = paused.clone();
        let outcome = advance_day(&mut paused, &cfg, &rngs);
        assert!(!outcome.advanced);
        assert_eq!(paused, before);

        let mut pending = fresh_state(2);
        crate::events::trigger_event(&mut pending, &mut *rngs.events(), Some("snake_pit")).unwrap();
        let before = pending.clone();
        let outcome = advance_day(&mut pending, &cfg, &rngs);
        assert!(!outcome.advanced);
        assert_eq!(pending, before);
    }

    #[test]
    fn miles_never_decrease_from_a_tick() {
        let mut gs = fresh_state(3);
        let rngs = RngBundle::from_user_seed(3);
        let cfg = DayConfig::default_config();
        let mut last = gs.miles;
        for _ in 0..40 {
            if !gs.can_advance() {
                // Clear events through the cheap acknowledge paths.
                if matches!(gs.current_event, Some(ActiveEvent::Fixed { .. })) {
                    let kind_is_lost_trail = matches!(
                        gs.current_event,
                        Some(ActiveEvent::Fixed {
                            kind: crate::data::FixedEventKind::LostTrail,
                            ..
                        })
                    );
                    crate::events::resolve_fixed_event(&mut gs, &mut *rngs.events()).unwrap();
                    if kind_is_lost_trail {
                        last = gs.miles;
                        continue;
                    }
                } else if gs.in_event() {
                    crate::events::resolve_choice(&mut gs, &mut *rngs.events(), 1).unwrap();
                }
                if gs.is_terminal() {
                    break;
                }
                continue;
            }
            advance_day(&mut gs, &cfg, &rngs);
            assert!(gs.miles >= last, "miles regressed outside lost_trail");
            last = gs.miles;
        }
    }

    #[test]
    fn deferred_event_fires_instead_of_advancing() {
        let mut gs = fresh_state(4);
        let rngs = RngBundle::from_user_seed(4);
        crate::events::schedule_deferred(&mut gs, "thief_in_camp");
        let date_before = gs.date;
        let outcome = advance_day(&mut gs, &quiet_config(), &rngs);
        assert!(!outcome.advanced);
        assert!(gs.in_event());
        assert_eq!(gs.date, date_before, "the day does not advance");
    }

    #[test]
    fn landmark_thresholds_detect_first_crossing() {
        assert_eq!(
            landmark_crossed(240, 260).map(|l| (l.kind, l.mile)),
            Some((LandmarkKind::River, 250))
        );
        assert_eq!(
            landmark_crossed(295, 310).map(|l| (l.kind, l.mile)),
            Some((LandmarkKind::Fort, 300))
        );
        assert_eq!(landmark_crossed(260, 280), None);
        assert_eq!(landmark_crossed(250, 250), None, "already past the river");
    }

    #[test]
    fn starvation_grinds_down_the_party() {
        let mut gs = fresh_state(5);
        gs.inventory.food = 0;
        let rngs = RngBundle::from_user_seed(5);
        let cfg = quiet_config();
        for _ in 0..60 {
            if !gs.can_advance() {
                break;
            }
            advance_day(&mut gs, &cfg, &rngs);
        }
        assert!(
            gs.party.living_count() < 5,
            "sixty foodless days should cost lives"
        );
    }

    #[test]
    fn no_oxen_means_defeat() {
        let mut gs = fresh_state(6);
        gs.inventory.oxen = 0;
        let rngs = RngBundle::from_user_seed(6);
        let outcome = advance_day(&mut gs, &quiet_config(), &rngs);
        assert_eq!(
            outcome.ending,
            Some(Ending::Defeat {
                reason: DefeatReason::NoOxen
            })
        );
        assert!(!gs.can_advance());
    }

    #[test]
    fn rng_streams_are_reproducible() {
        let a = RngBundle::from_user_seed(99);
        let b = RngBundle::from_user_seed(99);
        let draw_a: u64 = a.events().r#gen();
        let draw_b: u64 = b.events().r#gen();
        assert_eq!(draw_a, draw_b);
        let weather_a: u64 = a.weather().r#gen();
        assert_ne!(weather_a, draw_a, "streams are domain-separated");
    }

    #[test]
    fn event_probability_caps_out() {
        let p = event_probability(0.9, PaceId::Grueling, Weather::VeryPoor);
        assert!((p - 0.95).abs() < f32::EPSILON);
        let base = event_probability(0.2, PaceId::Steady, Weather::Good);
        assert!((base - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn travel_time_estimate_rounds_up() {
        assert_eq!(travel_time_estimate(0, 100, PaceId::Steady, 4), 5);
        assert_eq!(travel_time_estimate(0, 100, PaceId::Grueling, 4), 3);
        assert_eq!(travel_time_estimate(100, 100, PaceId::Steady, 4), 0);
    }
}
