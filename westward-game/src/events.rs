//! Event selection, triggering, deferral, and the choice-resolution engine.
//!
//! Resolution always returns the state machine to "traveling": whatever the
//! effect, the active event slot and pause flag are cleared afterward.
use log::debug;
use rand::Rng;
use thiserror::Error;

use crate::data::{
    Bounty, FixedEvent, FixedEventKind, InteractiveEvent, fixed_catalog, interactive_catalog,
};
use crate::state::{ActiveEvent, GameState, Health, MemberId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    /// Data error: the engine never substitutes a default event.
    #[error("unknown interactive event id: {0}")]
    UnknownEvent(String),
    #[error("no event is awaiting resolution")]
    NoActiveEvent,
    #[error("the active event is {0}, not the kind this call resolves")]
    WrongEventKind(&'static str),
    #[error("choice {index} out of range for event {event_id}")]
    ChoiceOutOfRange { event_id: String, index: usize },
}

/// Look up an interactive event by id. Deterministic; used for scripted
/// and deferred triggers.
#[must_use]
pub fn find_interactive(id: &str) -> Option<&'static InteractiveEvent> {
    interactive_catalog().iter().find(|event| event.id == id)
}

/// Pick an interactive event uniformly among those whose mile window
/// admits the current position.
pub fn pick_interactive<R: Rng + ?Sized>(miles: i32, rng: &mut R) -> &'static InteractiveEvent {
    let catalog = interactive_catalog();
    let eligible: Vec<&'static InteractiveEvent> = catalog
        .iter()
        .filter(|event| {
            event
                .mile_window
                .is_none_or(|(lo, hi)| (lo..=hi).contains(&miles))
        })
        .collect();
    if eligible.is_empty() {
        return &catalog[rng.gen_range(0..catalog.len())];
    }
    eligible[rng.gen_range(0..eligible.len())]
}

/// Draw a fixed event uniformly from the catalog.
pub fn pick_fixed<R: Rng + ?Sized>(rng: &mut R) -> FixedEvent {
    let catalog = fixed_catalog();
    catalog[rng.gen_range(0..catalog.len())].clone()
}

pub(crate) fn activate_interactive(gs: &mut GameState, event: &'static InteractiveEvent) {
    gs.push_message(event.description);
    gs.current_event = Some(ActiveEvent::Interactive {
        id: event.id.to_string(),
        title: event.title.to_string(),
        description: event.description.to_string(),
    });
    gs.is_paused = true;
}

pub(crate) fn activate_fixed(gs: &mut GameState, event: FixedEvent) {
    gs.push_message(event.description.clone());
    gs.current_event = Some(ActiveEvent::Fixed {
        kind: event.kind,
        description: event.description,
        severity: event.severity,
        bounty: event.bounty,
    });
}

/// Force a specific or random interactive event, honoring the pause/event
/// guard: while another event is active, paused, or the run is over, the
/// call is a silent no-op and returns `Ok(false)`.
///
/// # Errors
///
/// Returns [`EventError::UnknownEvent`] for an id not in the catalog.
pub fn trigger_event<R: Rng + ?Sized>(
    gs: &mut GameState,
    rng: &mut R,
    id: Option<&str>,
) -> Result<bool, EventError> {
    if gs.is_paused || gs.in_event() || gs.is_terminal() {
        debug!("trigger_event suppressed by guard");
        return Ok(false);
    }
    let event = match id {
        Some(id) => find_interactive(id).ok_or_else(|| EventError::UnknownEvent(id.to_string()))?,
        None => pick_interactive(gs.miles, rng),
    };
    activate_interactive(gs, event);
    Ok(true)
}

/// Queue an interactive event to fire at the next eligible transition
/// boundary. The slot holds one id; later deferrals are dropped, not
/// buffered.
pub fn schedule_deferred(gs: &mut GameState, id: &str) {
    if find_interactive(id).is_none() {
        debug!("ignoring deferral of unknown event {id}");
        return;
    }
    if gs.deferred_event.is_some() {
        debug!("deferred-event slot occupied; dropping {id}");
        return;
    }
    gs.deferred_event = Some(id.to_string());
}

/// Consume the deferred slot if the guard permits. Returns true when an
/// event became pending.
pub(crate) fn fire_deferred(gs: &mut GameState) -> bool {
    if !gs.can_advance() || gs.deferred_event.is_none() {
        return false;
    }
    let Some(id) = gs.deferred_event.take() else {
        return false;
    };
    match find_interactive(&id) {
        Some(event) => {
            activate_interactive(gs, event);
            true
        }
        None => {
            debug!("dropping deferred unknown event {id}");
            false
        }
    }
}

fn random_healthy<R: Rng + ?Sized>(gs: &GameState, rng: &mut R) -> Option<MemberId> {
    let healthy: Vec<MemberId> = gs
        .party
        .living()
        .filter(|m| m.health == Health::Good)
        .map(|m| m.id)
        .collect();
    if healthy.is_empty() {
        return None;
    }
    Some(healthy[rng.gen_range(0..healthy.len())])
}

/// Apply the effect of the selected choice of the active interactive
/// event, then return to the traveling state.
///
/// # Errors
///
/// Fails when no interactive event is active, the stored id is not in the
/// catalog (a data error; the state is left untouched), or the index is
/// out of range.
pub fn resolve_choice<R: Rng>(
    gs: &mut GameState,
    rng: &mut R,
    choice_index: usize,
) -> Result<&'static str, EventError> {
    let event_id = match &gs.current_event {
        Some(ActiveEvent::Interactive { id, .. }) => id.clone(),
        Some(ActiveEvent::Fixed { .. }) => return Err(EventError::WrongEventKind("fixed")),
        None => return Err(EventError::NoActiveEvent),
    };
    let event = find_interactive(&event_id).ok_or(EventError::UnknownEvent(event_id.clone()))?;
    let choice = event
        .choices
        .get(choice_index)
        .ok_or(EventError::ChoiceOutOfRange {
            event_id,
            index: choice_index,
        })?;

    let delta = (choice.effect)(gs, rng);
    gs.push_message(choice.outcome);
    gs.apply_delta(delta);
    gs.current_event = None;
    gs.is_paused = false;
    gs.refresh_ending();
    Ok(choice.outcome)
}

/// Resolve the active fixed event, then return to the traveling state.
///
/// # Errors
///
/// Fails when no fixed event is active.
pub fn resolve_fixed_event<R: Rng + ?Sized>(
    gs: &mut GameState,
    rng: &mut R,
) -> Result<(), EventError> {
    let (kind, bounty) = match &gs.current_event {
        Some(ActiveEvent::Fixed { kind, bounty, .. }) => (*kind, *bounty),
        Some(ActiveEvent::Interactive { .. }) => {
            return Err(EventError::WrongEventKind("interactive"));
        }
        None => return Err(EventError::NoActiveEvent),
    };

    match kind {
        FixedEventKind::Illness => {
            if let Some(id) = gs.party.random_living(rng) {
                let member = gs.party.get(id).expect("living member exists");
                let worse = if member.health == Health::Good {
                    Health::Fair
                } else {
                    Health::Poor
                };
                let name = member.name.clone();
                gs.party.get_mut(id).expect("living member exists").health = worse;
                gs.push_message(format!(
                    "{name} is sick and their health has worsened to {worse}."
                ));
            }
        }
        FixedEventKind::BrokenWheel => {
            if gs.inventory.spare_wheels > 0 {
                gs.inventory.spare_wheels -= 1;
                gs.push_message("Used a spare wheel to fix the wagon.");
            } else {
                gs.push_message(
                    "No spare wheel available. Travel will be slower until you obtain one.",
                );
            }
        }
        FixedEventKind::BrokenAxle => {
            if gs.inventory.spare_axles > 0 {
                gs.inventory.spare_axles -= 1;
                gs.push_message("Used a spare axle to fix the wagon.");
            } else {
                gs.push_message(
                    "No spare axle available. Travel will be much slower until you obtain one.",
                );
            }
        }
        FixedEventKind::BrokenTongue => {
            if gs.inventory.spare_tongues > 0 {
                gs.inventory.spare_tongues -= 1;
                gs.push_message("Used a spare wagon tongue to fix the wagon.");
            } else {
                gs.push_message(
                    "No spare wagon tongue available. Travel will be slower until you obtain one.",
                );
            }
        }
        FixedEventKind::BadWater => {
            if rng.gen_bool(0.5)
                && let Some(id) = random_healthy(gs, rng)
            {
                let name = gs.party.get(id).map_or_else(String::new, |m| m.name.clone());
                gs.party.get_mut(id).expect("member exists").health = Health::Fair;
                gs.push_message(format!("{name} got sick from the bad water."));
            } else {
                gs.push_message("Fortunately, no one got sick from the bad water.");
            }
        }
        FixedEventKind::LostTrail => {
            let lost = rng.gen_range(5..15);
            gs.miles = (gs.miles - lost).max(0);
            gs.push_message("You lost some time finding the trail again.");
        }
        FixedEventKind::HeavyFog => {
            gs.push_message("The heavy fog has cleared.");
        }
        FixedEventKind::SnakeBite => {
            if let Some(id) = gs.party.random_living(rng) {
                let member = gs.party.get(id).expect("living member exists");
                let bitten = if rng.gen_bool(0.5) || member.health == Health::Poor {
                    Health::Poor
                } else {
                    Health::Fair
                };
                let name = member.name.clone();
                gs.party.get_mut(id).expect("living member exists").health = bitten;
                gs.push_message(format!(
                    "{name} was bitten by a snake and their health is now {bitten}."
                ));
            }
        }
        FixedEventKind::Theft => {
            let food = rng.gen_range(5..25);
            let rounds = rng.gen_range(5..15);
            gs.inventory.food = (gs.inventory.food - food).max(0);
            gs.inventory.ammunition = (gs.inventory.ammunition - rounds).max(0);
            gs.push_message(format!(
                "Thieves stole {food} pounds of food and {rounds} bullets."
            ));
        }
        FixedEventKind::Beneficial => match bounty {
            Some(Bounty::Food { lbs }) => {
                gs.inventory.food += lbs;
                gs.push_message(format!("Found {lbs} pounds of food!"));
            }
            Some(Bounty::Parts { count }) => match rng.gen_range(0..3) {
                0 => {
                    gs.inventory.spare_wheels += count;
                    gs.push_message("Found a spare wagon wheel!");
                }
                1 => {
                    gs.inventory.spare_axles += count;
                    gs.push_message("Found a spare wagon axle!");
                }
                _ => {
                    gs.inventory.spare_tongues += count;
                    gs.push_message("Found a spare wagon tongue!");
                }
            },
            None => {
                gs.push_message("You dealt with the situation and continued on.");
            }
        },
    }

    gs.current_event = None;
    gs.is_paused = false;
    gs.refresh_ending();
    Ok(())
}

/// Force a fixed event of a specific kind to become pending, honoring the
/// pause/event guard. Returns false when the guard suppressed it.
pub fn force_fixed_event(gs: &mut GameState, kind: FixedEventKind) -> bool {
    if gs.is_paused || gs.in_event() || gs.is_terminal() {
        return false;
    }
    let event = fixed_catalog()
        .iter()
        .find(|event| event.kind == kind)
        .unwrap_or(&fixed_catalog()[0])
        .clone();
    activate_fixed(gs, event);
    true
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
        GameState::new("Augusta", &members, 77)
    }

    #[test]
    fn trigger_is_a_no_op_while_paused_or_in_event() {
        let mut gs = fresh_state();
        let mut rng = SmallRng::seed_from_u64(1);
        gs.is_paused = true;
        let before = gs.clone();
        assert_eq!(trigger_event(&mut gs, &mut rng, None), Ok(false));
        assert_eq!(gs, before);

        gs.is_paused = false;
        assert_eq!(trigger_event(&mut gs, &mut rng, Some("snake_pit")), Ok(true));
        let pending = gs.clone();
        assert_eq!(trigger_event(&mut gs, &mut rng, None), Ok(false));
        assert_eq!(gs, pending);
    }

    #[test]
    fn unknown_event_id_is_an_error() {
        let mut gs = fresh_state();
        let mut rng = SmallRng::seed_from_u64(2);
        let result = trigger_event(&mut gs, &mut rng, Some("comet_strike"));
        assert_eq!(
            result,
            Err(EventError::UnknownEvent(String::from("comet_strike")))
        );
        assert!(!gs.in_event());
    }

    #[test]
    fn triggered_event_pauses_and_narrates() {
        let mut gs = fresh_state();
        let mut rng = SmallRng::seed_from_u64(3);
        trigger_event(&mut gs, &mut rng, Some("wild_fruit")).unwrap();
        assert!(gs.in_event());
        assert!(gs.is_paused);
        assert!(gs.messages.last().unwrap().contains("wild berries"));
    }

    #[test]
    fn resolving_a_choice_returns_to_traveling() {
        let mut gs = fresh_state();
        let mut rng = SmallRng::seed_from_u64(4);
        trigger_event(&mut gs, &mut rng, Some("wild_fruit")).unwrap();
        // Choice 1: cautious gathering, deterministic effect.
        let outcome = resolve_choice(&mut gs, &mut rng, 1).unwrap();
        assert!(outcome.contains("test"));
        assert_eq!(gs.inventory.food, 215);
        assert!(!gs.in_event());
        assert!(!gs.is_paused);
        assert!(gs.can_advance());
    }

    #[test]
    fn choice_out_of_range_is_an_error() {
        let mut gs = fresh_state();
        let mut rng = SmallRng::seed_from_u64(5);
        trigger_event(&mut gs, &mut rng, Some("wild_fruit")).unwrap();
        let result = resolve_choice(&mut gs, &mut rng, 3);
        assert!(matches!(result, Err(EventError::ChoiceOutOfRange { .. })));
        assert!(gs.in_event(), "failed resolution leaves the event pending");
    }

    #[test]
    fn resolve_choice_without_event_is_an_error() {
        let mut gs = fresh_state();
        let mut rng = SmallRng::seed_from_u64(6);
        assert_eq!(
            resolve_choice(&mut gs, &mut rng, 0),
            Err(EventError::NoActiveEvent)
        );
    }

    #[test]
    fn deferred_slot_drops_later_arrivals() {
        let mut gs = fresh_state();
        schedule_deferred(&mut gs, "thief_in_camp");
        schedule_deferred(&mut gs, "snake_pit");
        assert_eq!(gs.deferred_event.as_deref(), Some("thief_in_camp"));
    }

    #[test]
    fn deferred_event_waits_for_the_guard() {
        let mut gs = fresh_state();
        gs.is_paused = true;
        schedule_deferred(&mut gs, "thief_in_camp");
        assert!(!fire_deferred(&mut gs));
        assert!(gs.deferred_event.is_some());

        gs.is_paused = false;
        assert!(fire_deferred(&mut gs));
        assert!(gs.in_event());
        assert!(gs.deferred_event.is_none());
    }

    #[test]
    fn fixed_theft_clamps_at_zero() {
        let mut gs = fresh_state();
        gs.inventory.food = 3;
        gs.inventory.ammunition = 2;
        let mut rng = SmallRng::seed_from_u64(7);
        activate_fixed(
            &mut gs,
            fixed_catalog()
                .iter()
                .find(|e| e.kind == FixedEventKind::Theft)
                .unwrap()
                .clone(),
        );
        resolve_fixed_event(&mut gs, &mut rng).unwrap();
        assert_eq!(gs.inventory.food, 0);
        assert_eq!(gs.inventory.ammunition, 0);
        assert!(!gs.in_event());
    }

    #[test]
    fn lost_trail_never_goes_negative() {
        let mut gs = fresh_state();
        gs.miles = 4;
        let mut rng = SmallRng::seed_from_u64(8);
        activate_fixed(
            &mut gs,
            fixed_catalog()
                .iter()
                .find(|e| e.kind == FixedEventKind::LostTrail)
                .unwrap()
                .clone(),
        );
        resolve_fixed_event(&mut gs, &mut rng).unwrap();
        assert_eq!(gs.miles, 0);
    }

    #[test]
    fn broken_wheel_prefers_the_spare() {
        let mut gs = fresh_state();
        gs.inventory.spare_wheels = 1;
        let mut rng = SmallRng::seed_from_u64(9);
        activate_fixed(
            &mut gs,
            fixed_catalog()
                .iter()
                .find(|e| e.kind == FixedEventKind::BrokenWheel)
                .unwrap()
                .clone(),
        );
        resolve_fixed_event(&mut gs, &mut rng).unwrap();
        assert_eq!(gs.inventory.spare_wheels, 0);
    }

    #[test]
    fn mountain_shortcut_only_surfaces_near_the_divide() {
        let mut rng = SmallRng::seed_from_u64(10);
        for _ in 0..128 {
            let event = pick_interactive(100, &mut rng);
            assert_ne!(event.id, "mountain_shortcut");
        }
        let mut seen = false;
        for _ in 0..128 {
            if pick_interactive(1_000, &mut rng).id == "mountain_shortcut" {
                seen = true;
                break;
            }
        }
        assert!(seen, "shortcut should be eligible at mile 1000");
    }
}
