//! A running journey: the state aggregate, its RNG streams, and configs
//! behind the narrow surface the presentation layer drives.
//!
//! Every mutator runs to completion before the next may begin (the session
//! requires `&mut self`), and each one re-checks the guards, so imprecise
//! caller sequencing degrades to no-ops rather than corruption. Once a
//! terminal state is reached, no further transitions are accepted.
use std::rc::Rc;

use crate::camp::{self, CampActivity, CampOutcome};
use crate::crossings::{self, CrossingOutcome, CrossingStrategy, RiverConditions};
use crate::events::{self, EventError};
use crate::hunt::{self, HuntAnimal, HuntSettlement, QuickHuntOutcome};
use crate::journey::{self, DayConfig, DayOutcome, RngBundle};
use crate::result::{ResultConfig, ResultSummary, result_summary};
use crate::state::{Ending, GameState, PaceId, RationsId};
use crate::store::{self, PriceTable, PurchaseOrder, StoreOutcome};

pub struct Simulation {
    state: GameState,
    cfg: DayConfig,
    prices: PriceTable,
    rng: Rc<RngBundle>,
}

impl Simulation {
    /// Start a fresh journey: leader plus companions, all in good health,
    /// with the standard outfitting.
    #[must_use]
    pub fn new(leader_name: &str, member_names: &[String], seed: u64) -> Self {
        Self::with_config(
            GameState::new(leader_name, member_names, seed),
            DayConfig::default_config(),
        )
    }

    /// Resume a journey from a loaded snapshot; the RNG streams are rebuilt
    /// from the persisted seed.
    #[must_use]
    pub fn resume(state: GameState) -> Self {
        Self::with_config(state, DayConfig::default_config())
    }

    #[must_use]
    pub fn with_config(state: GameState, cfg: DayConfig) -> Self {
        let rng = Rc::new(RngBundle::from_user_seed(state.seed));
        Self {
            state,
            cfg,
            prices: PriceTable::default_config(),
            rng,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Mutate the state directly. Test and tooling escape hatch.
    pub fn with_state_mut<T>(&mut self, f: impl FnOnce(&mut GameState) -> T) -> T {
        f(&mut self.state)
    }

    #[must_use]
    pub fn rng_bundle(&self) -> Rc<RngBundle> {
        Rc::clone(&self.rng)
    }

    /// Guard the auto-travel timer checks before every tick.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.state.can_advance()
    }

    #[must_use]
    pub fn ending(&self) -> Option<Ending> {
        self.state.ending
    }

    /// Evaluate the terminal conditions against the current state.
    #[must_use]
    pub fn check_terminal(&self) -> Option<Ending> {
        self.state.check_terminal()
    }

    fn accepting_transitions(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn set_pace(&mut self, pace: PaceId) {
        self.state.pace = pace;
    }

    pub fn set_rations(&mut self, rations: RationsId) {
        self.state.rations = rations;
    }

    /// Suspend the daily loop while a non-travel screen is up.
    pub fn pause(&mut self) {
        self.state.is_paused = true;
    }

    pub fn unpause(&mut self) {
        self.state.is_paused = false;
    }

    /// Advance one day. A no-op while paused, mid-event, or after the end.
    pub fn advance_day(&mut self) -> DayOutcome {
        journey::advance_day(&mut self.state, &self.cfg, &self.rng)
    }

    /// Resolve the active interactive event with the given choice index.
    ///
    /// # Errors
    ///
    /// See [`events::resolve_choice`]. After a terminal state this always
    /// reports no active event.
    pub fn resolve_choice(&mut self, choice_index: usize) -> Result<&'static str, EventError> {
        if !self.accepting_transitions() {
            return Err(EventError::NoActiveEvent);
        }
        events::resolve_choice(&mut self.state, &mut *self.rng.events(), choice_index)
    }

    /// Resolve the active fixed event.
    ///
    /// # Errors
    ///
    /// See [`events::resolve_fixed_event`].
    pub fn resolve_fixed_event(&mut self) -> Result<(), EventError> {
        if !self.accepting_transitions() {
            return Err(EventError::NoActiveEvent);
        }
        events::resolve_fixed_event(&mut self.state, &mut *self.rng.events())
    }

    /// Force a specific or random interactive event, honoring the guard.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnknownEvent`] for an id not in the catalog.
    pub fn trigger_event(&mut self, event_id: Option<&str>) -> Result<bool, EventError> {
        events::trigger_event(&mut self.state, &mut *self.rng.events(), event_id)
    }

    /// Buy from the fort store. `None` once the run is over.
    pub fn purchase(&mut self, order: &PurchaseOrder) -> Option<StoreOutcome> {
        if !self.accepting_transitions() {
            return None;
        }
        Some(store::purchase(&mut self.state, order, &self.prices))
    }

    /// Survey the river at the current crossing and pause for the choice.
    pub fn survey_river(&mut self) -> Option<RiverConditions> {
        if !self.accepting_transitions() {
            return None;
        }
        self.state.is_paused = true;
        Some(RiverConditions::survey(&mut *self.rng.crossing()))
    }

    /// Commit to a crossing strategy for the surveyed river.
    pub fn cross_river(
        &mut self,
        strategy: CrossingStrategy,
        river: &RiverConditions,
    ) -> Option<CrossingOutcome> {
        if !self.accepting_transitions() {
            return None;
        }
        Some(crossings::cross_river(
            &mut self.state,
            strategy,
            river,
            &mut *self.rng.crossing(),
        ))
    }

    /// Make camp; pauses the daily loop.
    pub fn enter_camp(&mut self) {
        if self.accepting_transitions() {
            camp::enter_camp(&mut self.state);
        }
    }

    /// Run a camp activity. `None` once the run is over.
    pub fn camp_activity(&mut self, activity: CampActivity) -> Option<CampOutcome> {
        if !self.accepting_transitions() {
            return None;
        }
        Some(camp::camp_activity(
            &mut self.state,
            activity,
            &mut *self.rng.camp(),
        ))
    }

    /// Turn in without activities; a night visitor may be queued.
    pub fn night_event_roll(&mut self) {
        if self.accepting_transitions() {
            camp::night_event_roll(&mut self.state, &mut *self.rng.camp());
        }
    }

    /// Morning after camp: eat, advance the calendar, resume travel.
    pub fn break_camp(&mut self) {
        if self.accepting_transitions() {
            camp::break_camp(&mut self.state);
        }
    }

    /// Book the minigame tally: ammunition down, food up.
    pub fn settle_hunt(
        &mut self,
        shots_fired: i32,
        animals_hit: &[HuntAnimal],
    ) -> Option<HuntSettlement> {
        if !self.accepting_transitions() {
            return None;
        }
        Some(hunt::settle_hunt(&mut self.state, shots_fired, animals_hit))
    }

    /// One-roll hunt from the travel screen.
    pub fn quick_hunt(&mut self) -> Option<QuickHuntOutcome> {
        if !self.accepting_transitions() {
            return None;
        }
        Some(hunt::quick_hunt(&mut self.state, &mut *self.rng.hunt()))
    }

    /// Final tally for the result screen.
    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        result_summary(&self.state, &ResultConfig::default_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Health;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn session() -> Simulation {
        Simulation::new("Augusta", &names(&["Silas", "Mercy", "Tobias", "June"]), 71)
    }

    #[test]
    fn same_seed_replays_the_same_journey() {
        let mut a = session();
        let mut b = session();
        for _ in 0..30 {
            a.advance_day();
            b.advance_day();
            if a.state().in_event() {
                let _ = a.resolve_fixed_event().or_else(|_| {
                    a.resolve_choice(0).map(|_| ())
                });
                let _ = b.resolve_fixed_event().or_else(|_| {
                    b.resolve_choice(0).map(|_| ())
                });
            }
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn transitions_stop_after_the_end() {
        let mut sim = session();
        sim.with_state_mut(|gs| {
            let leader = gs.party.leader;
            gs.party.get_mut(leader).unwrap().health = Health::Dead;
            gs.refresh_ending();
        });
        assert!(sim.ending().is_some());
        assert!(sim.purchase(&PurchaseOrder::default()).is_none());
        assert!(sim.survey_river().is_none());
        assert!(sim.quick_hunt().is_none());
        assert!(sim.camp_activity(CampActivity::Rest).is_none());
        assert!(!sim.advance_day().advanced);
        assert_eq!(sim.trigger_event(None), Ok(false));
    }

    #[test]
    fn pause_suppresses_the_daily_loop() {
        let mut sim = session();
        sim.pause();
        assert!(!sim.can_advance());
        assert!(!sim.advance_day().advanced);
        sim.unpause();
        assert!(sim.advance_day().advanced);
    }

    #[test]
    fn river_survey_pauses_until_crossed() {
        let mut sim = session();
        let river = sim.survey_river().unwrap();
        assert!(!sim.can_advance());
        // Waiting always crosses in the end.
        let outcome = sim.cross_river(CrossingStrategy::Wait, &river).unwrap();
        assert!(matches!(outcome, CrossingOutcome::Waited { .. }));
        assert!(sim.can_advance());
    }
}
