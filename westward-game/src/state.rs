//! The single mutable state aggregate for a journey.
//!
//! Every engine operation reads the current aggregate and replaces it in
//! place under the caller's exclusive borrow; there is no shared ownership
//! graph and no aliasing between transitions.
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    FOOD_LBS_PER_PERSON_PER_DAY, FULL_SPEED_OXEN_HEADS, OXEN_PER_PAIR, START_DAY, START_MONTH,
    START_YEAR, STARTING_AMMO_ROUNDS, STARTING_CLOTHING_PER_PERSON, STARTING_FOOD_LBS,
    STARTING_MONEY_CENTS, STARTING_OXEN_PAIRS, STARTING_SPARE_PARTS, TRAIL_DISTANCE_MILES,
};
use crate::data::{Bounty, FixedEventKind, Severity, StateDelta};
use crate::weather::Weather;

/// Pace at which the wagon is driven each day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaceId {
    #[default]
    Steady,
    Strenuous,
    Grueling,
}

impl PaceId {
    #[must_use]
    pub const fn travel_multiplier(self) -> f32 {
        match self {
            Self::Steady => 1.0,
            Self::Strenuous => 1.5,
            Self::Grueling => 2.0,
        }
    }

    #[must_use]
    pub const fn health_risk(self) -> f32 {
        match self {
            Self::Steady => 0.0,
            Self::Strenuous => 0.05,
            Self::Grueling => 0.15,
        }
    }

    /// Additional daily event chance from pushing the animals.
    #[must_use]
    pub const fn event_chance_bonus(self) -> f32 {
        match self {
            Self::Steady => 0.0,
            Self::Strenuous => 0.05,
            Self::Grueling => 0.1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::Strenuous => "strenuous",
            Self::Grueling => "grueling",
        }
    }
}

impl fmt::Display for PaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaceId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steady" => Ok(Self::Steady),
            "strenuous" => Ok(Self::Strenuous),
            "grueling" => Ok(Self::Grueling),
            _ => Err(()),
        }
    }
}

/// Daily ration level for the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RationsId {
    #[default]
    Filling,
    Meager,
    BareBones,
}

impl RationsId {
    #[must_use]
    pub const fn consumption_multiplier(self) -> f32 {
        match self {
            Self::Filling => 1.0,
            Self::Meager => 0.75,
            Self::BareBones => 0.5,
        }
    }

    #[must_use]
    pub const fn health_risk(self) -> f32 {
        match self {
            Self::Filling => 0.0,
            Self::Meager => 0.05,
            Self::BareBones => 0.15,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filling => "filling",
            Self::Meager => "meager",
            Self::BareBones => "bare bones",
        }
    }
}

impl fmt::Display for RationsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RationsId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filling" => Ok(Self::Filling),
            "meager" => Ok(Self::Meager),
            "bare bones" | "bare_bones" => Ok(Self::BareBones),
            _ => Err(()),
        }
    }
}

/// Health is an ordered severity scale; `Dead` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    #[default]
    Good,
    Fair,
    Poor,
    Dead,
}

impl Health {
    #[must_use]
    pub const fn is_alive(self) -> bool {
        !matches!(self, Self::Dead)
    }

    /// One severity step down (`good -> fair -> poor -> dead`).
    #[must_use]
    pub const fn worsened(self) -> Self {
        match self {
            Self::Good => Self::Fair,
            Self::Fair => Self::Poor,
            Self::Poor | Self::Dead => Self::Dead,
        }
    }

    /// One severity step up; the dead stay dead.
    #[must_use]
    pub const fn improved(self) -> Self {
        match self {
            Self::Good | Self::Fair => Self::Good,
            Self::Poor => Self::Fair,
            Self::Dead => Self::Dead,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Dead => "dead",
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier for a party member, assigned at creation and never
/// reused. Targeting always goes through the id, not the display name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MemberId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub health: Health,
    #[serde(default)]
    pub afflictions: SmallVec<[String; 2]>,
}

/// The wagon party. Members are never removed; death is recorded in place
/// so survivor counts stay meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Party {
    pub members: Vec<PartyMember>,
    pub leader: MemberId,
    next_id: u32,
}

impl Party {
    #[must_use]
    pub fn new(leader_name: &str, member_names: &[String]) -> Self {
        let mut party = Self {
            members: Vec::with_capacity(member_names.len() + 1),
            leader: MemberId(0),
            next_id: 0,
        };
        let leader = party.recruit(leader_name, Health::Good);
        party.leader = leader;
        for name in member_names {
            party.recruit(name, Health::Good);
        }
        party
    }

    /// Add a member mid-journey. This is the only way the party grows.
    pub fn recruit(&mut self, name: &str, health: Health) -> MemberId {
        let id = MemberId(self.next_id);
        self.next_id += 1;
        self.members.push(PartyMember {
            id,
            name: name.to_string(),
            health,
            afflictions: SmallVec::new(),
        });
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: MemberId) -> Option<&PartyMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MemberId) -> Option<&mut PartyMember> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    #[must_use]
    pub fn leader(&self) -> Option<&PartyMember> {
        self.get(self.leader)
    }

    pub fn living(&self) -> impl Iterator<Item = &PartyMember> {
        self.members.iter().filter(|m| m.health.is_alive())
    }

    #[must_use]
    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    #[must_use]
    pub fn healthy_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.health == Health::Good)
            .count()
    }

    #[must_use]
    pub fn all_dead(&self) -> bool {
        self.members.iter().all(|m| !m.health.is_alive())
    }

    #[must_use]
    pub fn leader_dead(&self) -> bool {
        self.leader().is_none_or(|m| !m.health.is_alive())
    }

    /// Pick a living member uniformly at random.
    pub fn random_living<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MemberId> {
        let living: Vec<MemberId> = self.living().map(|m| m.id).collect();
        if living.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..living.len());
        Some(living[index])
    }
}

/// Integer resource counts. Every mutation clamps at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Inventory {
    /// Pounds of food.
    #[serde(default)]
    pub food: i32,
    /// Rounds of ammunition.
    #[serde(default)]
    pub ammunition: i32,
    /// Sets of clothing.
    #[serde(default)]
    pub clothing: i32,
    /// Pairs of oxen.
    #[serde(default)]
    pub oxen: i32,
    #[serde(default)]
    pub spare_wheels: i32,
    #[serde(default)]
    pub spare_axles: i32,
    #[serde(default)]
    pub spare_tongues: i32,
}

impl Inventory {
    #[must_use]
    pub fn starting(party_size: usize) -> Self {
        Self {
            food: STARTING_FOOD_LBS,
            ammunition: STARTING_AMMO_ROUNDS,
            clothing: STARTING_CLOTHING_PER_PERSON * party_size as i32,
            oxen: STARTING_OXEN_PAIRS,
            spare_wheels: STARTING_SPARE_PARTS,
            spare_axles: STARTING_SPARE_PARTS,
            spare_tongues: STARTING_SPARE_PARTS,
        }
    }

    #[must_use]
    pub const fn total_spares(&self) -> i32 {
        self.spare_wheels + self.spare_axles + self.spare_tongues
    }

    /// Working oxen counted per head rather than per yoked pair.
    #[must_use]
    pub const fn oxen_heads(&self) -> i32 {
        self.oxen * OXEN_PER_PAIR
    }

    pub fn clamp_non_negative(&mut self) {
        self.food = self.food.max(0);
        self.ammunition = self.ammunition.max(0);
        self.clothing = self.clothing.max(0);
        self.oxen = self.oxen.max(0);
        self.spare_wheels = self.spare_wheels.max(0);
        self.spare_axles = self.spare_axles.max(0);
        self.spare_tongues = self.spare_tongues.max(0);
    }
}

/// The event awaiting player input, if any. At most one may be active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActiveEvent {
    Fixed {
        kind: FixedEventKind,
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<Severity>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounty: Option<Bounty>,
    },
    Interactive {
        id: String,
        title: String,
        description: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatReason {
    AllDead,
    LeaderDead,
    WinterArrived,
    NoOxen,
}

impl DefeatReason {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AllDead => "all_dead",
            Self::LeaderDead => "leader_dead",
            Self::WinterArrived => "winter_arrived",
            Self::NoOxen => "no_oxen",
        }
    }

    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::AllDead => "All party members have died.",
            Self::LeaderDead => "The wagon leader has died.",
            Self::WinterArrived => "Winter has arrived before reaching Oregon.",
            Self::NoOxen => "You have no oxen left to pull your wagon.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Ending {
    Victory,
    Defeat { reason: DefeatReason },
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub seed: u64,
    pub date: NaiveDateTime,
    pub miles: i32,
    /// Cash on hand in cents, to keep price math exact.
    pub money_cents: i64,
    pub inventory: Inventory,
    pub weather: Weather,
    #[serde(default)]
    pub pace: PaceId,
    #[serde(default)]
    pub rations: RationsId,
    pub party: Party,
    /// Append-only narrative log; the UI shows the most recent lines.
    pub messages: Vec<String>,
    #[serde(default)]
    pub current_event: Option<ActiveEvent>,
    /// Single-slot queue for an interactive event scheduled by a camp
    /// activity. A second deferral while the slot is full is dropped.
    #[serde(default)]
    pub deferred_event: Option<String>,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub ending: Option<Ending>,
}

impl GameState {
    /// Build the starting state for a fresh journey.
    #[must_use]
    pub fn new(leader_name: &str, member_names: &[String], seed: u64) -> Self {
        let party = Party::new(leader_name, member_names);
        let inventory = Inventory::starting(party.len());
        Self {
            seed,
            date: start_date(),
            miles: 0,
            money_cents: STARTING_MONEY_CENTS,
            inventory,
            weather: Weather::Good,
            pace: PaceId::Steady,
            rations: RationsId::Filling,
            party,
            messages: vec![String::from("Welcome to the trail! Your journey begins.")],
            current_event: None,
            deferred_event: None,
            is_paused: false,
            ending: None,
        }
    }

    #[must_use]
    pub const fn in_event(&self) -> bool {
        self.current_event.is_some()
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.ending.is_some()
    }

    /// Whether the daily loop may tick. Auto-travel timers must check this
    /// before every invocation.
    #[must_use]
    pub const fn can_advance(&self) -> bool {
        !self.is_paused && !self.in_event() && !self.is_terminal()
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// One-based day number, counting the departure day as day one.
    /// Fractional-day adjustments round up to the day they spill into.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        let elapsed = self.date - start_date();
        let days = elapsed.num_seconds() as f64 / 86_400.0;
        days.ceil() as i64 + 1
    }

    /// Pounds of food the living party eats in one day.
    #[must_use]
    pub fn daily_food_consumption(&self) -> i32 {
        let living = self.party.living_count() as f32;
        (living * FOOD_LBS_PER_PERSON_PER_DAY as f32 * self.rations.consumption_multiplier())
            .floor() as i32
    }

    /// Miles gained by one day of travel under current conditions.
    #[must_use]
    pub fn daily_miles(&self) -> i32 {
        if self.party.is_empty() {
            return 0;
        }
        let health_fraction = self.party.healthy_count() as f32 / self.party.len() as f32;
        let oxen_factor =
            (self.inventory.oxen_heads() as f32 / FULL_SPEED_OXEN_HEADS).min(1.0);
        (crate::constants::BASE_MILES_PER_DAY
            * self.pace.travel_multiplier()
            * self.weather.travel_multiplier()
            * health_fraction
            * oxen_factor)
            .floor() as i32
    }

    /// Evaluate the terminal conditions. Victory is checked before any
    /// defeat reason on the same state.
    #[must_use]
    pub fn check_terminal(&self) -> Option<Ending> {
        if self.miles >= TRAIL_DISTANCE_MILES {
            return Some(Ending::Victory);
        }
        if self.party.all_dead() {
            return Some(Ending::Defeat {
                reason: DefeatReason::AllDead,
            });
        }
        if self.party.leader_dead() {
            return Some(Ending::Defeat {
                reason: DefeatReason::LeaderDead,
            });
        }
        if self.date.date() >= winter_deadline() {
            return Some(Ending::Defeat {
                reason: DefeatReason::WinterArrived,
            });
        }
        if self.inventory.oxen < 1 {
            return Some(Ending::Defeat {
                reason: DefeatReason::NoOxen,
            });
        }
        None
    }

    /// Re-evaluate and cache the terminal state. Once set, the ending is
    /// never cleared.
    pub fn refresh_ending(&mut self) -> Option<Ending> {
        if self.ending.is_none()
            && let Some(ending) = self.check_terminal()
        {
            self.ending = Some(ending);
            match ending {
                Ending::Victory => self.push_message("You have reached Oregon!"),
                Ending::Defeat { reason } => self.push_message(reason.describe()),
            }
        }
        self.ending
    }

    /// Apply a partial-state delta from an event effect, clamping every
    /// resource at zero. The dead are never revived.
    pub fn apply_delta(&mut self, delta: StateDelta) {
        self.inventory.food += delta.food;
        self.inventory.ammunition += delta.ammunition;
        self.inventory.clothing += delta.clothing;
        self.inventory.oxen += delta.oxen;
        self.inventory.spare_wheels += delta.spare_wheels;
        self.inventory.spare_axles += delta.spare_axles;
        self.inventory.spare_tongues += delta.spare_tongues;
        self.inventory.clamp_non_negative();
        self.money_cents = (self.money_cents + delta.money_cents).max(0);
        self.miles = (self.miles + delta.miles).max(0);
        if delta.advance_hours != 0 {
            self.date += Duration::hours(delta.advance_hours);
        }
        for (id, health) in delta.health {
            if let Some(member) = self.party.get_mut(id)
                && member.health.is_alive()
            {
                member.health = health;
            }
        }
        if let Some((name, health)) = delta.recruit {
            self.party.recruit(&name, health);
        }
        for message in delta.messages {
            self.push_message(message);
        }
    }

    /// Dollars-and-cents display form of the cash on hand.
    #[must_use]
    pub fn money_display(&self) -> String {
        format_money_cents(self.money_cents)
    }
}

/// The fixed departure date: April 1, 1848.
#[must_use]
pub fn start_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(START_YEAR, START_MONTH, START_DAY)
        .expect("valid start date")
        .and_hms_opt(0, 0, 0)
        .expect("valid midnight")
}

/// First calendar day on which winter ends the journey.
#[must_use]
pub fn winter_deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(START_YEAR, 12, 1).expect("valid deadline date")
}

/// Format a cent amount as `$d.cc`.
#[must_use]
pub fn format_money_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn fresh_state() -> GameState {
        GameState::new("Augusta", &names(&["Silas", "Mercy", "Tobias", "June"]), 11)
    }

    #[test]
    fn initialize_sets_starting_conditions() {
        let gs = fresh_state();
        assert_eq!(gs.party.len(), 5);
        assert_eq!(gs.party.living_count(), 5);
        assert_eq!(gs.money_cents, 90_000);
        assert_eq!(gs.inventory.food, 200);
        assert_eq!(gs.inventory.oxen, 2);
        assert_eq!(gs.inventory.clothing, 10);
        assert_eq!(gs.inventory.ammunition, 20);
        assert_eq!(gs.inventory.total_spares(), 0);
        assert_eq!(gs.date, start_date());
        assert_eq!(gs.weather, Weather::Good);
        assert_eq!(gs.day_count(), 1);
        assert!(gs.can_advance());
    }

    #[test]
    fn member_ids_are_stable_under_duplicate_names() {
        let mut gs = GameState::new("Jed", &names(&["Jed", "Jed"]), 0);
        let ids: Vec<MemberId> = gs.party.members.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] != w[1]));
        let target = ids[2];
        gs.party.get_mut(target).unwrap().health = Health::Poor;
        assert_eq!(gs.party.get(ids[1]).unwrap().health, Health::Good);
        assert_eq!(gs.party.get(target).unwrap().health, Health::Poor);
    }

    #[test]
    fn health_steps_are_bounded() {
        assert_eq!(Health::Good.worsened(), Health::Fair);
        assert_eq!(Health::Poor.worsened(), Health::Dead);
        assert_eq!(Health::Dead.worsened(), Health::Dead);
        assert_eq!(Health::Fair.improved(), Health::Good);
        assert_eq!(Health::Dead.improved(), Health::Dead);
    }

    #[test]
    fn daily_consumption_follows_rations() {
        let mut gs = fresh_state();
        assert_eq!(gs.daily_food_consumption(), 10);
        gs.rations = RationsId::Meager;
        assert_eq!(gs.daily_food_consumption(), 7);
        gs.rations = RationsId::BareBones;
        assert_eq!(gs.daily_food_consumption(), 5);
        gs.party.members[4].health = Health::Dead;
        assert_eq!(gs.daily_food_consumption(), 4);
    }

    #[test]
    fn two_pairs_of_oxen_pull_at_full_speed() {
        let gs = fresh_state();
        assert_eq!(gs.daily_miles(), 20);
    }

    #[test]
    fn one_pair_of_oxen_slows_the_wagon() {
        let mut gs = fresh_state();
        gs.inventory.oxen = 1;
        assert_eq!(gs.daily_miles(), 13);
    }

    #[test]
    fn victory_is_checked_before_defeat() {
        let mut gs = fresh_state();
        gs.miles = TRAIL_DISTANCE_MILES;
        for member in &mut gs.party.members {
            member.health = Health::Dead;
        }
        assert_eq!(gs.check_terminal(), Some(Ending::Victory));
    }

    #[test]
    fn leader_death_defeats_regardless_of_supplies() {
        let mut gs = fresh_state();
        let leader = gs.party.leader;
        gs.party.get_mut(leader).unwrap().health = Health::Dead;
        assert_eq!(
            gs.check_terminal(),
            Some(Ending::Defeat {
                reason: DefeatReason::LeaderDead
            })
        );
    }

    #[test]
    fn december_first_ends_the_run() {
        let mut gs = fresh_state();
        gs.date = NaiveDate::from_ymd_opt(1848, 12, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        assert_eq!(
            gs.check_terminal(),
            Some(Ending::Defeat {
                reason: DefeatReason::WinterArrived
            })
        );
    }

    #[test]
    fn delta_clamps_resources_and_never_revives() {
        let mut gs = fresh_state();
        let victim = gs.party.members[1].id;
        gs.party.get_mut(victim).unwrap().health = Health::Dead;
        let mut delta = StateDelta::default();
        delta.food = -10_000;
        delta.money_cents = -1_000_000;
        delta.health.push((victim, Health::Good));
        gs.apply_delta(delta);
        assert_eq!(gs.inventory.food, 0);
        assert_eq!(gs.money_cents, 0);
        assert_eq!(gs.party.get(victim).unwrap().health, Health::Dead);
    }

    #[test]
    fn snapshot_round_trips_all_fields() {
        let mut gs = fresh_state();
        gs.miles = 412;
        gs.weather = Weather::Poor;
        gs.party.members[2].health = Health::Dead;
        gs.deferred_event = Some(String::from("thief_in_camp"));
        gs.push_message("A hard day.");
        let json = serde_json::to_string(&gs).unwrap();
        assert!(json.contains("1848-04-01"), "dates serialize as ISO-8601");
        let loaded: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, gs);
        assert_eq!(loaded.party.members[2].health, Health::Dead);
    }

    #[test]
    fn money_formats_as_dollars() {
        assert_eq!(format_money_cents(90_000), "$900.00");
        assert_eq!(format_money_cents(505), "$5.05");
        assert_eq!(format_money_cents(0), "$0.00");
    }
}
