//! Immutable event catalogs: fixed hazard/benefit events and interactive
//! multi-choice events.
//!
//! Choice effects are capture-free function pointers evaluated strictly
//! against the snapshot they are handed, so resolution stays deterministic
//! under a seeded RNG stream.
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::state::{GameState, Health, MemberId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Reward carried by a beneficial fixed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bounty {
    Food { lbs: i32 },
    Parts { count: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedEventKind {
    Illness,
    BrokenWheel,
    BrokenAxle,
    BrokenTongue,
    BadWater,
    LostTrail,
    HeavyFog,
    SnakeBite,
    Theft,
    Beneficial,
}

/// A fixed hazard or benefit event, acknowledged with a single choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedEvent {
    pub kind: FixedEventKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounty: Option<Bounty>,
}

impl FixedEvent {
    fn new(kind: FixedEventKind, description: &str, severity: Severity) -> Self {
        Self {
            kind,
            description: description.to_string(),
            severity: Some(severity),
            bounty: None,
        }
    }

    fn beneficial(description: &str, bounty: Bounty) -> Self {
        Self {
            kind: FixedEventKind::Beneficial,
            description: description.to_string(),
            severity: None,
            bounty: Some(bounty),
        }
    }
}

/// The fixed-event table. Selection draws uniformly over these entries.
pub fn fixed_catalog() -> &'static [FixedEvent] {
    static CATALOG: OnceLock<Vec<FixedEvent>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            FixedEvent::new(
                FixedEventKind::Illness,
                "Someone in your party has fallen ill",
                Severity::Medium,
            ),
            FixedEvent::new(
                FixedEventKind::BrokenWheel,
                "A wagon wheel has broken",
                Severity::Medium,
            ),
            FixedEvent::new(
                FixedEventKind::BrokenAxle,
                "A wagon axle has broken",
                Severity::High,
            ),
            FixedEvent::new(
                FixedEventKind::BrokenTongue,
                "A wagon tongue has broken",
                Severity::Medium,
            ),
            FixedEvent::new(FixedEventKind::BadWater, "You drank bad water", Severity::Low),
            FixedEvent::new(
                FixedEventKind::LostTrail,
                "You've lost the trail",
                Severity::Medium,
            ),
            FixedEvent::new(
                FixedEventKind::HeavyFog,
                "Heavy fog has slowed your travel",
                Severity::Low,
            ),
            FixedEvent::new(
                FixedEventKind::SnakeBite,
                "Someone has been bitten by a snake",
                Severity::High,
            ),
            FixedEvent::new(
                FixedEventKind::Theft,
                "Thieves have stolen some of your supplies",
                Severity::Medium,
            ),
            FixedEvent::beneficial("Found wild berries", Bounty::Food { lbs: 10 }),
            FixedEvent::beneficial("Found an abandoned wagon", Bounty::Parts { count: 1 }),
        ]
    })
}

/// Partial-state delta produced by a choice effect. Applied atomically by
/// [`GameState::apply_delta`], which clamps every resource at zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    pub food: i32,
    pub ammunition: i32,
    pub clothing: i32,
    pub oxen: i32,
    pub spare_wheels: i32,
    pub spare_axles: i32,
    pub spare_tongues: i32,
    pub money_cents: i64,
    pub miles: i32,
    /// Calendar adjustment; whole days are multiples of 24.
    pub advance_hours: i64,
    /// New health values for targeted members.
    pub health: Vec<(MemberId, Health)>,
    /// One of the two designated party-growth branches.
    pub recruit: Option<(String, Health)>,
    pub messages: Vec<String>,
}

impl StateDelta {
    fn message(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
            ..Self::default()
        }
    }
}

/// Effect of a selected choice: a pure function of the pre-choice snapshot
/// and the event RNG stream. No captured state.
pub type ChoiceEffect = fn(&GameState, &mut dyn RngCore) -> StateDelta;

pub struct EventChoice {
    pub text: &'static str,
    pub outcome: &'static str,
    pub effect: ChoiceEffect,
}

pub struct InteractiveEvent {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Mile range in which random selection may surface this event.
    /// `None` means anywhere on the trail. By-id lookup ignores this.
    pub mile_window: Option<(i32, i32)>,
    pub choices: &'static [EventChoice],
}

pub const FIRST_NAMES: [&str; 16] = [
    "John", "Mary", "William", "Sarah", "James", "Elizabeth", "George", "Martha", "Thomas",
    "Catherine", "Joseph", "Margaret", "Charles", "Anna", "Henry", "Jane",
];

pub const LAST_NAMES: [&str; 16] = [
    "Smith", "Jones", "Williams", "Brown", "Davis", "Miller", "Wilson", "Moore", "Taylor",
    "Anderson", "Thomas", "Jackson", "White", "Harris", "Clark", "Lewis",
];

/// Draw a plausible settler name for rescued survivors and fort traders.
pub fn random_settler_name(rng: &mut dyn RngCore) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{first} {last}")
}

// Effect helpers -----------------------------------------------------------

fn degrade_living(gs: &GameState, delta: &mut StateDelta, rng: &mut dyn RngCore, chance: f64) {
    for member in gs.party.living() {
        match member.health {
            Health::Good if rng.gen_bool(chance) => {
                delta.health.push((member.id, Health::Fair));
            }
            Health::Fair if rng.gen_bool(chance) => {
                delta.health.push((member.id, Health::Poor));
            }
            _ => {}
        }
    }
}

// broken_wagon -------------------------------------------------------------

fn broken_wagon_field_repair(gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta {
        advance_hours: 24,
        ..StateDelta::default()
    };
    if gs.inventory.spare_wheels > 0 && gs.inventory.spare_axles > 0 {
        delta.spare_wheels = -1;
        delta.spare_axles = -1;
    } else {
        delta.messages.push(String::from(
            "You don't have the necessary spare parts. Your makeshift repairs will slow down your journey.",
        ));
    }
    delta
}

fn broken_wagon_push_on(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta::default();
    degrade_living(gs, &mut delta, rng, 0.3);
    // The team never drops below one pair.
    delta.oxen = (gs.inventory.oxen - 1).max(1) - gs.inventory.oxen;
    delta
}

fn broken_wagon_group_push(gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    let healthy = gs.party.healthy_count() as f32;
    let days = (5.0 - healthy * 0.5).ceil().max(3.0) as i64;
    let mut delta = StateDelta {
        advance_hours: days * 24,
        miles: 30,
        food: -(gs.party.len() as i32 * days as i32),
        ..StateDelta::default()
    };
    for member in gs.party.living() {
        match member.health {
            Health::Good => delta.health.push((member.id, Health::Fair)),
            Health::Fair => delta.health.push((member.id, Health::Poor)),
            _ => {}
        }
    }
    delta
}

// native_encounter ---------------------------------------------------------

fn native_trade(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta {
        clothing: -2,
        ammunition: -10,
        food: 50,
        ..StateDelta::default()
    };
    delta.messages.push(String::from(
        "The Native Americans showed you a shortcut that will save you some travel time.",
    ));
    delta
}

fn native_keep_distance(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta::message("You continue on the established trail.")
}

fn native_share_supplies(_gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta {
        food: -20,
        ..StateDelta::default()
    };
    if rng.gen_bool(0.33) {
        delta.spare_wheels = 1;
    }
    if rng.gen_bool(0.33) && rng.gen_bool(0.67) {
        delta.spare_axles = 1;
    }
    if rng.gen_bool(0.34) {
        delta.spare_tongues = 1;
    }
    delta.messages.push(String::from(
        "You've learned valuable hunting techniques that will help you in the future.",
    ));
    delta
}

// wild_fruit ---------------------------------------------------------------

fn wild_fruit_gather(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta::default();
    if rng.gen_bool(0.2) {
        delta.food = 20;
        if let Some(id) = gs.party.random_living(rng) {
            delta.health.push((id, Health::Poor));
        }
        delta.messages.push(String::from(
            "Some of the fruit wasn't safe to eat. One of your party members has fallen ill.",
        ));
    } else {
        delta.food = 30;
    }
    delta
}

fn wild_fruit_sample(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta {
        food: 15,
        advance_hours: 12,
        ..StateDelta::default()
    }
}

fn wild_fruit_ignore(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta::default()
}

// river_crossing_ice -------------------------------------------------------

fn ice_attempt_crossing(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta::default();
    if rng.gen_bool(0.4) {
        delta.food = -((gs.inventory.food as f32 * 0.3).floor() as i32);
        delta.ammunition = -((gs.inventory.ammunition as f32 * 0.3).floor() as i32);
        if let Some(id) = gs.party.random_living(rng) {
            let fate = if rng.gen_bool(0.3) { Health::Dead } else { Health::Poor };
            delta.health.push((id, fate));
        }
        delta.messages.push(String::from(
            "The ice cracked! Your wagon partially fell through, and you lost supplies. There were injuries in your party.",
        ));
    } else {
        delta.messages.push(String::from(
            "You successfully crossed the frozen river, saving valuable time on your journey.",
        ));
    }
    delta
}

fn ice_search_crossing(gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta {
        advance_hours: 48,
        food: -(gs.party.len() as i32 * 2 * 2),
        messages: vec![String::from(
            "After two days, you found a safer place to cross the river.",
        )],
        ..StateDelta::default()
    }
}

fn ice_long_way_around(gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta {
        advance_hours: 120,
        food: -(gs.party.len() as i32 * 2 * 5),
        messages: vec![String::from(
            "The detour took 5 days, but you avoided the dangerous river crossing.",
        )],
        ..StateDelta::default()
    }
}

// abandoned_wagon ----------------------------------------------------------

fn abandoned_search_supplies(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta::default();
    let mut found = Vec::new();
    if rng.gen_bool(0.6) {
        let lbs = rng.gen_range(10..40);
        delta.food = lbs;
        found.push(format!("{lbs} pounds of food"));
    }
    if rng.gen_bool(0.4) {
        match rng.gen_range(0..3) {
            0 => {
                delta.spare_wheels = 1;
                found.push(String::from("a spare wheel"));
            }
            1 => {
                delta.spare_axles = 1;
                found.push(String::from("a spare axle"));
            }
            _ => {
                delta.spare_tongues = 1;
                found.push(String::from("a spare tongue"));
            }
        }
    }
    if rng.gen_bool(0.3) {
        let rounds = rng.gen_range(5..25);
        delta.ammunition = rounds;
        found.push(format!("{rounds} bullets"));
    }
    if rng.gen_bool(0.2) {
        let dollars = rng.gen_range(5..20);
        delta.money_cents = i64::from(dollars) * 100;
        found.push(format!("${dollars}"));
    }
    if found.is_empty() {
        delta
            .messages
            .push(String::from("You found nothing useful in the wagon."));
    } else {
        delta.messages.push(format!("You found {}.", found.join(", ")));
    }
    if rng.gen_bool(0.15) {
        if let Some(id) = gs.party.random_living(rng) {
            delta.health.push((id, Health::Poor));
        }
        delta.messages.push(String::from(
            "Unfortunately, someone in your party got sick after rummaging through the abandoned items.",
        ));
    }
    delta
}

fn abandoned_look_for_survivors(_gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta::default();
    if rng.gen_bool(0.2) {
        let name = random_settler_name(rng);
        delta.messages.push(format!(
            "You found a survivor named {name} hiding nearby. They've joined your party."
        ));
        delta.recruit = Some((name, Health::Fair));
    } else {
        delta.messages.push(String::from(
            "You searched the area but found no survivors. Whatever happened here, the people are long gone.",
        ));
    }
    delta
}

fn abandoned_move_on(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta::message("You pass by the abandoned wagon and continue on your way.")
}

// hunting_party ------------------------------------------------------------

fn hunting_party_join(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    if gs.inventory.ammunition < 10 {
        return StateDelta::message(
            "You don't have enough ammunition to join the hunting party.",
        );
    }
    let mut delta = StateDelta {
        ammunition: -10,
        advance_hours: 24,
        ..StateDelta::default()
    };
    let roll: f32 = rng.r#gen();
    if roll < 0.2 {
        delta.food = 10;
        delta.messages.push(String::from(
            "The hunting was poor. You only got a small amount of food.",
        ));
    } else if roll < 0.7 {
        delta.food = 40;
        delta.messages.push(String::from(
            "The hunting was decent. You acquired a good amount of food.",
        ));
    } else {
        delta.food = 100;
        delta.messages.push(String::from(
            "The hunting was excellent! You brought back a large amount of food.",
        ));
    }
    delta
}

fn hunting_party_decline(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta::default()
}

fn hunting_party_trade(gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    if gs.inventory.clothing > 1 {
        StateDelta {
            clothing: -1,
            food: 20,
            messages: vec![String::from(
                "You traded 1 set of clothing for 20 pounds of food from the hunting party.",
            )],
            ..StateDelta::default()
        }
    } else if gs.money_cents >= 500 {
        StateDelta {
            money_cents: -500,
            food: 25,
            messages: vec![String::from(
                "You traded $5 for 25 pounds of food from the hunting party.",
            )],
            ..StateDelta::default()
        }
    } else {
        StateDelta::message("You don't have enough trading goods to get a share of the hunt.")
    }
}

// thief_in_camp ------------------------------------------------------------

fn thief_confront(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    if gs.inventory.ammunition <= 0 {
        let food = rng.gen_range(10..30);
        let dollars = rng.gen_range(5..15);
        return StateDelta {
            food: -food,
            money_cents: -i64::from(dollars) * 100,
            messages: vec![String::from(
                "Your gun is unloaded! The thief realizes this and still manages to steal some supplies before escaping.",
            )],
            ..StateDelta::default()
        };
    }
    StateDelta {
        ammunition: -1,
        messages: vec![String::from(
            "You fire a warning shot and the thief runs away without taking anything.",
        )],
        ..StateDelta::default()
    }
}

fn thief_raise_alarm(_gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    if rng.gen_bool(0.5) {
        let food = rng.gen_range(5..20);
        StateDelta {
            food: -food,
            messages: vec![format!(
                "The thief manages to escape with {food} pounds of food despite your attempt to raise the alarm."
            )],
            ..StateDelta::default()
        }
    } else {
        StateDelta::message(
            "Your shouting frightens the thief, who runs away without taking anything.",
        )
    }
}

fn thief_stay_quiet(_gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    if rng.gen_bool(0.7) {
        let food = rng.gen_range(20..50);
        let rounds = rng.gen_range(10..30);
        let dollars = rng.gen_range(5..20);
        StateDelta {
            food: -food,
            ammunition: -rounds,
            money_cents: -i64::from(dollars) * 100,
            messages: vec![format!(
                "The thief takes their time and steals {food} pounds of food, {rounds} bullets, and ${dollars} before leaving."
            )],
            ..StateDelta::default()
        }
    } else {
        StateDelta::message(
            "After rummaging around for a while, the thief leaves without taking anything valuable.",
        )
    }
}

// lost_child ---------------------------------------------------------------

fn lost_child_search(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let days = rng.gen_range(1..=2);
    let mut delta = StateDelta {
        advance_hours: i64::from(days) * 24,
        food: -(gs.party.len() as i32 * 2 * days + 2),
        ..StateDelta::default()
    };
    if rng.gen_bool(0.7) {
        delta.money_cents = 1_500;
        delta.messages.push(format!(
            "After {days} days of searching, you find the child's family. They are extremely grateful and insist on giving you a gift."
        ));
    } else {
        let name = if rng.gen_bool(0.5) { "Boy" } else { "Girl" };
        delta.messages.push(format!(
            "After {days} days of searching, you cannot find the child's family. With no alternative, the child joins your party."
        ));
        delta.recruit = Some((name.to_string(), Health::Good));
    }
    delta
}

fn lost_child_give_food(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta {
        food: -5,
        messages: vec![String::from(
            "You give the child 5 pounds of food and directions to the nearest settlement. You hope they'll be alright.",
        )],
        ..StateDelta::default()
    }
}

fn lost_child_ignore(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta::message(
        "The child eventually wanders away. That night, the mood in your camp is somber.",
    );
    if let Some(id) = gs.party.random_living(rng)
        && gs.party.get(id).is_some_and(|m| m.health == Health::Good)
    {
        delta.health.push((id, Health::Fair));
    }
    delta
}

// snake_pit ----------------------------------------------------------------

fn snake_pit_hunt(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta::default();
    if gs.inventory.ammunition < 5 {
        if let Some(id) = gs.party.random_living(rng) {
            let member = gs.party.get(id).expect("living member exists");
            let fate = if member.health == Health::Good {
                Health::Poor
            } else {
                Health::Dead
            };
            delta.messages.push(format!(
                "Without enough ammunition, you try to kill the snakes with sticks. {} gets bitten multiple times and is now {}.",
                member.name, fate
            ));
            delta.health.push((id, fate));
        } else {
            delta.messages.push(String::from(
                "Without enough ammunition, you wisely decide to leave the snakes alone.",
            ));
        }
        return delta;
    }
    delta.ammunition = -5;
    if rng.gen_bool(0.6) {
        delta.food = 10;
        delta.messages.push(String::from(
            "You successfully kill several snakes and prepare them for eating, adding 10 pounds of meat to your supplies.",
        ));
    } else {
        delta.food = 5;
        if let Some(id) = gs.party.random_living(rng) {
            let name = gs.party.get(id).map_or_else(String::new, |m| m.name.clone());
            delta.health.push((id, Health::Poor));
            delta.messages.push(format!(
                "You kill a few snakes but {name} gets bitten in the process and is now in poor health. You add 5 pounds of meat to your supplies."
            ));
        } else {
            delta.messages.push(String::from(
                "You kill a few snakes and add 5 pounds of meat to your supplies.",
            ));
        }
    }
    delta
}

fn snake_pit_back_away(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta {
        advance_hours: 3,
        messages: vec![String::from(
            "You safely avoid the snakes and find another area to gather wood.",
        )],
        ..StateDelta::default()
    }
}

fn snake_pit_block_off(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta {
        advance_hours: 6,
        messages: vec![String::from(
            "You spend several hours making the area safe. Other travelers will be grateful for your efforts.",
        )],
        ..StateDelta::default()
    }
}

// mountain_shortcut --------------------------------------------------------

fn shortcut_take(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta::default();
    if rng.gen_bool(0.3) {
        delta.spare_wheels = -1;
        delta.advance_hours = 96;
        if let Some(id) = gs.party.random_living(rng) {
            let name = gs.party.get(id).map_or_else(String::new, |m| m.name.clone());
            delta.health.push((id, Health::Poor));
            delta.messages.push(format!(
                "The treacherous path led to an accident. Your wagon was damaged, and {name} was injured. You lost 4 days making repairs before continuing."
            ));
        } else {
            delta.messages.push(String::from(
                "The treacherous path led to an accident. Your wagon was damaged. You lost 4 days making repairs before continuing.",
            ));
        }
    } else {
        delta.miles = 100;
        delta.messages.push(String::from(
            "The shortcut was difficult but passable. You've saved significant time on your journey.",
        ));
    }
    delta
}

fn shortcut_stay_on_trail(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta::message(
        "You thank the traveler for the information but decide to stay on the main trail.",
    )
}

fn shortcut_ask_around(_gs: &GameState, _rng: &mut dyn RngCore) -> StateDelta {
    StateDelta::message(
        "Other travelers confirm the shortcut exists, but warn that it's even more dangerous than described. They recommend avoiding it unless you're desperate to make up time.",
    )
}

// disease_outbreak ---------------------------------------------------------

fn outbreak_keep_distance(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    if rng.gen_bool(0.7) {
        return StateDelta::message(
            "You manage to avoid the illness by keeping your distance from the infected travelers.",
        );
    }
    let mut delta = StateDelta::default();
    if let Some(id) = gs.party.random_living(rng) {
        let member = gs.party.get(id).expect("living member exists");
        let fate = if member.health == Health::Good {
            Health::Fair
        } else {
            Health::Poor
        };
        delta.messages.push(format!(
            "Despite your precautions, {} has contracted the illness and is now in {} health.",
            member.name, fate
        ));
        delta.health.push((id, fate));
    }
    delta
}

fn outbreak_help_the_sick(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    if rng.gen_bool(0.5) {
        let mut delta = StateDelta::default();
        for member in gs.party.living() {
            match member.health {
                Health::Good if rng.gen_bool(0.5) => {
                    delta.health.push((member.id, Health::Fair));
                }
                Health::Fair if rng.gen_bool(0.3) => {
                    delta.health.push((member.id, Health::Poor));
                }
                _ => {}
            }
        }
        delta.messages.push(String::from(
            "While caring for the sick, several members of your party contracted the illness.",
        ));
        delta
    } else {
        StateDelta {
            food: 20,
            money_cents: 1_000,
            messages: vec![String::from(
                "You help care for the sick travelers. When they recover, they share some of their supplies with you out of gratitude.",
            )],
            ..StateDelta::default()
        }
    }
}

fn outbreak_push_ahead(gs: &GameState, rng: &mut dyn RngCore) -> StateDelta {
    let mut delta = StateDelta {
        miles: 15,
        ..StateDelta::default()
    };
    for member in gs.party.living() {
        if member.health == Health::Good && rng.gen_bool(0.3) {
            delta.health.push((member.id, Health::Fair));
        }
    }
    delta.messages.push(String::from(
        "You push your party hard to get ahead of the illness. Everyone is more tired than usual, but you've avoided the disease.",
    ));
    delta
}

/// The interactive-event table. Random selection is uniform over entries
/// whose mile window admits the current position; by-id lookup is exact.
pub fn interactive_catalog() -> &'static [InteractiveEvent] {
    static CATALOG: [InteractiveEvent; 11] = [
        InteractiveEvent {
            id: "broken_wagon",
            title: "Broken Wagon",
            description: "Your wagon has broken down in rough terrain. One of the wheels is damaged, and the axle has a crack. The nearest fort is still 30 miles away.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Try to repair it yourself (requires spare parts)",
                    outcome: "You managed to repair the wagon using your spare parts. It took an entire day, but the wagon seems sturdy enough to continue.",
                    effect: broken_wagon_field_repair,
                },
                EventChoice {
                    text: "Push on despite the damage",
                    outcome: "You decide to continue with the damaged wagon. Progress is much slower, and the constant jolting is wearing everyone down.",
                    effect: broken_wagon_push_on,
                },
                EventChoice {
                    text: "Ask the group to help push the wagon to the fort",
                    outcome: "The entire group pushes the wagon for miles. It's exhausting work that takes several days, but you eventually reach the fort where proper repairs can be made.",
                    effect: broken_wagon_group_push,
                },
            ],
        },
        InteractiveEvent {
            id: "native_encounter",
            title: "Native American Encounter",
            description: "Your party has encountered a group of Native Americans. They approach your wagon and appear to be interested in trade.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Offer to trade supplies",
                    outcome: "The trading goes well. You exchange some clothing and ammunition for fresh food and valuable information about the trail ahead.",
                    effect: native_trade,
                },
                EventChoice {
                    text: "Keep your distance and move on",
                    outcome: "You decide not to engage and continue on your journey. The group watches as you pass by but does not follow.",
                    effect: native_keep_distance,
                },
                EventChoice {
                    text: "Share your food and medicine",
                    outcome: "Your generosity is appreciated. In return, they offer guidance on hunting in this region and help repair some of your equipment.",
                    effect: native_share_supplies,
                },
            ],
        },
        InteractiveEvent {
            id: "wild_fruit",
            title: "Wild Fruit Found",
            description: "Your party has discovered what appears to be wild berries and fruit. They look delicious and would supplement your food supplies.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Gather as much as possible",
                    outcome: "Your party spends time gathering plenty of fruit. It's a nice addition to your food supplies.",
                    effect: wild_fruit_gather,
                },
                EventChoice {
                    text: "Cautiously gather a small amount to test first",
                    outcome: "You carefully select and test a small amount of fruit before gathering more. A wise decision that ensures safety.",
                    effect: wild_fruit_sample,
                },
                EventChoice {
                    text: "Ignore them and continue on the trail",
                    outcome: "You decide not to risk it and continue on your journey without delay.",
                    effect: wild_fruit_ignore,
                },
            ],
        },
        InteractiveEvent {
            id: "river_crossing_ice",
            title: "Icy River Crossing",
            description: "The river ahead is partially frozen. Crossing here looks dangerous, but going around will add many miles to your journey.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Attempt to cross on the ice",
                    outcome: "You carefully lead your wagon onto the ice...",
                    effect: ice_attempt_crossing,
                },
                EventChoice {
                    text: "Look for a safer crossing point",
                    outcome: "You spend time searching up and down the river for a safer place to cross.",
                    effect: ice_search_crossing,
                },
                EventChoice {
                    text: "Take the long way around",
                    outcome: "You decide that safety is more important than speed and take the long route around the river.",
                    effect: ice_long_way_around,
                },
            ],
        },
        InteractiveEvent {
            id: "abandoned_wagon",
            title: "Abandoned Wagon",
            description: "You've come across an abandoned wagon off the side of the trail. It appears to have been deserted recently.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Search for supplies",
                    outcome: "You search the wagon for useful supplies.",
                    effect: abandoned_search_supplies,
                },
                EventChoice {
                    text: "Look for survivors",
                    outcome: "You search the area for any survivors from the wagon.",
                    effect: abandoned_look_for_survivors,
                },
                EventChoice {
                    text: "Continue on your way",
                    outcome: "You decide it's best not to disturb the abandoned wagon and continue on your journey.",
                    effect: abandoned_move_on,
                },
            ],
        },
        InteractiveEvent {
            id: "hunting_party",
            title: "Hunting Party Opportunity",
            description: "Some of your fellow travelers invite you to join a hunting party. It could yield a lot of food, but will delay your journey.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Join the hunting party (uses 10 bullets)",
                    outcome: "You join the hunting party and spend a day hunting with the group.",
                    effect: hunting_party_join,
                },
                EventChoice {
                    text: "Decline and continue on the trail",
                    outcome: "You decide to keep to your own schedule and continue on the trail.",
                    effect: hunting_party_decline,
                },
                EventChoice {
                    text: "Trade supplies for a share of the hunt",
                    outcome: "Instead of joining, you offer some supplies in exchange for a share of whatever they catch.",
                    effect: hunting_party_trade,
                },
            ],
        },
        InteractiveEvent {
            id: "thief_in_camp",
            title: "Thief in Camp",
            description: "You wake in the middle of the night to suspicious noises. Someone appears to be going through your supplies.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Confront them with your gun",
                    outcome: "You grab your gun and confront the intruder.",
                    effect: thief_confront,
                },
                EventChoice {
                    text: "Yell to wake the camp",
                    outcome: "You shout loudly to alert everyone in the camp about the intruder.",
                    effect: thief_raise_alarm,
                },
                EventChoice {
                    text: "Remain quiet and hope they leave",
                    outcome: "You stay still and quiet, pretending to be asleep.",
                    effect: thief_stay_quiet,
                },
            ],
        },
        InteractiveEvent {
            id: "lost_child",
            title: "Lost Child",
            description: "While setting up camp, you notice a young child wandering alone near your wagon. They appear to be lost and scared.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Take them in and search for their family",
                    outcome: "You decide to help the lost child find their family.",
                    effect: lost_child_search,
                },
                EventChoice {
                    text: "Give them some food and point them toward the nearest settlement",
                    outcome: "You give the child some supplies and directions to the nearest settlement.",
                    effect: lost_child_give_food,
                },
                EventChoice {
                    text: "Ignore them and continue on your way",
                    outcome: "You decide you cannot afford to get involved and continue preparing your camp.",
                    effect: lost_child_ignore,
                },
            ],
        },
        InteractiveEvent {
            id: "snake_pit",
            title: "Snake Pit",
            description: "While gathering firewood, one of your party members nearly falls into a pit full of rattlesnakes.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Try to kill the snakes for food",
                    outcome: "You decide to hunt the snakes for meat.",
                    effect: snake_pit_hunt,
                },
                EventChoice {
                    text: "Carefully move away from the area",
                    outcome: "You carefully back away from the snake pit and find another spot to gather wood.",
                    effect: snake_pit_back_away,
                },
                EventChoice {
                    text: "Block off the pit with rocks to protect others",
                    outcome: "Your party spends time safely blocking the snake pit with heavy rocks.",
                    effect: snake_pit_block_off,
                },
            ],
        },
        InteractiveEvent {
            id: "mountain_shortcut",
            title: "Mountain Shortcut",
            description: "A traveler tells you about a shortcut through the mountains that could save you a week of travel time, but the path is treacherous.",
            mile_window: Some((800, 1_200)),
            choices: &[
                EventChoice {
                    text: "Take the shortcut",
                    outcome: "You decide to brave the mountain shortcut.",
                    effect: shortcut_take,
                },
                EventChoice {
                    text: "Stick to the main trail",
                    outcome: "You decide that it's safer to stick to the main trail.",
                    effect: shortcut_stay_on_trail,
                },
                EventChoice {
                    text: "Ask others at camp about the shortcut",
                    outcome: "You talk to other travelers about the mountain shortcut.",
                    effect: shortcut_ask_around,
                },
            ],
        },
        InteractiveEvent {
            id: "disease_outbreak",
            title: "Disease Outbreak",
            description: "Several people in your traveling group have fallen ill with a contagious disease. There's risk it could spread to your party.",
            mile_window: None,
            choices: &[
                EventChoice {
                    text: "Keep your distance from the sick",
                    outcome: "You decide to move your camp away from the ill travelers.",
                    effect: outbreak_keep_distance,
                },
                EventChoice {
                    text: "Help care for the sick",
                    outcome: "You decide to help care for the ill travelers.",
                    effect: outbreak_help_the_sick,
                },
                EventChoice {
                    text: "Leave immediately and travel ahead of the group",
                    outcome: "You decide to break camp immediately and push ahead to avoid the disease.",
                    effect: outbreak_push_ahead,
                },
            ],
        },
    ];
    &CATALOG
}
