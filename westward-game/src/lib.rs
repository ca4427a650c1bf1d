//! Westward Game Engine
//!
//! Platform-agnostic core game logic for the Westward trail survival game.
//! This crate provides all game mechanics without UI or platform-specific
//! dependencies: the presentation layer renders the state aggregate and
//! translates clicks into calls on the operations exposed here.

pub mod camp;
pub mod constants;
pub mod crossings;
pub mod data;
pub mod events;
pub mod hunt;
pub mod journey;
pub mod result;
pub mod seed;
pub mod session;
pub mod state;
pub mod store;
pub mod weather;

// Re-export commonly used types
pub use camp::{CampActivity, CampOutcome, SparePart, break_camp, camp_activity, enter_camp, night_event_roll};
pub use crossings::{
    CrossingOutcome, CrossingStrategy, RiverConditions, cross_river, suggest_strategy,
};
pub use data::{
    Bounty, ChoiceEffect, EventChoice, FixedEvent, FixedEventKind, InteractiveEvent, Severity,
    StateDelta, fixed_catalog, interactive_catalog, random_settler_name,
};
pub use events::{
    EventError, find_interactive, force_fixed_event, resolve_choice, resolve_fixed_event,
    schedule_deferred, trigger_event,
};
pub use hunt::{HuntAnimal, HuntSettlement, QuickHuntOutcome, quick_hunt, settle_hunt};
pub use journey::{
    DayConfig, DayOutcome, Landmark, LandmarkKind, RngBundle, advance_day, event_probability,
    landmark_crossed, travel_time_estimate,
};
pub use result::{ResultConfig, ResultSummary, result_summary};
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy};
pub use session::Simulation;
pub use state::{
    ActiveEvent, DefeatReason, Ending, GameState, Health, Inventory, MemberId, PaceId, Party,
    PartyMember, RationsId, format_money_cents,
};
pub use store::{PriceTable, PurchaseOrder, StoreOutcome, purchase};
pub use weather::{Weather, WeatherConfig, advance_weather};

/// Build the starting state for a new journey: leader plus companions, all
/// in good health, with the standard outfitting and a welcome message.
#[must_use]
pub fn initialize(leader_name: &str, member_names: &[String], seed: u64) -> GameState {
    GameState::new(leader_name, member_names, seed)
}

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Main game engine for managing game instances
pub struct GameEngine<S>
where
    S: GameStorage,
{
    storage: S,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    /// Create a new game engine with the provided storage
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a new game session with the specified party and seed
    #[must_use]
    pub fn create_session(
        &self,
        leader_name: &str,
        member_names: &[String],
        seed: u64,
    ) -> Simulation {
        Simulation::new(leader_name, member_names, seed)
    }

    /// Save a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(save_name, game_state)
    }

    /// Load a game state and rehydrate it into a runnable session
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    pub fn load_game(&self, save_name: &str) -> Result<Option<Simulation>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let loaded = self.storage.load_game(save_name).map_err(Into::into)?;
        Ok(loaded.map(Simulation::resume))
    }
}
