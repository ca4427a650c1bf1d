//! Weather system and month-indexed transition tables.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::WEATHER_PERSISTENCE;

/// Weather conditions that affect daily travel and party health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Good,
    Fair,
    Poor,
    VeryPoor,
}

pub const WEATHER_ORDER: [Weather; 4] =
    [Weather::Good, Weather::Fair, Weather::Poor, Weather::VeryPoor];

impl Weather {
    /// Multiplier applied to the day's mileage.
    #[must_use]
    pub const fn travel_multiplier(self) -> f32 {
        match self {
            Self::Good => 1.0,
            Self::Fair => 0.9,
            Self::Poor => 0.75,
            Self::VeryPoor => 0.5,
        }
    }

    /// Daily health-deterioration risk contributed by the sky.
    #[must_use]
    pub const fn health_risk(self) -> f32 {
        match self {
            Self::Good | Self::Fair => 0.0,
            Self::Poor => 0.05,
            Self::VeryPoor => 0.15,
        }
    }

    /// Additional daily event chance under worsening conditions.
    #[must_use]
    pub const fn event_chance_bonus(self) -> f32 {
        match self {
            Self::Good => 0.0,
            Self::Fair => 0.02,
            Self::Poor => 0.05,
            Self::VeryPoor => 0.1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::VeryPoor => "very poor",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            "very poor" | "very_poor" => Ok(Self::VeryPoor),
            _ => Err(()),
        }
    }
}

/// Probability of each weather state, indexed like [`WEATHER_ORDER`].
pub type MonthWeights = [f32; 4];

/// Weather transition configuration.
///
/// Months are calendar months (1 = January). A month missing from the table
/// always resolves to good weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub persistence: f32,
    pub monthly: HashMap<u32, MonthWeights>,
}

impl WeatherConfig {
    /// Load weather configuration from JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON string cannot be parsed or if validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| format!("JSON parse error: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that each month's distribution sums to one.
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.persistence) {
            return Err(format!("persistence out of range: {}", self.persistence));
        }
        for (month, weights) in &self.monthly {
            if !(1..=12).contains(month) {
                return Err(format!("invalid month in weather table: {month}"));
            }
            let total: f32 = weights.iter().sum();
            if (total - 1.0).abs() > 1e-4 {
                return Err(format!("weights for month {month} sum to {total}"));
            }
        }
        Ok(())
    }

    /// Get embedded default configuration.
    #[must_use]
    pub fn default_config() -> Self {
        let mut monthly = HashMap::new();
        // Spring: generally mild
        monthly.insert(3, [0.7, 0.2, 0.1, 0.0]);
        monthly.insert(4, [0.7, 0.2, 0.1, 0.0]);
        monthly.insert(5, [0.8, 0.15, 0.05, 0.0]);
        // Summer: mostly clear skies
        monthly.insert(6, [0.9, 0.1, 0.0, 0.0]);
        monthly.insert(7, [0.7, 0.2, 0.1, 0.0]);
        monthly.insert(8, [0.8, 0.15, 0.05, 0.0]);
        // Fall: increasingly challenging
        monthly.insert(9, [0.6, 0.3, 0.1, 0.0]);
        monthly.insert(10, [0.4, 0.3, 0.2, 0.1]);
        monthly.insert(11, [0.2, 0.3, 0.3, 0.2]);
        // Winter: very difficult
        monthly.insert(12, [0.1, 0.2, 0.4, 0.3]);
        monthly.insert(1, [0.1, 0.1, 0.3, 0.5]);
        monthly.insert(2, [0.2, 0.2, 0.3, 0.3]);
        Self {
            persistence: WEATHER_PERSISTENCE,
            monthly,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Eq for WeatherConfig {}

/// Select tomorrow's weather from the current value and calendar month.
///
/// Weather is sticky: with `persistence` probability the current value is
/// kept as-is, otherwise a fresh value is sampled from the month's
/// distribution via a cumulative-probability draw.
pub fn advance_weather<R: Rng + ?Sized>(
    current: Weather,
    month: u32,
    cfg: &WeatherConfig,
    rng: &mut R,
) -> Weather {
    let Some(weights) = cfg.monthly.get(&month) else {
        return Weather::Good;
    };

    if rng.r#gen::<f32>() < cfg.persistence {
        return current;
    }

    let roll: f32 = rng.r#gen();
    let mut cumulative = 0.0f32;
    for (weather, probability) in WEATHER_ORDER.iter().zip(weights.iter()) {
        cumulative += probability;
        if roll <= cumulative {
            return *weather;
        }
    }
    Weather::Good
}
