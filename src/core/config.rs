//! Session configuration.
//!
//! A session is configured once at startup:
//! - `PlayerSetup`: who plays and where they start
//! - `MapConfig`: map size, movement step, rumor spots and the market
//! - `SessionConfig`: combines the above with the economic parameters
//!
//! Configurations can be built in code with the `with_*` methods or read
//! from TOML. Missing TOML keys take their default values.
//!
//! ```
//! use rumor_market::core::SessionConfig;
//!
//! let config = SessionConfig::from_toml_str("rumors_required = 3\nseed = 9").unwrap();
//! assert_eq!(config.rumors_required, 3);
//! assert_eq!(config.players.len(), 3);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::{
    default_market_position, default_start_positions, Footprint, MapBounds, Position,
    DEFAULT_RUMOR_SPOTS,
};

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("{0} rumor spots do not fit in a location id")]
    TooManySpots(usize),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// What happens to a clearing price below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFloor {
    /// Keep the model's output as is, negative prices included.
    #[default]
    Unclamped,
    /// Clamp the clearing price at zero before profits are computed.
    Zero,
}

/// Closed interval the market volatility is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRange {
    pub low: f64,
    pub high: f64,
}

impl Default for VolatilityRange {
    fn default() -> Self {
        Self {
            low: 0.9,
            high: 1.1,
        }
    }
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    pub start: Position,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>, start: Position) -> Self {
        Self {
            name: name.into(),
            start,
        }
    }
}

/// Map geometry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    /// Distance covered by one movement step.
    pub step: i32,
    /// Side length of a player token and of a rumor spot.
    pub token_size: i32,
    pub market: Position,
    pub market_size: i32,
    pub rumor_spots: Vec<Position>,
}

impl Default for MapConfig {
    fn default() -> Self {
        let bounds = MapBounds::new(800, 800);
        Self {
            width: bounds.width,
            height: bounds.height,
            step: 50,
            token_size: 50,
            market: default_market_position(bounds, 50),
            market_size: 100,
            rumor_spots: DEFAULT_RUMOR_SPOTS.to_vec(),
        }
    }
}

impl MapConfig {
    #[must_use]
    pub fn bounds(&self) -> MapBounds {
        MapBounds::new(self.width, self.height)
    }

    #[must_use]
    pub fn market_footprint(&self) -> Footprint {
        Footprint::new(self.market, self.market_size)
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub players: Vec<PlayerSetup>,
    pub starting_funds: i64,
    /// Rumors a player must hold before the market will trade with them.
    pub rumors_required: usize,
    /// Price weight of a single increase or decrease signal.
    pub signal_weight: f64,
    pub volatility: VolatilityRange,
    pub price_floor: PriceFloor,
    /// A collected rumor is gone for everyone, not just its collector.
    pub exclusive_rumors: bool,
    pub map: MapConfig,
    /// Seed for the settlement volatility stream.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let map = MapConfig::default();
        let [first, second, third] = default_start_positions(map.bounds(), map.token_size);
        Self {
            players: vec![
                PlayerSetup::new("Baekje Merchant", first),
                PlayerSetup::new("Silla Merchant", second),
                PlayerSetup::new("Goguryeo Merchant", third),
            ],
            starting_funds: 2000,
            rumors_required: 7,
            signal_weight: 0.02,
            volatility: VolatilityRange::default(),
            price_floor: PriceFloor::Unclamped,
            exclusive_rumors: true,
            map,
            seed: 0,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Replace the seats.
    #[must_use]
    pub fn with_players(mut self, players: Vec<PlayerSetup>) -> Self {
        self.players = players;
        self
    }

    #[must_use]
    pub fn with_starting_funds(mut self, funds: i64) -> Self {
        self.starting_funds = funds;
        self
    }

    #[must_use]
    pub fn with_rumors_required(mut self, count: usize) -> Self {
        self.rumors_required = count;
        self
    }

    #[must_use]
    pub fn with_signal_weight(mut self, weight: f64) -> Self {
        self.signal_weight = weight;
        self
    }

    #[must_use]
    pub fn with_volatility(mut self, low: f64, high: f64) -> Self {
        self.volatility = VolatilityRange { low, high };
        self
    }

    #[must_use]
    pub fn with_price_floor(mut self, floor: PriceFloor) -> Self {
        self.price_floor = floor;
        self
    }

    #[must_use]
    pub fn with_exclusive_rumors(mut self, exclusive: bool) -> Self {
        self.exclusive_rumors = exclusive;
        self
    }

    #[must_use]
    pub fn with_map(mut self, map: MapConfig) -> Self {
        self.map = map;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if self.players.is_empty() {
            return invalid("at least one player is required".to_string());
        }
        if self.players.len() > 255 {
            return invalid(format!("{} players exceeds the limit of 255", self.players.len()));
        }

        let map = &self.map;
        if map.step <= 0 || map.token_size <= 0 || map.market_size <= 0 {
            return invalid("step, token_size and market_size must be positive".to_string());
        }
        if map.width < map.token_size || map.height < map.token_size {
            return invalid(format!(
                "map {}x{} cannot hold a token of size {}",
                map.width, map.height, map.token_size
            ));
        }

        let bounds = map.bounds();
        for seat in &self.players {
            if !bounds.contains(&Footprint::new(seat.start, map.token_size)) {
                return invalid(format!("{} starts outside the map at {}", seat.name, seat.start));
            }
        }
        if map.rumor_spots.len() > usize::from(u16::MAX) + 1 {
            return Err(ConfigError::TooManySpots(map.rumor_spots.len()));
        }

        let VolatilityRange { low, high } = self.volatility;
        if !low.is_finite() || !high.is_finite() || low > high {
            return invalid(format!("volatility range [{}, {}] is not a valid interval", low, high));
        }
        if !self.signal_weight.is_finite() {
            return invalid("signal_weight must be finite".to_string());
        }

        Ok(())
    }
}
