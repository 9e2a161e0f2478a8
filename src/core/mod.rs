//! Core types: players and their ledgers, session state, actions, errors,
//! RNG, configuration.

pub mod action;
pub mod config;
pub mod error;
pub mod ledger;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionKind, ActionRecord, GameAction};
pub use config::{ConfigError, MapConfig, PlayerSetup, PriceFloor, SessionConfig, VolatilityRange};
pub use error::{BetField, ErrorKind, GameError, Result};
pub use ledger::{Bet, BetDirection, CollectedRumor, Player};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::SessionState;
