//! # rumor-market
//!
//! Turn engine and settlement model for a local, turn-based rumor trading
//! game. Merchants walk a map collecting price rumors from informants,
//! reach the market, commit a directional bet, and once everyone has bet
//! the market clears at a single price.
//!
//! ## Design Principles
//!
//! 1. **Validate, then write**: every operation checks its whole input
//!    before touching the session. A rejected action changes nothing.
//!
//! 2. **Write-once ledgers**: eligibility, the bet and the settlement
//!    profit only ever move forward.
//!
//! 3. **Injected randomness**: rumors come from a [`RumorProvider`] and
//!    market volatility from a [`VolatilitySource`], so a session can be
//!    replayed exactly.
//!
//! ## Modules
//!
//! - `core`: players, ledgers, session state, actions, errors, RNG, configuration
//! - `map`: positions, footprints and the default layout
//! - `rumor`: classified signals, providers and the rumor board
//! - `rules`: phases, turn order, bet validation, settlement, the session driver
//!
//! ## Example
//!
//! ```
//! use rumor_market::{RumorBoard, RumorSignal, Session, SessionConfig, FixedVolatility};
//!
//! let config = SessionConfig::default();
//! let board = RumorBoard::from_signals(
//!     config.map.token_size,
//!     config.map.rumor_spots.iter().map(|&p| (p, RumorSignal::neutral("quiet day"))),
//! )
//! .unwrap();
//! let session = Session::new(config, board, Box::new(FixedVolatility(1.0))).unwrap();
//! assert_eq!(session.state().player_count(), 3);
//! ```

pub mod core;
pub mod map;
pub mod rules;
pub mod rumor;

// Re-export commonly used types
pub use crate::core::{
    ActionKind, ActionRecord, Bet, BetDirection, BetField, ConfigError, ErrorKind, GameAction,
    GameError, GameRng, MapConfig, Player, PlayerId, PlayerMap, PlayerSetup,
    PriceFloor, SessionConfig, SessionState, VolatilityRange,
};

pub use crate::map::{Footprint, LocationId, MapBounds, Position};

pub use crate::rumor::{
    parse_rumor_response, ProviderError, Region, RumorBoard, RumorDraft, RumorProvider,
    RumorSignal, ScriptedProvider, SignalDirection, SignalTally, SpotContext,
};

pub use crate::rules::{
    advance_turn, settle, submit_bet, FixedVolatility, Phase, PriceModel, Session,
    SettlementEntry, SettlementReport, TurnAdvance, VolatilitySource,
};
