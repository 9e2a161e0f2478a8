//! Game rules: the phase machine, turn order, bet validation, settlement
//! and the session driver that routes actions through them.
//!
//! Everything here mutates a [`SessionState`](crate::core::SessionState)
//! only after an action has been fully validated.

pub mod betting;
pub mod phase;
pub mod session;
pub mod settlement;
pub mod turn;

pub use betting::{parse_positive, submit_bet, validate_bet};
pub use phase::Phase;
pub use session::Session;
pub use settlement::{
    settle, FixedVolatility, PriceModel, SettlementEntry, SettlementReport, VolatilitySource,
};
pub use turn::{advance_turn, TurnAdvance};
