//! Action events and the history record kept for each accepted action.
//!
//! Actions arrive from the input layer already translated from keys and
//! clicks. They never name the acting player: the active player always acts.

use serde::{Deserialize, Serialize};

use super::ledger::BetDirection;
use super::player::PlayerId;
use crate::map::LocationId;

/// An input event for the active player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Move by `dx`, `dy` steps.
    Move { dx: i32, dy: i32 },
    /// Talk to the informant at a spot the player is standing on.
    CollectAt(LocationId),
    /// Open the trading window at the market.
    RequestStartBetting,
    /// Commit a bet from the raw contents of the input boxes.
    SubmitBet {
        direction: BetDirection,
        price_text: String,
        quantity_text: String,
    },
    /// Close the session.
    RequestEndSession,
}

impl GameAction {
    /// Convenience constructor for a bet.
    ///
    /// ```
    /// use rumor_market::core::{ActionKind, BetDirection, GameAction};
    ///
    /// let bet = GameAction::bet(BetDirection::Sell, "120", "3");
    /// assert_eq!(bet.kind(), ActionKind::SubmitBet);
    /// ```
    pub fn bet(
        direction: BetDirection,
        price_text: impl Into<String>,
        quantity_text: impl Into<String>,
    ) -> Self {
        GameAction::SubmitBet {
            direction,
            price_text: price_text.into(),
            quantity_text: quantity_text.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            GameAction::Move { .. } => ActionKind::Move,
            GameAction::CollectAt(_) => ActionKind::CollectAt,
            GameAction::RequestStartBetting => ActionKind::StartBetting,
            GameAction::SubmitBet { .. } => ActionKind::SubmitBet,
            GameAction::RequestEndSession => ActionKind::EndSession,
        }
    }
}

/// Payload-free kind of an action, used for gating and history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    CollectAt,
    StartBetting,
    SubmitBet,
    EndSession,
}

/// An accepted action with its place in the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player whose turn it was.
    pub player: PlayerId,

    pub kind: ActionKind,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number across the whole session.
    pub sequence: u32,
}
