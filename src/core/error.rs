//! Errors raised by session operations.
//!
//! Every rejection leaves the session untouched. [`GameError::kind`] tells
//! bad player input, which the UI shows and lets the player retry, apart
//! from protocol violations a correctly gated caller never produces.

use thiserror::Error;

use super::action::ActionKind;
use super::player::PlayerId;
use crate::map::LocationId;
use crate::rules::Phase;

/// Which input box a bet error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetField {
    Price,
    Quantity,
}

impl std::fmt::Display for BetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetField::Price => write!(f, "price"),
            BetField::Quantity => write!(f, "quantity"),
        }
    }
}

/// Broad class of a [`GameError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input from the player; show it and let them retry.
    UserInput,
    /// The caller offered an action that was not legal. A correctly gated
    /// UI never sees these.
    Protocol,
}

/// Every rejection the engine can produce. A rejected call leaves the
/// session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{field} must be a whole number, got {text:?}")]
    InvalidNumber { field: BetField, text: String },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositiveValue { field: BetField, value: i64 },

    #[error("{player} is not the active player ({active} is)")]
    NotActivePlayer { player: PlayerId, active: PlayerId },

    #[error("{0} has already traded")]
    AlreadyTraded(PlayerId),

    #[error("cannot settle in phase {phase:?} with {traded} of {total} bets committed")]
    IncompleteSettlement {
        phase: Phase,
        traded: usize,
        total: usize,
    },

    #[error("{action:?} is not allowed during {phase:?}")]
    ActionNotAllowed { action: ActionKind, phase: Phase },

    #[error("{0} needs more rumors and a visit to the market before trading")]
    NotEligibleToBet(PlayerId),

    #[error("no rumor spot with id {0}")]
    UnknownLocation(LocationId),

    #[error("{player} is not standing at {location}")]
    LocationOutOfReach {
        player: PlayerId,
        location: LocationId,
    },

    #[error("the rumor at {0} has already been collected")]
    RumorAlreadyCollected(LocationId),

    #[error("{0} already holds every rumor they need")]
    RumorQuotaReached(PlayerId),

    #[error("the session has ended")]
    SessionEnded,
}

impl GameError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidNumber { .. } | GameError::NonPositiveValue { .. } => {
                ErrorKind::UserInput
            }
            _ => ErrorKind::Protocol,
        }
    }

    #[must_use]
    pub fn is_user_error(&self) -> bool {
        self.kind() == ErrorKind::UserInput
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
