//! Session phases and the actions each one permits.
//!
//! ```text
//! Exploring --start betting--> Betting --last bet--> Settled
//!     ^                           |
//!     +------- bet committed -----+
//! ```
//!
//! The phase gates what the *active* player may do; it is not a mode every
//! player shares. Settled is terminal.

use serde::{Deserialize, Serialize};

use crate::core::ActionKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The active player walks the map collecting rumors.
    #[default]
    Exploring,
    /// The active player fills in a bet at the market.
    Betting,
    /// The market has cleared.
    Settled,
}

impl Phase {
    /// Action kinds legal for the active player in this phase.
    #[must_use]
    pub fn legal_kinds(self) -> &'static [ActionKind] {
        match self {
            Phase::Exploring => &[
                ActionKind::Move,
                ActionKind::CollectAt,
                ActionKind::StartBetting,
                ActionKind::EndSession,
            ],
            Phase::Betting => &[ActionKind::SubmitBet, ActionKind::EndSession],
            Phase::Settled => &[ActionKind::EndSession],
        }
    }

    #[must_use]
    pub fn permits(self, kind: ActionKind) -> bool {
        self.legal_kinds().contains(&kind)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Phase::Settled
    }
}
