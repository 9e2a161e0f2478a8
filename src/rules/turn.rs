//! Turn controller.

use crate::core::{PlayerId, SessionState};

/// Where the turn went after a player finished trading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnAdvance {
    /// This player is now active.
    Next(PlayerId),
    /// Nobody is left to trade; the active index was not touched.
    AllTraded,
}

/// Hand the turn to the next player who has not traded.
///
/// Scans in session order starting just after the active seat and wraps
/// around. Only the active index (and the turn counter) change.
pub fn advance_turn(state: &mut SessionState) -> TurnAdvance {
    let count = state.player_count();
    let start = state.active_turn_index();

    let next = (1..=count)
        .map(|offset| PlayerId::new(((start + offset) % count) as u8))
        .find(|&id| state.player(id).is_some_and(|p| !p.has_traded()));

    match next {
        Some(player) => {
            state.pass_turn_to(player);
            tracing::debug!(%player, turn = state.turn_number(), "turn passed");
            TurnAdvance::Next(player)
        }
        None => TurnAdvance::AllTraded,
    }
}
