//! Betting validator.
//!
//! A bet arrives as the raw text of the price and quantity boxes. It is
//! checked in full before anything is written; on success the bet is the
//! player's for good and the turn moves on.

use crate::core::{
    ActionKind, Bet, BetDirection, BetField, GameError, PlayerId, Result, SessionState,
};

use super::phase::Phase;
use super::turn::{advance_turn, TurnAdvance};

/// Parse a bet field as a strictly positive integer.
///
/// Surrounding whitespace is ignored.
pub fn parse_positive(field: BetField, text: &str) -> Result<i64> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| GameError::InvalidNumber {
            field,
            text: text.to_string(),
        })?;

    if value <= 0 {
        return Err(GameError::NonPositiveValue { field, value });
    }
    Ok(value)
}

/// Check a bet without touching the state.
///
/// Turn and phase violations are reported before input problems.
pub fn validate_bet(
    state: &SessionState,
    player: PlayerId,
    direction: BetDirection,
    price_text: &str,
    quantity_text: &str,
) -> Result<Bet> {
    if state.phase() != Phase::Betting {
        return Err(GameError::ActionNotAllowed {
            action: ActionKind::SubmitBet,
            phase: state.phase(),
        });
    }

    let active = state.active_player();
    if player != active {
        return Err(GameError::NotActivePlayer { player, active });
    }
    if state.active().has_traded() {
        return Err(GameError::AlreadyTraded(player));
    }

    let price = parse_positive(BetField::Price, price_text)?;
    let quantity = parse_positive(BetField::Quantity, quantity_text)?;

    Ok(Bet {
        direction,
        price,
        quantity,
    })
}

/// Validate and commit a bet, then pass the turn.
///
/// This is the only path that writes a bet. A rejected call changes
/// nothing.
pub fn submit_bet(
    state: &mut SessionState,
    player: PlayerId,
    direction: BetDirection,
    price_text: &str,
    quantity_text: &str,
) -> Result<TurnAdvance> {
    let bet = validate_bet(state, player, direction, price_text, quantity_text)?;

    state.active_mut().commit_bet(bet);
    tracing::info!(%player, %bet, "bet committed");

    Ok(advance_turn(state))
}
