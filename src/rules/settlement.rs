//! Settlement engine.
//!
//! Once every player has bet, the market clears at a single price:
//!
//! ```text
//! final = trunc(mean(bet prices) * volatility * (1 + w*up - w*down))
//! ```
//!
//! `up`/`down` count every increase/decrease signal held by any player,
//! duplicates included. `volatility` is drawn from a [`VolatilitySource`]
//! so tests and replays can pin it. Each player then books
//! `quantity * (final - bet price)`, negated for sells.

use serde::Serialize;

use crate::core::{
    Bet, GameError, GameRng, PlayerId, PriceFloor, Result, SessionConfig, SessionState,
    VolatilityRange,
};
use crate::rumor::SignalTally;

use super::phase::Phase;

/// Source of the market volatility multiplier.
pub trait VolatilitySource {
    /// Draw a multiplier from the closed interval `range`.
    fn draw(&mut self, range: VolatilityRange) -> f64;
}

impl VolatilitySource for GameRng {
    fn draw(&mut self, range: VolatilityRange) -> f64 {
        self.gen_range_f64(range.low..=range.high)
    }
}

/// Always returns the same multiplier, whatever the range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedVolatility(pub f64);

impl VolatilitySource for FixedVolatility {
    fn draw(&mut self, _range: VolatilityRange) -> f64 {
        self.0
    }
}

/// The economic parameters of settlement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceModel {
    pub signal_weight: f64,
    pub volatility: VolatilityRange,
    pub floor: PriceFloor,
}

impl Default for PriceModel {
    fn default() -> Self {
        Self {
            signal_weight: 0.02,
            volatility: VolatilityRange::default(),
            floor: PriceFloor::Unclamped,
        }
    }
}

impl PriceModel {
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            signal_weight: config.signal_weight,
            volatility: config.volatility,
            floor: config.price_floor,
        }
    }

    /// Clearing price for the given inputs, truncated toward zero.
    #[must_use]
    pub fn clearing_price(&self, average_bet_price: f64, volatility: f64, tally: &SignalTally) -> i64 {
        let raw = average_bet_price * volatility * tally.signal_factor(self.signal_weight);
        let price = raw as i64;
        match self.floor {
            PriceFloor::Unclamped => price,
            PriceFloor::Zero => price.max(0),
        }
    }
}

/// One line of the results table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettlementEntry {
    pub player: PlayerId,
    pub name: String,
    pub bet: Bet,
    pub profit: i64,
    pub funds: i64,
}

/// Everything the results screen shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettlementReport {
    pub final_price: i64,
    pub average_bet_price: f64,
    pub market_volatility: f64,
    pub signal_factor: f64,
    pub tally: SignalTally,
    pub entries: Vec<SettlementEntry>,
}

impl SettlementReport {
    /// The clearing price as shown to players: never below zero.
    #[must_use]
    pub fn display_price(&self) -> i64 {
        self.final_price.max(0)
    }

    #[must_use]
    pub fn entry(&self, player: PlayerId) -> Option<&SettlementEntry> {
        self.entries.iter().find(|e| e.player == player)
    }
}

/// Clear the market and book every player's profit.
///
/// Requires the betting phase with every bet committed; otherwise fails
/// with [`GameError::IncompleteSettlement`] and changes nothing. On success
/// the session moves to [`Phase::Settled`], which no operation leaves.
pub fn settle(
    state: &mut SessionState,
    model: &PriceModel,
    source: &mut dyn VolatilitySource,
) -> Result<SettlementReport> {
    let bets: Vec<Bet> = state.players().filter_map(|p| p.bet().copied()).collect();

    if state.phase() != Phase::Betting || bets.len() != state.player_count() {
        return Err(GameError::IncompleteSettlement {
            phase: state.phase(),
            traded: state.traded_count(),
            total: state.player_count(),
        });
    }

    let average_bet_price =
        bets.iter().map(|bet| bet.price as f64).sum::<f64>() / bets.len() as f64;
    let tally = SignalTally::from_signals(state.players().flat_map(|p| p.collected_signals()));
    let signal_factor = tally.signal_factor(model.signal_weight);
    let market_volatility = source.draw(model.volatility);
    let final_price = model.clearing_price(average_bet_price, market_volatility, &tally);

    let mut entries = Vec::with_capacity(bets.len());
    for (id, player) in state.players_mut().iter_mut() {
        let Some(bet) = player.bet().copied() else {
            continue;
        };
        let profit = bet.profit_at(final_price);
        player.apply_settlement(profit);
        entries.push(SettlementEntry {
            player: id,
            name: player.name().to_string(),
            bet,
            profit,
            funds: player.funds(),
        });
    }

    state.set_final_price(final_price);
    state.set_phase(Phase::Settled);

    tracing::info!(
        final_price,
        average_bet_price,
        market_volatility,
        signal_factor,
        up = tally.up,
        down = tally.down,
        "market settled"
    );

    Ok(SettlementReport {
        final_price,
        average_bet_price,
        market_volatility,
        signal_factor,
        tally,
        entries,
    })
}
