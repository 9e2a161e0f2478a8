//! Per-player ledger: funds, collected rumors, the bet, and its outcome.
//!
//! Every flag on the ledger only moves forward. `can_bet` and `has_traded`
//! flip once and stay; the bet and the settlement profit are written once.
//! Mutators are crate-private so the betting validator and the settlement
//! engine remain the only writers.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::map::{Footprint, LocationId, Position};
use crate::rumor::RumorSignal;

/// Side of a bet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetDirection {
    /// Profits when the final price ends above the bet price.
    #[default]
    Buy,
    /// Profits when the final price ends below the bet price.
    Sell,
}

impl std::fmt::Display for BetDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetDirection::Buy => write!(f, "BUY"),
            BetDirection::Sell => write!(f, "SELL"),
        }
    }
}

/// A committed bet. Price and quantity are strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub direction: BetDirection,
    pub price: i64,
    pub quantity: i64,
}

impl Bet {
    /// Profit of this bet if the market clears at `final_price`.
    ///
    /// ```
    /// use rumor_market::core::{Bet, BetDirection};
    ///
    /// let buy = Bet { direction: BetDirection::Buy, price: 100, quantity: 10 };
    /// assert_eq!(buy.profit_at(98), -20);
    /// ```
    #[must_use]
    pub fn profit_at(&self, final_price: i64) -> i64 {
        let delta = self
            .quantity
            .saturating_mul(final_price.saturating_sub(self.price));
        match self.direction {
            BetDirection::Buy => delta,
            BetDirection::Sell => delta.saturating_neg(),
        }
    }
}

impl std::fmt::Display for Bet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} @ {}", self.direction, self.quantity, self.price)
    }
}

/// A rumor in a player's notebook and where it was heard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollectedRumor {
    pub location: LocationId,
    pub signal: Arc<RumorSignal>,
}

/// One merchant's ledger.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    position: Position,
    funds: i64,
    collected: Vector<CollectedRumor>,
    rumors_required: usize,
    can_bet: bool,
    has_traded: bool,
    bet: Option<Bet>,
    settlement_profit: Option<i64>,
}

impl Player {
    #[must_use]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        position: Position,
        funds: i64,
        rumors_required: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            funds,
            collected: Vector::new(),
            rumors_required,
            can_bet: false,
            has_traded: false,
            bet: None,
            settlement_profit: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn footprint(&self, token_size: i32) -> Footprint {
        Footprint::new(self.position, token_size)
    }

    #[must_use]
    pub fn funds(&self) -> i64 {
        self.funds
    }

    /// Rumors in the order they were collected.
    pub fn collected(&self) -> impl Iterator<Item = &CollectedRumor> {
        self.collected.iter()
    }

    /// Signals in the order they were collected.
    pub fn collected_signals(&self) -> impl Iterator<Item = &RumorSignal> {
        self.collected.iter().map(|c| c.signal.as_ref())
    }

    #[must_use]
    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    #[must_use]
    pub fn rumors_required(&self) -> usize {
        self.rumors_required
    }

    /// Still short of the rumor threshold.
    #[must_use]
    pub fn needs_rumors(&self) -> bool {
        self.collected.len() < self.rumors_required
    }

    #[must_use]
    pub fn has_collected_from(&self, location: LocationId) -> bool {
        self.collected.iter().any(|c| c.location == location)
    }

    #[must_use]
    pub fn can_bet(&self) -> bool {
        self.can_bet
    }

    #[must_use]
    pub fn has_traded(&self) -> bool {
        self.has_traded
    }

    #[must_use]
    pub fn bet(&self) -> Option<&Bet> {
        self.bet.as_ref()
    }

    /// Profit assigned at settlement; 0 until then.
    #[must_use]
    pub fn settlement_profit(&self) -> i64 {
        self.settlement_profit.unwrap_or(0)
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settlement_profit.is_some()
    }

    pub(crate) fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn collect(&mut self, location: LocationId, signal: Arc<RumorSignal>) {
        self.collected.push_back(CollectedRumor { location, signal });
    }

    pub(crate) fn mark_eligible(&mut self) {
        self.can_bet = true;
    }

    /// Record the bet and mark the player as traded.
    pub(crate) fn commit_bet(&mut self, bet: Bet) {
        debug_assert!(!self.has_traded, "bet committed twice for {}", self.id);
        self.bet = Some(bet);
        self.has_traded = true;
    }

    /// Book the settlement profit into funds.
    pub(crate) fn apply_settlement(&mut self, profit: i64) {
        debug_assert!(self.settlement_profit.is_none(), "{} settled twice", self.id);
        self.settlement_profit = Some(profit);
        self.funds = self.funds.saturating_add(profit);
    }
}
