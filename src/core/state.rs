//! Session state: the players, whose turn it is, the phase, and the
//! clearing price once there is one.
//!
//! The presentation layer reads everything here; only the rules modules
//! write to it.

use im::Vector;
use serde::Serialize;

use super::action::{ActionKind, ActionRecord};
use super::config::SessionConfig;
use super::ledger::Player;
use super::player::{PlayerId, PlayerMap};
use crate::rules::Phase;

/// The mutable state of one session.
///
/// ## Invariants
///
/// - the player table has a fixed size and order
/// - `active` is always a seat of the table, and points at a player who
///   has not traded while one exists
/// - `final_price` is written once, together with the move to
///   [`Phase::Settled`]
#[derive(Clone, Debug, Serialize)]
pub struct SessionState {
    players: PlayerMap<Player>,
    active: PlayerId,
    phase: Phase,
    final_price: Option<i64>,

    /// Turn number (starts at 1, bumps whenever the turn passes).
    turn_number: u32,
    next_sequence: u32,
    history: Vector<ActionRecord>,
    ended: bool,
}

impl SessionState {
    /// Create a session with the first seat active and everyone exploring.
    #[must_use]
    pub fn new(players: PlayerMap<Player>) -> Self {
        Self {
            players,
            active: PlayerId::new(0),
            phase: Phase::Exploring,
            final_price: None,
            turn_number: 1,
            next_sequence: 0,
            history: Vector::new(),
            ended: false,
        }
    }

    /// Seat the players described by `config`.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        let players = config
            .players
            .iter()
            .enumerate()
            .map(|(i, seat)| {
                Player::new(
                    PlayerId::new(i as u8),
                    seat.name.clone(),
                    seat.start,
                    config.starting_funds,
                    config.rumors_required,
                )
            })
            .collect();

        Self::new(PlayerMap::from_vec(players))
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Players in session order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    /// Index of the active player in session order.
    #[must_use]
    pub fn active_turn_index(&self) -> usize {
        self.active.index()
    }

    #[must_use]
    pub fn active(&self) -> &Player {
        &self.players[self.active]
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn final_price(&self) -> Option<i64> {
        self.final_price
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn traded_count(&self) -> usize {
        self.players().filter(|p| p.has_traded()).count()
    }

    #[must_use]
    pub fn all_traded(&self) -> bool {
        self.players().all(Player::has_traded)
    }

    /// Accepted actions in order.
    pub fn history(&self) -> impl Iterator<Item = &ActionRecord> {
        self.history.iter()
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub(crate) fn players_mut(&mut self) -> &mut PlayerMap<Player> {
        &mut self.players
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub(crate) fn active_mut(&mut self) -> &mut Player {
        let active = self.active;
        &mut self.players[active]
    }

    pub(crate) fn pass_turn_to(&mut self, player: PlayerId) {
        self.active = player;
        self.turn_number += 1;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_final_price(&mut self, price: i64) {
        debug_assert!(self.final_price.is_none(), "final price written twice");
        self.final_price = Some(price);
    }

    pub(crate) fn end(&mut self) {
        self.ended = true;
    }

    /// Append an accepted action taken during `turn`.
    pub(crate) fn record_action(&mut self, player: PlayerId, kind: ActionKind, turn: u32) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.history.push_back(ActionRecord {
            player,
            kind,
            turn,
            sequence,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let state = SessionState::from_config(&SessionConfig::default());

        assert_eq!(state.player_count(), 3);
        assert_eq!(state.active_player(), PlayerId::new(0));
        assert_eq!(state.active_turn_index(), 0);
        assert_eq!(state.phase(), Phase::Exploring);
        assert_eq!(state.final_price(), None);
        assert_eq!(state.turn_number(), 1);
        assert_eq!(state.traded_count(), 0);
        assert!(!state.all_traded());
        assert!(!state.is_ended());

        let names: Vec<_> = state.players().map(Player::name).collect();
        assert_eq!(names, vec!["Baekje Merchant", "Silla Merchant", "Goguryeo Merchant"]);
        assert!(state.players().all(|p| p.funds() == 2000));
        assert!(state.players().all(|p| p.rumors_required() == 7));
    }

    #[test]
    fn test_player_lookup() {
        let state = SessionState::from_config(&SessionConfig::default());

        assert_eq!(state.player(PlayerId::new(1)).unwrap().name(), "Silla Merchant");
        assert!(state.player(PlayerId::new(3)).is_none());
        assert_eq!(state.active().id(), PlayerId::new(0));
    }

    #[test]
    fn test_pass_turn() {
        let mut state = SessionState::from_config(&SessionConfig::default());
        state.pass_turn_to(PlayerId::new(2));

        assert_eq!(state.active_player(), PlayerId::new(2));
        assert_eq!(state.turn_number(), 2);
    }

    #[test]
    fn test_record_action() {
        let mut state = SessionState::from_config(&SessionConfig::default());
        state.record_action(PlayerId::new(0), ActionKind::Move, state.turn_number());
        state.pass_turn_to(PlayerId::new(1));
        state.record_action(PlayerId::new(1), ActionKind::Move, state.turn_number());

        let history: Vec<_> = state.history().cloned().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sequence, 0);
        assert_eq!(history[0].turn, 1);
        assert_eq!(history[1].player, PlayerId::new(1));
        assert_eq!(history[1].sequence, 1);
        assert_eq!(history[1].turn, 2);
    }

    #[test]
    fn test_state_snapshot_serializes() {
        let state = SessionState::from_config(&SessionConfig::default());
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["phase"], "Exploring");
        assert_eq!(json["active"], 0);
    }
}
