//! Session driver.
//!
//! `Session` ties the pieces together: it owns the state, the rumor board,
//! the configuration and the volatility source, and routes every incoming
//! [`GameAction`] through the phase gate to the handler for that action.
//!
//! ## Flow of one action
//!
//! 1. reject everything once the session has ended
//! 2. reject kinds the current phase does not permit
//! 3. run the handler; handlers validate before they write
//! 4. record the accepted action in the history
//!
//! Handlers return an optional status line for the presentation layer.

use std::sync::Arc;

use crate::core::{
    ActionKind, BetDirection, ConfigError, GameAction, GameError, GameRng, PlayerId, Result,
    SessionConfig, SessionState,
};
use crate::map::{Footprint, LocationId};
use crate::rumor::{RumorBoard, RumorProvider};

use super::betting::submit_bet;
use super::phase::Phase;
use super::settlement::{settle, PriceModel, SettlementReport, VolatilitySource};
use super::turn::TurnAdvance;

/// One local trading session.
pub struct Session {
    config: SessionConfig,
    state: SessionState,
    board: RumorBoard,
    market: Footprint,
    volatility: Box<dyn VolatilitySource>,
    report: Option<SettlementReport>,
}

impl Session {
    /// Start a session on an already assembled board.
    pub fn new(
        config: SessionConfig,
        board: RumorBoard,
        volatility: Box<dyn VolatilitySource>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let state = SessionState::from_config(&config);
        let market = config.map.market_footprint();
        tracing::info!(
            players = state.player_count(),
            spots = board.len(),
            rumors_required = config.rumors_required,
            "session started"
        );

        Ok(Self {
            config,
            state,
            board,
            market,
            volatility,
            report: None,
        })
    }

    /// Start a session whose volatility comes from the configured seed.
    pub fn with_seed(
        config: SessionConfig,
        board: RumorBoard,
    ) -> std::result::Result<Self, ConfigError> {
        let rng = GameRng::new(config.seed).for_context("volatility");
        Self::new(config, board, Box::new(rng))
    }

    /// Assemble the board from `provider` over the configured spots, then
    /// start a seeded session.
    pub fn from_provider(
        config: SessionConfig,
        provider: &mut dyn RumorProvider,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let board = RumorBoard::assemble(provider, &config.map.rumor_spots, config.map.token_size)?;
        Self::with_seed(config, board)
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn board(&self) -> &RumorBoard {
        &self.board
    }

    #[must_use]
    pub fn market(&self) -> Footprint {
        self.market
    }

    /// The results, once the market has cleared.
    #[must_use]
    pub fn report(&self) -> Option<&SettlementReport> {
        self.report.as_ref()
    }

    /// Action kinds the active player may send right now.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<ActionKind> {
        if self.state.is_ended() {
            return Vec::new();
        }

        let can_bet = self.state.active().can_bet();
        self.state
            .phase()
            .legal_kinds()
            .iter()
            .copied()
            .filter(|&kind| kind != ActionKind::StartBetting || can_bet)
            .collect()
    }

    /// Apply one action for the active player.
    ///
    /// A rejected action leaves the session exactly as it was.
    pub fn apply(&mut self, action: GameAction) -> Result<Option<String>> {
        if self.state.is_ended() {
            return Err(GameError::SessionEnded);
        }

        let kind = action.kind();
        let phase = self.state.phase();
        if !phase.permits(kind) {
            return Err(GameError::ActionNotAllowed { action: kind, phase });
        }

        let actor = self.state.active_player();
        let turn = self.state.turn_number();

        let result = match action {
            GameAction::Move { dx, dy } => Ok(self.move_active(dx, dy)),
            GameAction::CollectAt(location) => self.collect_at(location),
            GameAction::RequestStartBetting => self.start_betting(),
            GameAction::SubmitBet {
                direction,
                price_text,
                quantity_text,
            } => self.place_bet(direction, &price_text, &quantity_text),
            GameAction::RequestEndSession => Ok(self.end_session()),
        };

        match &result {
            Ok(_) => {
                self.state.record_action(actor, kind, turn);
                tracing::debug!(player = %actor, ?kind, "action applied");
            }
            Err(err) => tracing::debug!(player = %actor, ?kind, error = %err, "action rejected"),
        }
        result.map(Some)
    }

    fn move_active(&mut self, dx: i32, dy: i32) -> String {
        let step = self.config.map.step;
        let token = self.config.map.token_size;
        let target = self
            .state
            .active()
            .position()
            .offset(dx.saturating_mul(step), dy.saturating_mul(step));

        if !self.config.map.bounds().contains(&Footprint::new(target, token)) {
            return format!("{} cannot leave the map.", self.state.active().name());
        }
        self.state.active_mut().move_to(target);

        let mut message = self.turn_prompt();
        let footprint = self.state.active().footprint(token);
        if self.state.active().needs_rumors() {
            for location in self.board.overlapping(&footprint) {
                if self.is_collectible(location) {
                    message = self.collect_spot(location);
                    break;
                }
                message = "Already met this informant. Keep moving.".to_string();
            }
        }

        self.check_market().unwrap_or(message)
    }

    fn collect_at(&mut self, location: LocationId) -> Result<String> {
        let player = self.state.active_player();
        let spot = self
            .board
            .spot(location)
            .ok_or(GameError::UnknownLocation(location))?;

        let footprint = self.state.active().footprint(self.config.map.token_size);
        if !spot.footprint.overlaps(&footprint) {
            return Err(GameError::LocationOutOfReach { player, location });
        }
        if !self.state.active().needs_rumors() {
            return Err(GameError::RumorQuotaReached(player));
        }
        if !self.is_collectible(location) {
            return Err(GameError::RumorAlreadyCollected(location));
        }

        let message = self.collect_spot(location);
        Ok(self.check_market().unwrap_or(message))
    }

    fn start_betting(&mut self) -> Result<String> {
        let player = self.state.active_player();
        if !self.state.active().can_bet() {
            return Err(GameError::NotEligibleToBet(player));
        }

        self.state.set_phase(Phase::Betting);
        tracing::info!(%player, "betting opened");
        Ok("Choose price, quantity and BUY or SELL.".to_string())
    }

    fn place_bet(
        &mut self,
        direction: BetDirection,
        price_text: &str,
        quantity_text: &str,
    ) -> Result<String> {
        let player = self.state.active_player();
        let name = self.state.active().name().to_string();

        match submit_bet(&mut self.state, player, direction, price_text, quantity_text)? {
            TurnAdvance::Next(next) => {
                self.state.set_phase(Phase::Exploring);
                let next_name = self.player_name(next);
                Ok(format!("{} finished trading. {}'s turn.", name, next_name))
            }
            TurnAdvance::AllTraded => {
                let model = PriceModel::from_config(&self.config);
                let report = settle(&mut self.state, &model, self.volatility.as_mut())?;
                let message = format!(
                    "Every merchant has traded. The market closed at {}.",
                    report.display_price()
                );
                self.report = Some(report);
                Ok(message)
            }
        }
    }

    fn end_session(&mut self) -> String {
        self.state.end();
        tracing::info!(phase = ?self.state.phase(), "session ended");
        "Session closed.".to_string()
    }

    fn is_collectible(&self, location: LocationId) -> bool {
        let exhausted = self.config.exclusive_rumors && self.board.is_consumed(location);
        !exhausted && !self.state.active().has_collected_from(location)
    }

    /// Hand the rumor at `location` to the active player.
    fn collect_spot(&mut self, location: LocationId) -> String {
        let Some(spot) = self.board.spot(location) else {
            return self.turn_prompt();
        };
        let signal = Arc::clone(&spot.signal);

        if self.config.exclusive_rumors {
            self.board.consume(location);
        }
        let player = self.state.active_mut();
        player.collect(location, signal);

        let (count, required) = (player.collected_count(), player.rumors_required());
        tracing::debug!(player = %player.id(), %location, count, required, "rumor collected");

        if count >= required {
            "Every rumor gathered! Head to the market.".to_string()
        } else {
            format!("Met an informant! ({}/{}) Rumor noted.", count, required)
        }
    }

    /// Mark the active player eligible once they hold enough rumors and
    /// stand on the market.
    fn check_market(&mut self) -> Option<String> {
        let token = self.config.map.token_size;
        let player = self.state.active();
        if player.needs_rumors() || !player.footprint(token).overlaps(&self.market) {
            return None;
        }

        if !player.can_bet() {
            tracing::info!(player = %player.id(), "reached the market");
            self.state.active_mut().mark_eligible();
        }
        Some("Arrived at the market! Start trading when ready.".to_string())
    }

    fn turn_prompt(&self) -> String {
        format!("{}'s turn. Use the arrow keys to move.", self.state.active().name())
    }

    fn player_name(&self, id: PlayerId) -> String {
        self.state
            .player(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MapConfig, PlayerSetup};
    use crate::map::Position;
    use crate::rumor::RumorSignal;
    use crate::rules::FixedVolatility;

    // 400x400 map. Spot 0 sits right of A's start, spot 1 right of B's,
    // and the market covers [100, 200) x [0, 100).
    fn small_config() -> SessionConfig {
        SessionConfig::new()
            .with_players(vec![
                PlayerSetup::new("A", Position::new(0, 0)),
                PlayerSetup::new("B", Position::new(0, 100)),
            ])
            .with_rumors_required(1)
            .with_map(MapConfig {
                width: 400,
                height: 400,
                step: 50,
                token_size: 50,
                market: Position::new(100, 0),
                market_size: 100,
                rumor_spots: vec![Position::new(50, 0), Position::new(50, 100)],
            })
    }

    fn small_session(config: SessionConfig) -> Session {
        let board = RumorBoard::from_signals(
            config.map.token_size,
            vec![
                (config.map.rumor_spots[0], RumorSignal::increase("Floods upstream")),
                (config.map.rumor_spots[1], RumorSignal::decrease("Bumper harvest")),
            ],
        )
        .unwrap();
        Session::new(config, board, Box::new(FixedVolatility(1.0))).unwrap()
    }

    fn step(session: &mut Session, dx: i32, dy: i32) -> String {
        session.apply(GameAction::Move { dx, dy }).unwrap().unwrap()
    }

    #[test]
    fn test_move_collects_and_reaches_market() {
        let mut session = small_session(small_config());

        let msg = step(&mut session, 1, 0);
        assert_eq!(msg, "Every rumor gathered! Head to the market.");
        assert_eq!(session.state().active().collected_count(), 1);
        assert!(session.board().is_consumed(LocationId::new(0)));
        assert!(!session.state().active().can_bet());

        let msg = step(&mut session, 1, 0);
        assert!(msg.starts_with("Arrived at the market"));
        assert!(session.state().active().can_bet());
        assert!(session.legal_actions().contains(&ActionKind::StartBetting));
    }

    #[test]
    fn test_move_blocked_at_edge() {
        let mut session = small_session(small_config());

        let msg = step(&mut session, -1, 0);

        assert_eq!(msg, "A cannot leave the map.");
        assert_eq!(session.state().active().position(), Position::new(0, 0));
        assert_eq!(session.state().history().count(), 1);
    }

    #[test]
    fn test_extreme_moves_stay_on_map() {
        let mut session = small_session(small_config());

        for (dx, dy) in [(i32::MAX, 0), (i32::MIN, 0), (0, i32::MAX), (0, i32::MIN)] {
            let msg = step(&mut session, dx, dy);
            assert_eq!(msg, "A cannot leave the map.");
        }

        assert_eq!(session.state().active().position(), Position::new(0, 0));
        assert_eq!(session.state().active().collected_count(), 0);
        assert_eq!(session.state().history().count(), 4);
    }

    #[test]
    fn test_market_without_rumors_does_not_qualify() {
        let mut session = small_session(small_config().with_rumors_required(2));

        step(&mut session, 1, 0);
        let msg = step(&mut session, 1, 0);

        assert!(msg.starts_with("A's turn"));
        assert!(!session.state().active().can_bet());
        assert_eq!(
            session.apply(GameAction::RequestStartBetting),
            Err(GameError::NotEligibleToBet(PlayerId::new(0)))
        );
    }

    #[test]
    fn test_collect_at_errors() {
        let mut session = small_session(small_config().with_rumors_required(2));

        assert_eq!(
            session.apply(GameAction::CollectAt(LocationId::new(7))),
            Err(GameError::UnknownLocation(LocationId::new(7)))
        );
        assert_eq!(
            session.apply(GameAction::CollectAt(LocationId::new(0))),
            Err(GameError::LocationOutOfReach {
                player: PlayerId::new(0),
                location: LocationId::new(0)
            })
        );

        step(&mut session, 1, 0);
        assert_eq!(
            session.apply(GameAction::CollectAt(LocationId::new(0))),
            Err(GameError::RumorAlreadyCollected(LocationId::new(0)))
        );
        assert_eq!(session.state().active().collected_count(), 1);
    }

    #[test]
    fn test_collect_at_quota_reached() {
        let config = small_config().with_exclusive_rumors(false);
        let mut session = small_session(config);
        step(&mut session, 1, 0);

        assert_eq!(
            session.apply(GameAction::CollectAt(LocationId::new(0))),
            Err(GameError::RumorQuotaReached(PlayerId::new(0)))
        );
    }

    #[test]
    fn test_phase_gate() {
        let mut session = small_session(small_config());

        assert_eq!(
            session.apply(GameAction::bet(BetDirection::Buy, "100", "1")),
            Err(GameError::ActionNotAllowed {
                action: ActionKind::SubmitBet,
                phase: Phase::Exploring
            })
        );
        assert_eq!(session.legal_actions(), vec![
            ActionKind::Move,
            ActionKind::CollectAt,
            ActionKind::EndSession
        ]);
        assert_eq!(session.state().history().count(), 0);
    }

    #[test]
    fn test_bet_passes_turn_back_to_exploring() {
        let mut session = small_session(small_config());
        step(&mut session, 1, 0);
        step(&mut session, 1, 0);
        session.apply(GameAction::RequestStartBetting).unwrap();
        assert_eq!(session.state().phase(), Phase::Betting);
        assert!(session.apply(GameAction::Move { dx: 1, dy: 0 }).is_err());

        let msg = session
            .apply(GameAction::bet(BetDirection::Buy, "100", "10"))
            .unwrap()
            .unwrap();

        assert_eq!(msg, "A finished trading. B's turn.");
        assert_eq!(session.state().phase(), Phase::Exploring);
        assert_eq!(session.state().active_player(), PlayerId::new(1));

        let bet_record = session.state().history().last().cloned().unwrap();
        assert_eq!(bet_record.player, PlayerId::new(0));
        assert_eq!(bet_record.turn, 1);
    }

    #[test]
    fn test_invalid_bet_keeps_betting_open() {
        let mut session = small_session(small_config());
        step(&mut session, 1, 0);
        step(&mut session, 1, 0);
        session.apply(GameAction::RequestStartBetting).unwrap();
        let history = session.state().history().count();

        let err = session
            .apply(GameAction::bet(BetDirection::Buy, "-5", "10"))
            .unwrap_err();

        assert!(err.is_user_error());
        assert_eq!(session.state().phase(), Phase::Betting);
        assert_eq!(session.state().active_player(), PlayerId::new(0));
        assert_eq!(session.state().history().count(), history);
    }

    #[test]
    fn test_end_session_blocks_everything() {
        let mut session = small_session(small_config());

        session.apply(GameAction::RequestEndSession).unwrap();

        assert!(session.state().is_ended());
        assert!(session.legal_actions().is_empty());
        assert_eq!(
            session.apply(GameAction::Move { dx: 1, dy: 0 }),
            Err(GameError::SessionEnded)
        );
        assert_eq!(session.apply(GameAction::RequestEndSession), Err(GameError::SessionEnded));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = small_config().with_players(Vec::new());
        let board = RumorBoard::from_signals(50, Vec::new()).unwrap();
        assert!(Session::new(config, board, Box::new(FixedVolatility(1.0))).is_err());
    }
}
