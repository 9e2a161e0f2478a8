//! Full-session tests: exploring, betting and settlement driven through
//! `Session::apply`, the way the presentation layer drives them.

use proptest::prelude::*;

use rumor_market::{
    ActionKind, BetDirection, FixedVolatility, GameAction, GameError, LocationId, MapConfig,
    Phase, PlayerId, PlayerSetup, Position, PriceFloor, RumorBoard, RumorDraft, RumorSignal,
    ScriptedProvider, Session, SessionConfig, SignalDirection,
};
use rumor_market::rumor::FALLBACK_RUMOR_TEXT;

/// One lane per player: the player starts at the left edge of row `i`,
/// `rumors` spots follow to the right, and the market spans every row at
/// the end of the lanes.
fn lane_config(players: usize, rumors: usize) -> SessionConfig {
    let rows = players as i32;
    let lane_end = 50 * (rumors as i32 + 1);

    let seats = (0..rows)
        .map(|i| PlayerSetup::new(format!("Merchant {}", i), Position::new(0, 100 * i)))
        .collect();
    let spots = (0..rows)
        .flat_map(|i| (1..=rumors as i32).map(move |j| Position::new(50 * j, 100 * i)))
        .collect();

    SessionConfig::new()
        .with_players(seats)
        .with_rumors_required(rumors)
        .with_map(MapConfig {
            width: lane_end + 100 * rows,
            height: 100 * rows,
            step: 50,
            token_size: 50,
            market: Position::new(lane_end, 0),
            market_size: 100 * rows,
            rumor_spots: spots,
        })
}

/// Board where spot `j` of lane `i` carries `signal(i, j)`.
fn lane_board(
    config: &SessionConfig,
    rumors: usize,
    signal: impl Fn(usize, usize) -> RumorSignal,
) -> RumorBoard {
    let signals = config
        .map
        .rumor_spots
        .iter()
        .enumerate()
        .map(|(n, &position)| (position, signal(n / rumors, n % rumors)));
    RumorBoard::from_signals(config.map.token_size, signals.collect::<Vec<_>>()).unwrap()
}

/// Walk the active player down their lane and open betting.
fn walk_to_market(session: &mut Session, rumors: usize) {
    for _ in 0..=rumors {
        session.apply(GameAction::Move { dx: 1, dy: 0 }).unwrap();
    }
    session.apply(GameAction::RequestStartBetting).unwrap();
}

/// The three-merchant scenario: 10 increase and 11 decrease signals in
/// total, everyone bets at 100 for 10 units.
fn three_merchant_session() -> Session {
    let config = lane_config(3, 7);
    let board = lane_board(&config, 7, |lane, j| {
        let ups = if lane == 0 { 4 } else { 3 };
        if j < ups {
            RumorSignal::increase("Floods upstream")
        } else {
            RumorSignal::decrease("Bumper harvest")
        }
    });
    Session::new(config, board, Box::new(FixedVolatility(1.0))).unwrap()
}

#[test]
fn test_three_merchant_session() {
    let mut session = three_merchant_session();
    let directions = [BetDirection::Buy, BetDirection::Buy, BetDirection::Sell];

    for (seat, direction) in directions.into_iter().enumerate() {
        assert_eq!(session.state().active_player(), PlayerId::new(seat as u8));
        walk_to_market(&mut session, 7);
        assert_eq!(session.state().active().collected_count(), 7);
        session
            .apply(GameAction::bet(direction, "100", "10"))
            .unwrap();
    }

    let state = session.state();
    assert_eq!(state.phase(), Phase::Settled);
    assert_eq!(state.final_price(), Some(98));

    let profits: Vec<_> = state.players().map(|p| p.settlement_profit()).collect();
    assert_eq!(profits, vec![-20, -20, 20]);
    let funds: Vec<_> = state.players().map(|p| p.funds()).collect();
    assert_eq!(funds, vec![1980, 1980, 2020]);

    let report = session.report().unwrap();
    assert_eq!(report.tally.up, 10);
    assert_eq!(report.tally.down, 11);
    assert_eq!(report.display_price(), 98);
    assert_eq!(session.legal_actions(), vec![ActionKind::EndSession]);
}

#[test]
fn test_settled_session_only_accepts_end() {
    let mut session = three_merchant_session();
    for _ in 0..3 {
        walk_to_market(&mut session, 7);
        session
            .apply(GameAction::bet(BetDirection::Buy, "100", "1"))
            .unwrap();
    }

    assert_eq!(
        session.apply(GameAction::Move { dx: 1, dy: 0 }),
        Err(GameError::ActionNotAllowed {
            action: ActionKind::Move,
            phase: Phase::Settled
        })
    );
    assert_eq!(
        session.apply(GameAction::bet(BetDirection::Sell, "1", "1")),
        Err(GameError::ActionNotAllowed {
            action: ActionKind::SubmitBet,
            phase: Phase::Settled
        })
    );
    assert!(session.apply(GameAction::RequestEndSession).is_ok());
    assert!(session.state().is_ended());
}

#[test]
fn test_report_serializes() {
    let mut session = three_merchant_session();
    for _ in 0..3 {
        walk_to_market(&mut session, 7);
        session
            .apply(GameAction::bet(BetDirection::Sell, "120", "2"))
            .unwrap();
    }

    let json = serde_json::to_value(session.report().unwrap()).unwrap();
    // mean 120, factor 0.98
    assert_eq!(json["final_price"], 117);
    assert_eq!(json["entries"].as_array().unwrap().len(), 3);
    assert_eq!(json["entries"][0]["profit"], 6);
    assert_eq!(json["entries"][2]["name"], "Merchant 2");
}

#[test]
fn test_exclusive_rumors_are_gone_for_everyone() {
    let config = lane_config(2, 1);
    let board = lane_board(&config, 1, |_, _| RumorSignal::increase("Locusts"));
    let mut session = Session::new(config, board, Box::new(FixedVolatility(1.0))).unwrap();

    // Merchant 0 takes the spot in lane 0 and trades.
    walk_to_market(&mut session, 1);
    session
        .apply(GameAction::bet(BetDirection::Buy, "100", "1"))
        .unwrap();

    // Merchant 1 climbs into lane 0 and finds the informant gone.
    session.apply(GameAction::Move { dx: 0, dy: -1 }).unwrap();
    session.apply(GameAction::Move { dx: 0, dy: -1 }).unwrap();
    let msg = session
        .apply(GameAction::Move { dx: 1, dy: 0 })
        .unwrap()
        .unwrap();

    assert!(msg.starts_with("Already met"));
    assert_eq!(session.state().active().collected_count(), 0);
    assert_eq!(
        session.apply(GameAction::CollectAt(LocationId::new(0))),
        Err(GameError::RumorAlreadyCollected(LocationId::new(0)))
    );
}

#[test]
fn test_shared_rumors_count_for_every_holder() {
    let config = lane_config(2, 1).with_exclusive_rumors(false);
    let board = lane_board(&config, 1, |lane, _| {
        if lane == 0 {
            RumorSignal::increase("Locusts")
        } else {
            RumorSignal::neutral("Fair weather")
        }
    });
    let mut session = Session::new(config, board, Box::new(FixedVolatility(1.0))).unwrap();

    walk_to_market(&mut session, 1);
    session
        .apply(GameAction::bet(BetDirection::Buy, "100", "1"))
        .unwrap();

    // Merchant 1 takes the same lane 0 rumor instead of their own.
    session.apply(GameAction::Move { dx: 0, dy: -1 }).unwrap();
    session.apply(GameAction::Move { dx: 0, dy: -1 }).unwrap();
    let msg = session
        .apply(GameAction::Move { dx: 1, dy: 0 })
        .unwrap()
        .unwrap();
    assert!(msg.starts_with("Every rumor gathered"));
    session.apply(GameAction::Move { dx: 1, dy: 0 }).unwrap();
    session.apply(GameAction::RequestStartBetting).unwrap();
    session
        .apply(GameAction::bet(BetDirection::Buy, "100", "1"))
        .unwrap();

    let report = session.report().unwrap();
    assert_eq!(report.tally.up, 2);
    assert_eq!(report.final_price, 104);
}

#[test]
fn test_price_floor_zero_clamps_settlement() {
    let config = lane_config(1, 2)
        .with_signal_weight(0.75)
        .with_price_floor(PriceFloor::Zero);
    let board = lane_board(&config, 2, |_, _| RumorSignal::decrease("Granaries overflowing"));
    let mut session = Session::new(config, board, Box::new(FixedVolatility(1.0))).unwrap();

    walk_to_market(&mut session, 2);
    session
        .apply(GameAction::bet(BetDirection::Buy, "100", "3"))
        .unwrap();

    assert_eq!(session.state().final_price(), Some(0));
    assert_eq!(session.state().active().settlement_profit(), -300);
}

#[test]
fn test_seeded_sessions_replay_identically() {
    let play = || {
        let config = lane_config(2, 1).with_seed(1234);
        let board = lane_board(&config, 1, |_, _| RumorSignal::increase("Dam cracked"));
        let mut session = Session::with_seed(config, board).unwrap();
        for _ in 0..2 {
            walk_to_market(&mut session, 1);
            session
                .apply(GameAction::bet(BetDirection::Buy, "100", "5"))
                .unwrap();
        }
        session.report().cloned().unwrap()
    };

    let first = play();
    let second = play();

    assert_eq!(first, second);
    assert!((0.9..=1.1).contains(&first.market_volatility));
}

#[test]
fn test_provider_failures_become_neutral_spots() {
    let config = lane_config(1, 2);
    let mut provider = ScriptedProvider::new([RumorDraft::new(
        "Dam cracked",
        SignalDirection::Increase,
    )])
    .then_fail("service offline");

    let mut session = Session::from_provider(config, &mut provider).unwrap();

    let second = session.board().spot(LocationId::new(1)).unwrap();
    assert_eq!(second.signal.direction(), SignalDirection::Neutral);
    assert_eq!(second.signal.text(), FALLBACK_RUMOR_TEXT);

    walk_to_market(&mut session, 2);
    session
        .apply(GameAction::bet(BetDirection::Sell, "100", "1"))
        .unwrap();
    let report = session.report().unwrap();
    assert_eq!(report.tally.up, 1);
    assert_eq!(report.tally.neutral, 1);
}

#[test]
fn test_history_tracks_accepted_actions() {
    let mut session = three_merchant_session();

    session.apply(GameAction::Move { dx: 1, dy: 0 }).unwrap();
    let _ = session.apply(GameAction::RequestStartBetting);
    session.apply(GameAction::Move { dx: 1, dy: 0 }).unwrap();

    let kinds: Vec<_> = session.state().history().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Move, ActionKind::Move]);
    let sequences: Vec<_> = session.state().history().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![0, 1]);
}

proptest! {
    #[test]
    fn prop_rejected_bet_leaves_state_unchanged(
        price in prop_oneof!["-[0-9]{1,6}", "[a-z ]{0,6}", Just("0".to_string()), "[0-9]{1,3}\\.[0-9]"],
        quantity in "[0-9]{1,4}",
    ) {
        let mut session = three_merchant_session();
        walk_to_market(&mut session, 7);
        let before = serde_json::to_value(session.state()).unwrap();

        let result = session.apply(GameAction::bet(BetDirection::Buy, price, quantity));

        prop_assert!(result.is_err());
        prop_assert!(result.unwrap_err().is_user_error());
        prop_assert_eq!(serde_json::to_value(session.state()).unwrap(), before);
    }
}
