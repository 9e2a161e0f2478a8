//! Headless demo session
//!
//! Plays one full session with every merchant on autopilot and prints the
//! settlement report. Rumors are written locally from each spot's region,
//! so no text-generation service is needed.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use rumor_market::{
    parse_rumor_response, ActionKind, BetDirection, Footprint, GameAction, GameRng, Phase,
    ProviderError, RumorDraft, RumorProvider, Session, SessionConfig, SettlementReport,
    SignalTally, SpotContext,
};

/// Headless rumor market session
#[derive(Parser, Debug)]
#[command(name = "rumor-market-demo")]
#[command(about = "Play one autopiloted rumor market session and print the results")]
struct Args {
    /// Random seed for rumors and market volatility
    #[arg(long)]
    seed: Option<u64>,

    /// TOML session configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Upper bound on actions before the session is abandoned
    #[arg(long, default_value_t = 5000)]
    max_actions: usize,
}

const RUMOR_LINES: &[(&str, &str)] = &[
    ("The dam up north has cracked", "UP"),
    ("Locusts were seen past the river", "UP"),
    ("The army is buying grain", "UP"),
    ("A bumper harvest is coming in", "DOWN"),
    ("Ships from the south are unloading rice", "DOWN"),
    ("The granaries are overflowing", "DOWN"),
    ("Nothing much happening lately", "NONE"),
    ("The weather has been fair", "NONE"),
];

/// Writes a rumor for each spot from its region, answering in the same
/// JSON shape a text-generation service would.
struct RegionalProvider {
    rng: GameRng,
}

impl RumorProvider for RegionalProvider {
    fn rumor_for(&mut self, spot: &SpotContext) -> Result<RumorDraft, ProviderError> {
        let role = self
            .rng
            .choose(spot.region.roles())
            .ok_or_else(|| ProviderError::Unavailable("no roles for region".to_string()))?;
        let (line, influence) = self
            .rng
            .choose(RUMOR_LINES)
            .ok_or_else(|| ProviderError::Unavailable("no rumor lines".to_string()))?;

        tracing::debug!(location = %spot.location, role, hint = spot.region.hint(), "writing rumor");
        let response = json!({ "dialogue": format!("\"{}\"", line), "influence": influence });
        parse_rumor_response(&response.to_string())
    }
}

/// One movement step that brings `from` closer to overlapping `to`.
fn step_toward(from: Footprint, to: Footprint) -> Option<(i32, i32)> {
    if from.right() <= to.left() {
        Some((1, 0))
    } else if from.left() >= to.right() {
        Some((-1, 0))
    } else if from.bottom() <= to.top() {
        Some((0, 1))
    } else if from.top() >= to.bottom() {
        Some((0, -1))
    } else {
        None
    }
}

/// Pick the next action for the active player.
fn autopilot(session: &Session) -> GameAction {
    let state = session.state();
    let player = state.active();
    let token = session.config().map.token_size;
    let here = player.footprint(token);

    match state.phase() {
        Phase::Betting => {
            let tally = SignalTally::from_signals(player.collected_signals());
            let direction = if tally.up >= tally.down {
                BetDirection::Buy
            } else {
                BetDirection::Sell
            };
            return GameAction::bet(direction, "100", "10");
        }
        Phase::Settled => return GameAction::RequestEndSession,
        Phase::Exploring => {}
    }

    if session.legal_actions().contains(&ActionKind::StartBetting) {
        return GameAction::RequestStartBetting;
    }

    let target = if player.needs_rumors() {
        let exclusive = session.config().exclusive_rumors;
        let nearest = session
            .board()
            .spots()
            .iter()
            .filter(|spot| !(exclusive && session.board().is_consumed(spot.id)))
            .filter(|spot| !player.has_collected_from(spot.id))
            .min_by_key(|spot| {
                (spot.footprint.origin.x - here.origin.x).abs()
                    + (spot.footprint.origin.y - here.origin.y).abs()
            });
        match nearest {
            // Several spots under one token: only the first is taken on arrival.
            Some(spot) if spot.footprint.overlaps(&here) => return GameAction::CollectAt(spot.id),
            Some(spot) => Some(spot.footprint),
            None => None,
        }
    } else {
        Some(session.market())
    };

    match target.and_then(|target| step_toward(here, target)) {
        Some((dx, dy)) => GameAction::Move { dx, dy },
        None => GameAction::RequestEndSession,
    }
}

fn print_report(session: &Session, report: &SettlementReport) {
    println!("=== Market closed ===");
    println!("Final price:      {}", report.display_price());
    println!("Average bet:      {:.2}", report.average_bet_price);
    println!("Volatility:       {:.4}", report.market_volatility);
    println!(
        "Rumor factor:     {:.2} ({} up / {} down)",
        report.signal_factor, report.tally.up, report.tally.down
    );
    println!();
    for entry in &report.entries {
        println!(
            "{:<20} {:<16} profit {:>7}  funds {:>7}",
            entry.name,
            entry.bet.to_string(),
            entry.profit,
            entry.funds
        );
    }
    println!();
    println!("{} actions played", session.state().history().count());
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rumor_market=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    tracing::info!(seed = config.seed, "starting demo session");

    let mut provider = RegionalProvider {
        rng: GameRng::new(config.seed).for_context("rumors"),
    };
    let mut session = Session::from_provider(config, &mut provider)?;

    for _ in 0..args.max_actions {
        if session.state().is_ended() || session.report().is_some() {
            break;
        }
        let action = autopilot(&session);
        if let Err(err) = session.apply(action.clone()) {
            tracing::warn!(?action, error = %err, "autopilot action rejected");
            session.apply(GameAction::RequestEndSession)?;
        }
    }

    match session.report() {
        Some(report) if args.format == "json" => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        Some(report) => print_report(&session, report),
        None => println!("The session ended before the market cleared."),
    }

    Ok(())
}
