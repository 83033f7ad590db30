//! Replay a JSON scenario through the engine and print the final state.
//!
//! A scenario names a map, who sits where and a list of transactions:
//!
//! ```json
//! {
//!   "map": { "name": "duel", "width": 6, "height": 6, "buildings": [...] },
//!   "seats": [{ "account": 1, "slot": 1 }, { "account": 2, "slot": 2 }],
//!   "transactions": [
//!     { "caller": 1, "seed": 7, "actions": [{ "Wait": { "unit": 1 } }, "EndTurn"] }
//!   ]
//! }
//! ```
//!
//! The first seat creates the game; the rest join in order.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};

use grid_tactics::{
    AccountId, Action, Engine, GameEvent, GameId, MapTemplate, PlayerId, RulesConfig, Transaction,
};

/// Replay a grid-tactics scenario
#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON)
    #[arg(required = true)]
    scenario: PathBuf,

    /// Rules config file (JSON); overrides the scenario's config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every event as a JSON line before the snapshot
    #[arg(short, long)]
    events: bool,

    /// Keep going after a rejected transaction
    #[arg(short, long)]
    keep_going: bool,

    /// Write a binary checkpoint of the final state
    #[arg(long)]
    checkpoint: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    /// Game name; defaults to the map's name.
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    config: RulesConfig,
    map: MapTemplate,
    seats: Vec<Seat>,
    #[serde(default)]
    test_mode: bool,
    #[serde(default)]
    transactions: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Seat {
    account: AccountId,
    slot: PlayerId,
}

#[derive(Debug, Deserialize)]
struct Step {
    caller: AccountId,
    #[serde(default)]
    seed: u64,
    actions: Vec<Action>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let scenario: Scenario = serde_json::from_str(&fs::read_to_string(&args.scenario)?)?;
    let config = match &args.config {
        Some(path) => RulesConfig::from_json(&fs::read_to_string(path)?)?,
        None => scenario.config,
    };

    let mut engine = Engine::new(config)?;
    let name = scenario.name.unwrap_or_else(|| scenario.map.name.clone());
    let map = engine.register_map(scenario.map)?;

    let (creator, joiners) = scenario
        .seats
        .split_first()
        .ok_or("scenario has no seats")?;
    let game = engine.create_game(creator.account, &name, map, creator.slot, scenario.test_mode)?;

    let mut events = Vec::new();
    for seat in joiners {
        events.extend(engine.join_game(seat.account, game, seat.slot)?);
    }

    for (index, step) in scenario.transactions.into_iter().enumerate() {
        let tx = Transaction {
            caller: step.caller,
            game,
            seed: step.seed,
            actions: step.actions,
        };
        match engine.submit(&tx) {
            Ok(produced) => events.extend(produced),
            Err(e) if args.keep_going => warn!(transaction = index, error = %e, "rejected, continuing"),
            Err(e) => return Err(format!("transaction {index} rejected: {e}").into()),
        }
    }

    if args.events {
        print_events(&events)?;
    }

    let snapshot = engine.snapshot(game).ok_or("game vanished from the store")?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if let Some(path) = &args.checkpoint {
        fs::write(path, engine.checkpoint(game)?)?;
        info!(path = %path.display(), "checkpoint written");
    }

    report(&engine, game);
    Ok(())
}

fn print_events(events: &[GameEvent]) -> Result<(), serde_json::Error> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

fn report(engine: &Engine, game: GameId) {
    let Some(state) = engine.game(game) else {
        return;
    };
    info!(
        game = %game,
        status = %state.status,
        round = state.round,
        winner = ?state.winner,
        actions = state.history.len(),
        "replay finished"
    );
}
