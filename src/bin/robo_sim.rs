//! Headless round simulator.
//!
//! Loads a JSON scenario (config, map, robots, scripted programs), runs the
//! rounds and prints one `ROUND_RESULT:<json>` line per round.
//!
//! Usage: cargo run --bin robo-sim -- demos/factory.json [--deal 5] [--seed 7] [--events]

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use robo_engine::{
    Board, EngineConfig, EntityId, GameRng, GameState, MapSpec, PhaseScheduler, ProgramCard, ProgramDeck,
    ProgramQueue, RobotSpec, RoundReport, SelectedCards,
};

/// Run a robot board game scenario without a client
#[derive(Parser, Debug)]
#[command(name = "robo-sim")]
#[command(about = "Resolve scripted and dealt rounds of a scenario", long_about = None)]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Extra rounds to play after the scripted ones, with cards dealt from a shuffled deck
    #[arg(long, default_value_t = 0)]
    deal: u32,

    /// Seed for dealt rounds
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Also print the presentation timeline of each round
    #[arg(long)]
    events: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    config: EngineConfig,
    map: MapSpec,
    /// Explicit robots. When empty, `players` robots are placed on the spawn docks.
    #[serde(default)]
    robots: Vec<RobotSpec>,
    #[serde(default)]
    players: usize,
    /// Per round: entity id → selected cards.
    #[serde(default)]
    rounds: Vec<BTreeMap<u32, SelectedCards>>,
}

fn setup(scenario: &Scenario) -> robo_engine::Result<GameState> {
    let board = Board::from_spec(&scenario.map)?;
    if scenario.robots.is_empty() {
        return GameState::with_players(scenario.config.clone(), board, scenario.players);
    }

    scenario.config.check_player_count(scenario.robots.len())?;
    let mut state = GameState::new(scenario.config.clone(), board)?;
    for spec in &scenario.robots {
        state.add_robot(spec.clone())?;
    }
    Ok(state)
}

fn dealt_queue(state: &GameState, rng: &GameRng) -> robo_engine::Result<ProgramQueue> {
    let mut round_rng = rng.round_stream(state.round() + 1);
    let mut deck = ProgramDeck::shuffled(&mut round_rng);
    let registers = state.config().max_program_cards;

    let programs: Vec<(EntityId, Vec<ProgramCard>)> = state
        .robots()
        .filter(|r| !r.is_destroyed())
        .map(|r| {
            let hand = deck.deal_hand(r, state.config(), &mut round_rng);
            (r.id(), hand.into_iter().take(registers).collect())
        })
        .collect();

    let mut queue = ProgramQueue::new(state.config());
    for (entity, program) in programs {
        queue.submit(entity, program)?;
    }
    Ok(queue)
}

fn print_report(report: &RoundReport, events: bool) -> Result<(), Box<dyn std::error::Error>> {
    if events {
        for event in report.events.events() {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    println!("{}", report.result.to_message()?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let text = fs::read_to_string(&args.scenario)?;
    let scenario: Scenario = serde_json::from_str(&text)?;
    let mut state = setup(&scenario)?;
    log::info!(
        "loaded {} ({}x{}, {} robots)",
        args.scenario.display(),
        state.board().width(),
        state.board().height(),
        state.robots().count()
    );

    for selections in &scenario.rounds {
        let mut queue = ProgramQueue::new(state.config());
        for (entity, selection) in selections {
            queue.submit_selection(EntityId::new(*entity), selection)?;
        }
        let report = PhaseScheduler::run_round(&mut state, &queue)?;
        print_report(&report, args.events)?;
        if report.status.is_over() {
            return Ok(());
        }
    }

    let rng = GameRng::new(args.seed);
    if args.deal > 0 {
        log::info!("dealing {} rounds with seed {}", args.deal, rng.seed());
    }
    for _ in 0..args.deal {
        let queue = dealt_queue(&state, &rng)?;
        let report = PhaseScheduler::run_round(&mut state, &queue)?;
        print_report(&report, args.events)?;
        if report.status.is_over() {
            break;
        }
    }
    Ok(())
}
