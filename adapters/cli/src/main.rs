#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Dino Park scenario and narrates it.

mod scenario;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use dino_park_core::{Command, Event, TurnOutcome};
use dino_park_system_bootstrap::Bootstrap;
use dino_park_system_turn::{Objective, TurnDriver};
use dino_park_world::{apply, query};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::scenario::{Scenario, DEMO_SCENARIO};

/// Runs a dinosaur park until it thrives, dies out or the rounds run out.
#[derive(Parser, Debug)]
#[command(name = "dino-park")]
struct Args {
    /// Scenario file in TOML; the bundled demo park is used when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed overriding the scenario's.
    #[arg(long)]
    seed: Option<u64>,

    /// Round limit overriding the scenario's.
    #[arg(long)]
    rounds: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Entry point for the Dino Park command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::parse(DEMO_SCENARIO).context("bundled demo scenario is invalid")?,
    };
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        scenario.rounds = rounds;
    }

    let bootstrap = Bootstrap;
    let mut events = Vec::new();
    let (mut world, mut context) = scenario
        .boot(&bootstrap, &mut events)
        .context("failed to build the park")?;
    debug!(events = events.len(), "park seeded");
    narrate(&mut events);

    println!("{}", bootstrap.welcome_banner(&world));
    print!("{}", query::render(&world));
    info!(seed = context.seed(), rounds = scenario.rounds, "simulation starting");

    let objective = scenario
        .challenge
        .map_or(Objective::Sandbox, |challenge| Objective::Challenge {
            eco_point_goal: challenge.eco_point_goal,
            round_limit: challenge.round_limit,
        });
    let mut driver = TurnDriver::new(objective);

    let outcome = loop {
        let round = driver.rounds() + 1;
        if round > scenario.rounds {
            driver.request_quit();
        } else if let Some(raining) = scenario.weather.forecast(round, &world, &mut context) {
            apply(
                &mut world,
                &mut context,
                Command::SetRaining { raining },
                &mut events,
            );
        }
        let outcome = driver.run_round(&mut world, &mut context, &mut events);
        narrate(&mut events);
        if outcome != TurnOutcome::Continue {
            break outcome;
        }
    };

    print!("{}", query::render(&world));
    println!(
        "{} after {} rounds with {} eco points.",
        verdict(outcome),
        driver.rounds(),
        context.eco_points()
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn narrate(events: &mut Vec<Event>) {
    for event in events.drain(..) {
        match event {
            Event::ActionResolved { outcome, .. } => println!("{outcome}"),
            Event::RainChanged { raining: true } => println!("It starts to rain."),
            Event::RainChanged { raining: false } => println!("The rain stops."),
            Event::CommandRejected { reason } => debug!(?reason, "command rejected"),
            _ => {}
        }
    }
}

fn verdict(outcome: TurnOutcome) -> &'static str {
    match outcome {
        TurnOutcome::Win => "The park thrives",
        TurnOutcome::Loss => "The park is lost",
        TurnOutcome::Quit | TurnOutcome::Continue => "Simulation stopped",
    }
}
