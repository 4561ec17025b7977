//! combat_sim - Headless encounter runner for combat_core
//!
//! Usage: `combat_sim [seed] [encounter.toml]`
//!
//! Runs the bundled (or given) encounter with a scripted policy and prints
//! the combat log. Set `RUST_LOG=combat_core=debug` to trace engine events.

mod scenario;
mod simulation;

use combat_core::{CombatEngine, EncounterOutcome, SupportAbilityTable};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scenario::{Scenario, ScenarioError};
use simulation::Simulation;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
enum SimError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("Encounter rejected: {0}")]
    Validation(#[from] combat_core::ValidationError),
    #[error("Invalid seed '{0}'")]
    Seed(String),
}

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().map_err(|_| SimError::Seed(raw))?,
        None => 42,
    };
    let scenario = match args.next().map(PathBuf::from) {
        Some(path) => Scenario::load(&path)?,
        None => Scenario::bundled()?,
    };

    let mut simulation = Simulation::new(
        &scenario,
        CombatEngine::with_defaults(),
        SupportAbilityTable::with_defaults(),
    );
    let state = simulation
        .processor()
        .engine()
        .begin_encounter(&scenario.setup)?;

    tracing::info!(encounter = %scenario.name, seed, "starting encounter");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let report = simulation.run(state, &mut rng)?;

    println!("=== {} (seed {}) ===", scenario.name, seed);
    for entry in report.state.log() {
        println!("  {}", entry.summary());
    }
    println!();
    for combatant in report.state.combatants().values() {
        println!(
            "  {:<14} {:>4}/{:<4} {}",
            combatant.name,
            combatant.hp,
            combatant.max_hp(),
            if combatant.is_alive() { "" } else { "(down)" }
        );
    }

    let verdict = match report.outcome {
        EncounterOutcome::Victory => "Victory",
        EncounterOutcome::Defeat => "Defeat",
        EncounterOutcome::Ongoing => "Undecided",
    };
    println!("\n{} after {} rounds", verdict, report.rounds);
    Ok(())
}
