//! NRM Proof of Concept: Seed Sweep
//!
//! Runs the reference configuration (14 agents at energy 1.0, 500 cycles)
//! under several seeds at once, one engine per worker thread. Engines
//! share nothing, so every seed yields its own trajectory; identical
//! outcomes across seeds would point at leaked state.
//!
//! Set `RUST_LOG=debug` to see per-cycle event counts.

use nrm::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SEEDS: [u64; 6] = [1, 2, 3, 5, 8, 13];
const CYCLES: u64 = 500;
const INITIAL_AGENTS: usize = 14;

/// What one seed produced.
#[derive(Debug, Serialize)]
struct SeedOutcome {
    seed: u64,
    cycles: u64,
    termination: Option<TerminationReason>,
    final_population: BTreeMap<Depth, usize>,
    stats: TrajectoryStats,
    mean_energy: f64,
    deepest_occupied: Option<Depth>,
}

fn run_seed(params: SimulationParameters, seed: u64) -> Result<SeedOutcome> {
    let mut engine = SimulationEngine::new(params, seed)?;
    engine.seed_population(0, INITIAL_AGENTS, 1.0)?;

    let report = engine.run(CYCLES);
    let metrics = PopulationMetrics::compute(engine.store());

    Ok(SeedOutcome {
        seed,
        cycles: engine.cycle(),
        termination: report.termination,
        final_population: engine.population_snapshot(),
        stats: TrajectoryStats::from_report(&report),
        mean_energy: metrics.mean_energy(),
        deepest_occupied: metrics.deepest_occupied,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║  NRM - Composition/Decomposition Seed Sweep         ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let params = SimulationParameters::default()
        .with_recharge(0.4)
        .with_reproduction(0.17, 30.0)
        .with_thresholds(0.99, 1.7);
    info!(seeds = SEEDS.len(), cycles = CYCLES, "starting sweep");

    let outcomes: Vec<(u64, std::thread::Result<Result<SeedOutcome>>)> =
        std::thread::scope(|scope| {
            let handles: Vec<_> = SEEDS
                .iter()
                .map(|&seed| {
                    let params = params.clone();
                    (seed, scope.spawn(move || run_seed(params, seed)))
                })
                .collect();
            handles
                .into_iter()
                .map(|(seed, handle)| (seed, handle.join()))
                .collect()
        });

    let mut finals = Vec::new();
    for (seed, joined) in outcomes {
        match joined {
            Ok(Ok(outcome)) => {
                finals.push(outcome.stats.final_population);
                match serde_json::to_string(&outcome) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("seed {seed}: could not serialize outcome: {e}"),
                }
            }
            Ok(Err(e)) => eprintln!("seed {seed}: {e}"),
            Err(_) => eprintln!("seed {seed}: worker panicked"),
        }
    }

    println!();
    let distinct = {
        let mut sorted = finals.clone();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.len()
    };
    println!(
        "── {} seeds, {} distinct final populations ──",
        finals.len(),
        distinct
    );
}
