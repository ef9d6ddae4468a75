//! Checkpoint/restore continues a run exactly where it left off.

use nrm_agents::reproduction::{DensityDependent, PoissonBirths};
use nrm_core::error::{CheckpointError, NrmError};
use nrm_core::params::SimulationParameters;
use nrm_runtime::checkpoint::EngineCheckpoint;
use nrm_runtime::engine::SimulationEngine;
use nrm_runtime::summary::CycleSummary;

fn warmed_up(seed: u64, cycles: u64) -> SimulationEngine {
    let params = SimulationParameters::default().with_lineage(true);
    let mut engine = SimulationEngine::new(params, seed).unwrap();
    engine.seed_population(0, 14, 1.0).unwrap();
    engine.run(cycles);
    engine
}

fn continue_for(engine: &mut SimulationEngine, cycles: usize) -> Vec<CycleSummary> {
    (0..cycles).map(|_| engine.step()).collect()
}

#[test]
fn restored_engine_follows_the_same_trajectory() {
    let mut original = warmed_up(2024, 40);
    let checkpoint = original.checkpoint();
    let mut restored = SimulationEngine::restore(checkpoint, Box::new(DensityDependent)).unwrap();

    assert_eq!(
        continue_for(&mut original, 60),
        continue_for(&mut restored, 60)
    );
    for depth in 0..=original.params().max_depth {
        assert_eq!(original.agents_at(depth), restored.agents_at(depth));
    }
}

#[test]
fn json_checkpoint_is_exact() {
    let mut original = warmed_up(7, 25);
    let json = original.checkpoint().to_json_pretty().unwrap();
    let parsed = EngineCheckpoint::from_json(&json).unwrap();
    let mut restored = SimulationEngine::restore(parsed, Box::new(DensityDependent)).unwrap();

    assert_eq!(restored.cycle(), 25);
    assert_eq!(
        continue_for(&mut original, 50),
        continue_for(&mut restored, 50)
    );
}

#[test]
fn new_ids_do_not_collide_after_restore() {
    let original = warmed_up(3, 10);
    let checkpoint = original.checkpoint();
    let next = checkpoint.next_id;
    let mut restored = SimulationEngine::restore(checkpoint, Box::new(DensityDependent)).unwrap();
    let id = restored.insert_agent(0, 1.0, None).unwrap();
    assert_eq!(id, next);
}

#[test]
fn restoring_twice_yields_independent_engines() {
    let checkpoint = warmed_up(11, 20).checkpoint();
    let mut a = SimulationEngine::restore(checkpoint.clone(), Box::new(DensityDependent)).unwrap();
    let mut b = SimulationEngine::restore(checkpoint, Box::new(DensityDependent)).unwrap();

    a.run(30);
    assert_eq!(b.cycle(), 20);
    b.run(30);
    assert_eq!(a.population_snapshot(), b.population_snapshot());
}

#[test]
fn policy_can_change_on_restore() {
    let checkpoint = warmed_up(5, 15).checkpoint();
    let restored = SimulationEngine::restore(checkpoint, Box::new(PoissonBirths)).unwrap();
    assert_eq!(restored.reproduction_policy(), "poisson");
}

#[test]
fn version_mismatch_is_rejected() {
    let mut checkpoint = warmed_up(5, 5).checkpoint();
    checkpoint.version += 1;
    let found = checkpoint.version;
    match SimulationEngine::restore(checkpoint, Box::new(DensityDependent)) {
        Err(NrmError::Checkpoint(CheckpointError::VersionMismatch { found: f, .. })) => {
            assert_eq!(f, found)
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("restore accepted a foreign version"),
    }
}

#[test]
fn ancestor_sets_stay_bounded_over_long_runs() {
    let params = SimulationParameters::default()
        .with_lineage(true)
        .with_ancestor_window(6);
    let mut engine = SimulationEngine::new(params, 99).unwrap();
    engine.seed_population(0, 14, 1.0).unwrap();
    engine.run(120);

    let checkpoint = engine.checkpoint();
    for agent in &checkpoint.agents {
        if let Some(payload) = agent.payload() {
            assert!(
                payload.lineage_depth() <= 6,
                "{} remembers {} ancestors",
                agent.id(),
                payload.lineage_depth()
            );
        }
    }
}
