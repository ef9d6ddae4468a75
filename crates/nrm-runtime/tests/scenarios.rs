//! End-to-end runs with known outcomes.

use nrm_core::params::SimulationParameters;
use nrm_core::resonance::resonance;
use nrm_runtime::engine::SimulationEngine;
use nrm_runtime::metrics::TrajectoryStats;
use nrm_runtime::summary::TerminationReason;

/// Reference configuration: 14 agents at energy 1.0, recharge 0.4,
/// birth probability 0.17, K = 30, thresholds 0.99 / 1.7.
#[test]
fn reference_run_stays_bounded_and_composes_early() {
    let params = SimulationParameters::default()
        .with_recharge(0.4)
        .with_reproduction(0.17, 30.0)
        .with_thresholds(0.99, 1.7);
    let ceiling = params.max_total_population;

    for seed in [0, 1, 2] {
        let mut engine = SimulationEngine::new(params.clone(), seed).unwrap();
        engine.seed_population(0, 14, 1.0).unwrap();

        let report = engine.run(500);
        let stats = TrajectoryStats::from_report(&report);

        assert_ne!(
            report.termination,
            Some(TerminationReason::PopulationOverflow),
            "seed {seed} diverged to the population ceiling"
        );
        assert!(
            stats.peak_population < ceiling,
            "seed {seed}: peak {} reached the ceiling",
            stats.peak_population
        );
        for summary in &report.summaries {
            assert!(
                summary.population[&0] < ceiling,
                "seed {seed}: depth 0 unbounded at cycle {}",
                summary.cycle
            );
        }

        let first = stats
            .first_composition_cycle
            .expect("no composition in 500 cycles");
        assert!(first <= 50, "seed {seed}: first composition at cycle {first}");
    }
}

#[test]
fn lone_agent_decays_to_extinction() {
    let decay = 0.05;
    let params = SimulationParameters::default()
        .with_recharge(0.0)
        .with_reproduction(0.0, 30.0)
        .with_decay(decay);
    let mut engine = SimulationEngine::new(params, 17).unwrap();
    engine.seed_population(0, 1, 1.0).unwrap();

    // 1.0 / 0.05 = 20 cycles of decay, plus one for rounding.
    let bound = (1.0 / decay).ceil() as u64 + 1;
    let report = engine.run(10 * bound);

    assert_eq!(report.termination, Some(TerminationReason::ExtinctionReached));
    assert!(
        report.cycles_completed <= bound,
        "extinct only after {} cycles",
        report.cycles_completed
    );
    assert!(
        report.cycles_completed >= bound - 2,
        "extinct too early, after {} cycles",
        report.cycles_completed
    );
    assert_eq!(report.total_deaths(), 1);
    assert_eq!(report.total_births(), 0);
    assert_eq!(engine.total_population(), 0);

    // The energy trajectory is linear while the agent lives.
    let mut probe = SimulationEngine::new(
        SimulationParameters::default()
            .with_recharge(0.0)
            .with_reproduction(0.0, 30.0)
            .with_decay(decay),
        17,
    )
    .unwrap();
    probe.seed_population(0, 1, 1.0).unwrap();
    for k in 1..=10 {
        probe.step();
        let energy = probe.agents_at(0)[0].energy();
        assert!(
            (energy - (1.0 - decay * k as f64)).abs() < 1e-9,
            "cycle {k}: energy {energy}"
        );
    }
}

fn boundary_engine(threshold: f64) -> SimulationEngine {
    let params = SimulationParameters::default()
        .with_recharge(0.0)
        .with_reproduction(0.0, 30.0)
        .with_decay(0.01)
        .with_thresholds(threshold, 100.0);
    let mut engine = SimulationEngine::new(params, 5).unwrap();
    engine.seed_population(0, 1, 1.0).unwrap();
    engine.seed_population(0, 1, 1.2).unwrap();
    engine
}

#[test]
fn similarity_exactly_at_threshold_composes() {
    let constants = SimulationParameters::default().resonance;
    let similarity = resonance(1.0, 0, 1.2, 0, &constants);
    assert!(
        (similarity - 0.839_514_687_309_201_4).abs() < 1e-12,
        "unexpected similarity {similarity}"
    );

    let mut engine = boundary_engine(similarity);
    let summary = engine.step();
    assert_eq!(summary.compositions, 1);
    assert_eq!(engine.population_snapshot()[&0], 0);

    let composed = engine.agents_at(1);
    assert_eq!(composed.len(), 1);
    // (1.0 + 1.2) * 0.85, less one cycle of depth-1 decay.
    let expected = 2.2 * 0.85 - 0.01 * 1.1;
    assert!((composed[0].energy() - expected).abs() < 1e-12);
}

#[test]
fn similarity_just_below_threshold_does_not_compose() {
    let constants = SimulationParameters::default().resonance;
    let similarity = resonance(1.0, 0, 1.2, 0, &constants);

    let mut engine = boundary_engine(similarity + 1e-9);
    let summary = engine.step();
    assert_eq!(summary.compositions, 0);
    assert_eq!(engine.population_snapshot()[&0], 2);
}
