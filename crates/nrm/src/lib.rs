//! # NRM
//!
//! Composition/decomposition population engine for Nested Resonance
//! Memory experiments.
//!
//! Agents carry an energy level and sit at a depth. Every cycle they
//! recharge, reproduce, merge in resonating pairs into the next depth,
//! split back down when they grow too energetic, and decay. The engine
//! is fully determined by its parameters and a `u64` seed.
//!
//! ## Quick Start
//!
//! ```rust
//! use nrm::prelude::*;
//!
//! let params = SimulationParameters::default();
//! let mut engine = SimulationEngine::new(params, 7).unwrap();
//! engine.seed_population(0, 14, 1.0).unwrap();
//!
//! let report = engine.run(50);
//! let stats = TrajectoryStats::from_report(&report);
//! println!("peak population {}", stats.peak_population);
//!
//! for (depth, count) in engine.population_snapshot() {
//!     println!("depth {depth}: {count}");
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`nrm_core`] - Agents, parameters, the resonance function, errors
//! - [`nrm_agents`] - Reproduction policies and lineage inheritance
//! - [`nrm_runtime`] - Population store, cycle engine, checkpoints, metrics
//!
//! ## The Cycle
//!
//! | Phase | What It Does |
//! |-------|--------------|
//! | Recharge | Energy gain, attenuated by depth, capped per depth |
//! | Reproduce | Density-dependent births at depth 0 |
//! | Compose | Resonating pairs merge one level up |
//! | Decompose | Over-energized agents split one level down |
//! | Decay | Energy loss growing with depth; empty agents die |
//!
//! ## Resonance
//!
//! Energy and depth are wrapped onto a 3-component phase vector using
//! three transcendental constants (π, e, φ by default). Two agents
//! resonate by the cosine similarity of their phase vectors.
//!
//! ```rust
//! use nrm::prelude::*;
//!
//! let c = ResonanceConstants::default();
//! assert!((resonance(1.0, 0, 1.0, 0, &c) - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Checkpoints
//!
//! ```rust
//! use nrm::prelude::*;
//!
//! let mut engine = SimulationEngine::new(SimulationParameters::default(), 1).unwrap();
//! engine.seed_population(0, 10, 1.0).unwrap();
//! engine.step();
//!
//! let json = engine.checkpoint().to_json().unwrap();
//! let checkpoint = EngineCheckpoint::from_json(&json).unwrap();
//! let restored = SimulationEngine::restore(checkpoint, Box::new(DensityDependent)).unwrap();
//! assert_eq!(restored.cycle(), 1);
//! ```

// Re-export all subcrates
pub use nrm_agents as agents;
pub use nrm_core as core;
pub use nrm_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use nrm::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use nrm_core::agent::{Agent, AgentPayload};
    pub use nrm_core::params::SimulationParameters;
    pub use nrm_core::resonance::{phase_vector, resonance, ResonanceConstants};
    pub use nrm_core::types::{AgentId, Cycle, Depth, Position};

    // Error types
    pub use nrm_core::error::{AgentError, CheckpointError, ConfigError, NrmError, Result};

    // Reproduction
    pub use nrm_agents::reproduction::{
        DensityDependent, NoReproduction, PoissonBirths, ReproductionContext,
        ReproductionPolicy, TrophicReproduction,
    };

    // Runtime
    pub use nrm_runtime::checkpoint::EngineCheckpoint;
    pub use nrm_runtime::engine::SimulationEngine;
    pub use nrm_runtime::metrics::{PopulationMetrics, TrajectoryStats};
    pub use nrm_runtime::population::PopulationStore;
    pub use nrm_runtime::summary::{CycleSummary, RunReport, TerminationReason};
}
