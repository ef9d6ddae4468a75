//! # NRM Runtime
//!
//! Population ownership and the cycle engine.
//!
//! The runtime holds the live population in a depth-indexed
//! [`PopulationStore`](population::PopulationStore) and drives it through
//! the five-phase cycle in [`SimulationEngine`](engine::SimulationEngine).
//! Every engine is an independent value: parallel experiments run one
//! engine per thread and never share state.
//!
//! ## Quick Start
//!
//! ```rust
//! use nrm_runtime::prelude::*;
//!
//! let mut engine = SimulationEngine::new(SimulationParameters::default(), 42).unwrap();
//! engine.seed_population(0, 14, 1.0).unwrap();
//!
//! let summary = engine.step();
//! assert_eq!(summary.cycle, 1);
//! assert!(summary.is_balanced());
//! ```

pub mod checkpoint;
pub mod engine;
pub mod metrics;
pub mod population;
pub mod prelude;
pub mod summary;
