//! NRM Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use nrm_runtime::prelude::*;
//! ```

// Re-export engine
pub use crate::engine::SimulationEngine;
pub use crate::population::PopulationStore;
pub use crate::summary::{CycleSummary, RunReport, TerminationReason};

// Re-export checkpoints
pub use crate::checkpoint::{EngineCheckpoint, CHECKPOINT_VERSION};

// Re-export metrics
pub use crate::metrics::{DepthMetrics, PopulationMetrics, TrajectoryStats};

// Re-export from agents and core
pub use nrm_agents::prelude::*;
pub use nrm_core::prelude::*;
