//! NRM Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use nrm_core::prelude::*;
//! ```

pub use crate::agent::{Agent, AgentPayload};
pub use crate::params::SimulationParameters;
pub use crate::resonance::{phase_vector, resonance, ResonanceConstants};
pub use crate::types::{AgentId, Cycle, Depth, Position};

// Re-export error types
pub use crate::error::{AgentError, CheckpointError, ConfigError, NrmError, Result};
