//! Checkpoints: explicit save/restore of a running engine.
//!
//! A checkpoint captures everything that determines the rest of a run:
//! parameters, the cycle counter, the id counter, the RNG state and every
//! live agent. Restoring it and stepping yields the same trajectory the
//! original engine would have produced. The reproduction policy is code,
//! not data, so the caller supplies it again on restore.
//!
//! Nothing is written to disk implicitly. Callers that want files use
//! [`EngineCheckpoint::to_json`] and store the string themselves.

use crate::engine::SimulationEngine;
use crate::population::PopulationStore;
use nrm_agents::reproduction::ReproductionPolicy;
use nrm_core::agent::Agent;
use nrm_core::error::{CheckpointError, Result};
use nrm_core::params::SimulationParameters;
use nrm_core::types::{AgentId, Cycle};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Current checkpoint format version.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of an engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineCheckpoint {
    pub version: u32,
    pub params: SimulationParameters,
    pub seed: u64,
    pub cycle: Cycle,
    pub next_id: AgentId,
    pub rng: ChaCha8Rng,
    /// Name of the reproduction policy in use when the checkpoint was taken.
    #[serde(default)]
    pub policy: String,
    /// Live agents, shallowest depth first, ascending id within a depth.
    pub agents: Vec<Agent>,
}

impl EngineCheckpoint {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }
}

impl SimulationEngine {
    /// Capture the full engine state.
    pub fn checkpoint(&self) -> EngineCheckpoint {
        EngineCheckpoint {
            version: CHECKPOINT_VERSION,
            params: self.params.clone(),
            seed: self.seed,
            cycle: self.cycle,
            next_id: self.next_id,
            rng: self.rng.clone(),
            policy: self.reproduction.name().to_string(),
            agents: self.store.iter().cloned().collect(),
        }
    }

    /// Rebuild an engine from a checkpoint.
    pub fn restore(
        checkpoint: EngineCheckpoint,
        reproduction: Box<dyn ReproductionPolicy>,
    ) -> Result<Self> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: CHECKPOINT_VERSION,
                found: checkpoint.version,
            }
            .into());
        }
        checkpoint.params.validate()?;

        let mut store = PopulationStore::new(checkpoint.params.max_depth);
        for agent in checkpoint.agents {
            if agent.id() >= checkpoint.next_id {
                return Err(CheckpointError::Corrupt(format!(
                    "{} is not below the next id {}",
                    agent.id(),
                    checkpoint.next_id
                ))
                .into());
            }
            let depth = agent.depth();
            store.add(agent, depth)?;
        }

        if !checkpoint.policy.is_empty() && checkpoint.policy != reproduction.name() {
            debug!(
                saved = %checkpoint.policy,
                supplied = reproduction.name(),
                "restoring with a different reproduction policy"
            );
        }

        Ok(Self {
            params: checkpoint.params,
            store,
            rng: checkpoint.rng,
            reproduction,
            seed: checkpoint.seed,
            cycle: checkpoint.cycle,
            next_id: checkpoint.next_id,
        })
    }
}
