//! Agent: the unit that recharges, reproduces, composes and decomposes.
//!
//! An agent is a plain value: an identity, a depth and an energy level.
//! Identity and depth never change after creation; a composition or
//! decomposition destroys the parents and creates new agents at the
//! neighbouring depth. Only energy is mutated in place.
//!
//! Spatial, lineage and memory variants of the model share this one type
//! and carry their extra state in an optional [`AgentPayload`].

use crate::types::{AgentId, Depth, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A live agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    depth: Depth,
    energy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<AgentPayload>,
}

impl Agent {
    pub fn new(id: AgentId, depth: Depth, energy: f64) -> Self {
        Self {
            id,
            depth,
            energy,
            payload: None,
        }
    }

    /// Attach an extension payload.
    pub fn with_payload(mut self, payload: AgentPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy;
    }

    pub fn payload(&self) -> Option<&AgentPayload> {
        self.payload.as_ref()
    }

    /// Whether the agent still has energy to live on.
    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }
}

/// Optional extension state for spatial, lineage and memory variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPayload {
    /// Position in the spatial variant.
    #[serde(default)]
    pub position: Option<Position>,
    /// Every agent this one descends from (by reproduction, composition
    /// or decomposition).
    #[serde(default)]
    pub ancestors: BTreeSet<AgentId>,
    /// Resonance values recorded along the agent's composition history,
    /// oldest first.
    #[serde(default)]
    pub pattern_memory: Vec<f64>,
}

impl AgentPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Record a value, dropping the oldest entries beyond `capacity`.
    pub fn remember(&mut self, value: f64, capacity: usize) {
        self.pattern_memory.push(value);
        if self.pattern_memory.len() > capacity {
            let excess = self.pattern_memory.len() - capacity;
            self.pattern_memory.drain(..excess);
        }
    }

    /// Record an ancestor, keeping only the `window` most recent ones.
    ///
    /// Ids are handed out in creation order, so the most recent ancestors
    /// are the largest ids.
    pub fn remember_ancestor(&mut self, id: AgentId, window: usize) {
        self.ancestors.insert(id);
        self.trim_ancestors(window);
    }

    /// Drop the oldest ancestors beyond `window`.
    pub fn trim_ancestors(&mut self, window: usize) {
        while self.ancestors.len() > window {
            self.ancestors.pop_first();
        }
    }

    /// Number of recorded ancestors.
    pub fn lineage_depth(&self) -> usize {
        self.ancestors.len()
    }
}
