//! PopulationStore: depth-indexed ownership of every live agent.
//!
//! The store is the only owner of agent lifetime within a run. Each depth
//! bucket keeps its agents ordered by id, which is creation order, so any
//! iteration over the store is deterministic.
//!
//! Reads hand out snapshots. A phase takes its snapshot once at the start
//! and mutates the store freely while walking it; agents created during
//! the phase are never picked up by the same walk.

use nrm_core::agent::Agent;
use nrm_core::error::{AgentError, NrmError, Result};
use nrm_core::types::{AgentId, Depth};
use std::collections::BTreeMap;

/// Depth-indexed container of live agents.
#[derive(Debug, Clone)]
pub struct PopulationStore {
    buckets: Vec<BTreeMap<AgentId, Agent>>,
    total: usize,
}

impl PopulationStore {
    /// Create an empty store with buckets for depths `0..=max_depth`.
    pub fn new(max_depth: Depth) -> Self {
        Self {
            buckets: vec![BTreeMap::new(); max_depth + 1],
            total: 0,
        }
    }

    /// Deepest depth this store accepts.
    pub fn max_depth(&self) -> Depth {
        self.buckets.len() - 1
    }

    fn check_depth(&self, depth: Depth) -> Result<()> {
        if depth > self.max_depth() {
            return Err(AgentError::DepthOutOfRange {
                depth,
                max_depth: self.max_depth(),
            }
            .into());
        }
        Ok(())
    }

    /// Insert an agent into the bucket for `depth`.
    pub fn add(&mut self, agent: Agent, depth: Depth) -> Result<()> {
        self.check_depth(depth)?;
        if agent.depth() != depth {
            return Err(AgentError::DepthMismatch {
                id: agent.id(),
                agent_depth: agent.depth(),
                bucket: depth,
            }
            .into());
        }
        if !agent.energy().is_finite() || agent.energy() <= 0.0 {
            return Err(AgentError::InvalidEnergy(agent.energy()).into());
        }
        if self.contains(agent.id()) {
            return Err(AgentError::AlreadyExists(agent.id()).into());
        }
        self.buckets[depth].insert(agent.id(), agent);
        self.total += 1;
        Ok(())
    }

    /// File an agent the engine just created under its own depth.
    pub(crate) fn insert(&mut self, agent: Agent) {
        debug_assert!(agent.depth() <= self.max_depth());
        debug_assert!(!self.contains(agent.id()));
        self.buckets[agent.depth()].insert(agent.id(), agent);
        self.total += 1;
    }

    /// Remove an agent, signalling if it is not at `depth`.
    pub fn remove(&mut self, id: AgentId, depth: Depth) -> Result<Agent> {
        self.check_depth(depth)?;
        self.take(id, depth)
            .ok_or_else(|| NrmError::agent_not_found(id, depth))
    }

    /// Remove an agent if present. Removing an absent agent is a no-op.
    pub fn take(&mut self, id: AgentId, depth: Depth) -> Option<Agent> {
        let removed = self.buckets.get_mut(depth)?.remove(&id);
        if removed.is_some() {
            self.total -= 1;
        }
        removed
    }

    /// Copy of the agents at `depth`, in ascending id order.
    pub fn agents_at(&self, depth: Depth) -> Vec<Agent> {
        self.buckets
            .get(depth)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Ids at `depth`, in ascending id order.
    pub fn ids_at(&self, depth: Depth) -> Vec<AgentId> {
        self.buckets
            .get(depth)
            .map(|bucket| bucket.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, id: AgentId, depth: Depth) -> Option<&Agent> {
        self.buckets.get(depth)?.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId, depth: Depth) -> Option<&mut Agent> {
        self.buckets.get_mut(depth)?.get_mut(&id)
    }

    /// Whether the agent is live at any depth.
    pub fn contains(&self, id: AgentId) -> bool {
        self.buckets.iter().any(|bucket| bucket.contains_key(&id))
    }

    /// Number of agents at `depth`.
    pub fn count_at(&self, depth: Depth) -> usize {
        self.buckets.get(depth).map_or(0, |bucket| bucket.len())
    }

    /// Sum of all bucket sizes.
    pub fn total_count(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Agent count per depth, including empty depths.
    pub fn counts(&self) -> BTreeMap<Depth, usize> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(depth, bucket)| (depth, bucket.len()))
            .collect()
    }

    /// Apply `f` to every agent at `depth` in id order.
    pub fn for_each_at_mut<F>(&mut self, depth: Depth, mut f: F)
    where
        F: FnMut(&mut Agent),
    {
        if let Some(bucket) = self.buckets.get_mut(depth) {
            bucket.values_mut().for_each(|agent| f(agent));
        }
    }

    /// Drop every agent at `depth` for which `keep` returns false.
    /// Returns how many were removed.
    pub fn retain_at<F>(&mut self, depth: Depth, mut keep: F) -> usize
    where
        F: FnMut(&Agent) -> bool,
    {
        let Some(bucket) = self.buckets.get_mut(depth) else {
            return 0;
        };
        let before = bucket.len();
        bucket.retain(|_, agent| keep(agent));
        let removed = before - bucket.len();
        self.total -= removed;
        removed
    }

    /// Every live agent, shallowest depth first.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.buckets.iter().flat_map(|bucket| bucket.values())
    }
}
