//! SimulationEngine: the composition/decomposition cycle.
//!
//! The engine owns one population store, one seeded RNG and one
//! reproduction policy. Nothing is shared between engines, so separate
//! runs never influence each other.
//!
//! Each cycle, in this order:
//! 1. Recharge: every agent gains `recharge_base / (1 + depth * 0.5)`, up to its depth's cap
//! 2. Reproduce: the policy picks parents; each pays the birth cost for one newborn
//! 3. Compose: per depth, shuffle, then merge resonating adjacent pairs into depth + 1
//! 4. Decompose: agents at depth >= 1 above the threshold split into two at depth - 1
//! 5. Decay: every agent loses `decay_rate_base * (1 + depth * 0.1)`; energy <= 0 dies
//!
//! Phases 3 and 4 snapshot every depth before touching any of them, so
//! an agent created by a phase is never processed again by that phase.
//! RNG draws happen only in phases 2 and 3, in a fixed order, so a seed
//! fully determines the trajectory.

use crate::population::PopulationStore;
use crate::summary::{CycleSummary, RunReport, TerminationReason};
use nrm_agents::lineage;
use nrm_agents::reproduction::{DensityDependent, ReproductionContext, ReproductionPolicy};
use nrm_core::agent::{Agent, AgentPayload};
use nrm_core::error::{AgentError, Result};
use nrm_core::params::SimulationParameters;
use nrm_core::resonance::resonance;
use nrm_core::types::{AgentId, Cycle, Depth};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

/// Event counts accumulated while a cycle runs.
#[derive(Debug, Default)]
struct CycleCounts {
    births: usize,
    compositions: usize,
    decompositions: usize,
    deaths: usize,
}

/// Drives one simulation run.
pub struct SimulationEngine {
    pub(crate) params: SimulationParameters,
    pub(crate) store: PopulationStore,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) reproduction: Box<dyn ReproductionPolicy>,
    pub(crate) seed: u64,
    pub(crate) cycle: Cycle,
    pub(crate) next_id: AgentId,
}

impl SimulationEngine {
    /// Create an engine with the base density-dependent reproduction rule.
    pub fn new(params: SimulationParameters, rng_seed: u64) -> Result<Self> {
        Self::with_policy(params, rng_seed, Box::new(DensityDependent))
    }

    /// Create an engine with a custom reproduction policy.
    pub fn with_policy(
        params: SimulationParameters,
        rng_seed: u64,
        reproduction: Box<dyn ReproductionPolicy>,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            store: PopulationStore::new(params.max_depth),
            params,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            reproduction,
            seed: rng_seed,
            cycle: 0,
            next_id: AgentId(0),
        })
    }

    /// Add `count` agents at `depth`, all with `initial_energy`.
    pub fn seed_population(
        &mut self,
        depth: Depth,
        count: usize,
        initial_energy: f64,
    ) -> Result<Vec<AgentId>> {
        (0..count)
            .map(|_| self.insert_agent(depth, initial_energy, None))
            .collect()
    }

    /// Add a single agent, optionally carrying a payload.
    pub fn insert_agent(
        &mut self,
        depth: Depth,
        energy: f64,
        payload: Option<AgentPayload>,
    ) -> Result<AgentId> {
        if !energy.is_finite() || energy <= 0.0 {
            return Err(AgentError::InvalidEnergy(energy).into());
        }
        let mut agent = Agent::new(self.next_id, depth, energy);
        if let Some(payload) = payload {
            agent = agent.with_payload(payload);
        }
        let id = agent.id();
        self.store.add(agent, depth)?;
        self.next_id = self.next_id.next();
        Ok(id)
    }

    /// Why the run cannot continue, if it cannot.
    pub fn termination(&self) -> Option<TerminationReason> {
        let total = self.store.total_count();
        if total == 0 {
            Some(TerminationReason::ExtinctionReached)
        } else if total >= self.params.max_total_population {
            Some(TerminationReason::PopulationOverflow)
        } else {
            None
        }
    }

    /// Advance exactly one cycle.
    ///
    /// If the population is extinct or at the ceiling no phase runs and
    /// the summary carries the termination reason with all-zero counts.
    pub fn step(&mut self) -> CycleSummary {
        let population_before = self.store.total_count();

        if let Some(reason) = self.termination() {
            return CycleSummary {
                cycle: self.cycle,
                population_before,
                births: 0,
                compositions: 0,
                decompositions: 0,
                deaths: 0,
                population: self.store.counts(),
                total_population: population_before,
                termination: Some(reason),
            };
        }

        let mut counts = CycleCounts::default();

        // Phase 1: Recharge
        self.recharge();

        // Phase 2: Reproduction
        counts.births = self.reproduce();

        // Phase 3: Composition
        counts.compositions = self.compose();

        // Phase 4: Decomposition
        counts.decompositions = self.decompose();

        // Phase 5: Decay
        counts.deaths = self.decay();

        self.cycle += 1;
        let total_population = self.store.total_count();

        debug!(
            cycle = self.cycle,
            births = counts.births,
            compositions = counts.compositions,
            decompositions = counts.decompositions,
            deaths = counts.deaths,
            population = total_population,
            "cycle complete"
        );

        CycleSummary {
            cycle: self.cycle,
            population_before,
            births: counts.births,
            compositions: counts.compositions,
            decompositions: counts.decompositions,
            deaths: counts.deaths,
            population: self.store.counts(),
            total_population,
            termination: None,
        }
    }

    /// Step up to `max_cycles` times, stopping early on extinction or overflow.
    pub fn run(&mut self, max_cycles: u64) -> RunReport {
        let mut summaries = Vec::new();
        let mut termination = None;

        for _ in 0..max_cycles {
            let summary = self.step();
            if let Some(reason) = summary.termination {
                info!(
                    cycle = self.cycle,
                    population = summary.total_population,
                    reason = %reason,
                    "run halted"
                );
                termination = Some(reason);
                break;
            }
            summaries.push(summary);
        }

        if termination.is_none() {
            info!(
                cycle = self.cycle,
                population = self.store.total_count(),
                "cycle budget exhausted"
            );
        }

        RunReport {
            cycles_completed: summaries.len() as u64,
            summaries,
            termination,
        }
    }

    fn spawn(&mut self, depth: Depth, energy: f64, payload: Option<AgentPayload>) -> AgentId {
        let mut agent = Agent::new(self.next_id, depth, energy);
        if let Some(payload) = payload {
            agent = agent.with_payload(payload);
        }
        let id = agent.id();
        self.next_id = self.next_id.next();
        self.store.insert(agent);
        id
    }

    fn recharge(&mut self) {
        for depth in 0..=self.params.max_depth {
            let gain = self.params.recharge_at(depth);
            let cap = self.params.energy_cap(depth);
            self.store
                .for_each_at_mut(depth, |agent| agent.set_energy((agent.energy() + gain).min(cap)));
        }
    }

    fn reproduce(&mut self) -> usize {
        let total_population = self.store.total_count();
        let max_depth = self.params.max_depth;
        let depths = self.reproduction.depths(max_depth);
        let mut births = 0;

        for depth in depths.into_iter().filter(|&d| d <= max_depth) {
            let candidates = self.store.agents_at(depth);
            if candidates.is_empty() {
                continue;
            }
            let ctx = ReproductionContext {
                depth,
                total_population,
                prey_available: if depth > 0 {
                    self.store.count_at(depth - 1)
                } else {
                    0
                },
                params: &self.params,
            };
            let parents = self
                .reproduction
                .select_parents(&candidates, &ctx, &mut self.rng);

            for parent_id in parents {
                let birth_cost = self.params.birth_cost;
                let track = self.params.track_lineage;
                let window = self.params.ancestor_window;
                let payload = match self.store.get_mut(parent_id, depth) {
                    Some(parent) => {
                        parent.set_energy(parent.energy() - birth_cost);
                        if track {
                            Some(lineage::offspring_payload(parent, window))
                        } else {
                            None
                        }
                    }
                    None => {
                        warn!(
                            policy = self.reproduction.name(),
                            parent = %parent_id,
                            depth,
                            "selected parent is not live, skipping birth"
                        );
                        continue;
                    }
                };
                let energy = self.params.offspring_energy.min(self.params.energy_cap(depth));
                self.spawn(depth, energy, payload);
                births += 1;
            }
        }
        births
    }

    fn compose(&mut self) -> usize {
        let snapshots: Vec<Vec<AgentId>> = (0..self.params.max_depth)
            .map(|depth| self.store.ids_at(depth))
            .collect();
        let mut compositions = 0;

        for (depth, mut ids) in snapshots.into_iter().enumerate() {
            ids.shuffle(&mut self.rng);

            let store = &self.store;
            let params = &self.params;
            let pairs = adjacent_pairs(&ids, |a, b| {
                let energy_a = store.get(a, depth)?.energy();
                let energy_b = store.get(b, depth)?.energy();
                let similarity = resonance(energy_a, depth, energy_b, depth, &params.resonance);
                (similarity >= params.composition_threshold).then_some(similarity)
            });

            for (a, b, similarity) in pairs {
                let Some(parent_a) = self.store.take(a, depth) else {
                    continue;
                };
                let Some(parent_b) = self.store.take(b, depth) else {
                    self.store.insert(parent_a);
                    continue;
                };
                let merged = parent_a.energy() + parent_b.energy();
                let energy =
                    (merged * self.params.retention_factor).min(self.params.energy_cap(depth + 1));
                let payload = self.params.track_lineage.then(|| {
                    lineage::composed_payload(
                        &parent_a,
                        &parent_b,
                        similarity,
                        self.params.pattern_memory_len,
                        self.params.ancestor_window,
                    )
                });
                let child = self.spawn(depth + 1, energy, payload);
                trace!(%a, %b, %child, depth, similarity, energy, "composed");
                compositions += 1;
            }
        }
        compositions
    }

    fn decompose(&mut self) -> usize {
        let snapshots: Vec<(Depth, Vec<Agent>)> = (1..=self.params.max_depth)
            .map(|depth| (depth, self.store.agents_at(depth)))
            .collect();
        let mut decompositions = 0;

        for (depth, agents) in snapshots {
            for agent in agents {
                if agent.energy() <= self.params.decomposition_threshold {
                    continue;
                }
                let Some(parent) = self.store.take(agent.id(), depth) else {
                    continue;
                };
                let energy = (parent.energy() * self.params.split_factor)
                    .min(self.params.energy_cap(depth - 1));
                let window = self.params.ancestor_window;
                let payload = self
                    .params
                    .track_lineage
                    .then(|| lineage::split_payload(&parent, window));
                let first = self.spawn(depth - 1, energy, payload.clone());
                let second = self.spawn(depth - 1, energy, payload);
                trace!(parent = %parent.id(), %first, %second, depth, energy, "decomposed");
                decompositions += 1;
            }
        }
        decompositions
    }

    fn decay(&mut self) -> usize {
        let mut deaths = 0;
        for depth in 0..=self.params.max_depth {
            let loss = self.params.decay_at(depth);
            self.store
                .for_each_at_mut(depth, |agent| agent.set_energy(agent.energy() - loss));
            deaths += self.store.retain_at(depth, |agent| agent.energy() > 0.0);
        }
        deaths
    }

    /// Agent count per depth, including empty depths.
    pub fn population_snapshot(&self) -> BTreeMap<Depth, usize> {
        self.store.counts()
    }

    /// Read-only copies of the agents at `depth`.
    pub fn agents_at(&self, depth: Depth) -> Vec<Agent> {
        self.store.agents_at(depth)
    }

    pub fn total_population(&self) -> usize {
        self.store.total_count()
    }

    pub fn store(&self) -> &PopulationStore {
        &self.store
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Number of completed cycles.
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Seed the engine was constructed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Name of the active reproduction policy.
    pub fn reproduction_policy(&self) -> &str {
        self.reproduction.name()
    }
}

/// Sequential pairing over an already shuffled id list.
///
/// Looks at neighbours `(ids[i], ids[i + 1])`. When `resonates` returns a
/// similarity the pair merges and the scan moves past both; otherwise it
/// moves on by one. Agents are only ever paired with a neighbour.
pub(crate) fn adjacent_pairs<F>(
    ids: &[AgentId],
    mut resonates: F,
) -> Vec<(AgentId, AgentId, f64)>
where
    F: FnMut(AgentId, AgentId) -> Option<f64>,
{
    let mut pairs = Vec::new();
    let mut i = 0;
    while i + 1 < ids.len() {
        let (a, b) = (ids[i], ids[i + 1]);
        match resonates(a, b) {
            Some(similarity) => {
                pairs.push((a, b, similarity));
                i += 2;
            }
            None => i += 1,
        }
    }
    pairs
}
