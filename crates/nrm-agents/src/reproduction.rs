//! Reproduction policies.
//!
//! Phase 2 of every cycle asks a policy which agents give birth. The
//! engine owns the bookkeeping (charging the parent, creating the newborn);
//! the policy only decides who reproduces, drawing from the engine's RNG
//! so the whole run stays reproducible from one seed.
//!
//! The base model reproduces at depth 0 only with a density-damped
//! per-agent probability. Multi-level variants plug in their own policy.

use nrm_core::agent::Agent;
use nrm_core::params::SimulationParameters;
use nrm_core::types::{AgentId, Depth};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Poisson};

/// What a policy may look at when choosing parents.
#[derive(Debug, Clone, Copy)]
pub struct ReproductionContext<'a> {
    /// Depth being processed.
    pub depth: Depth,
    /// Total live population at the start of the phase.
    pub total_population: usize,
    /// Live agents one level below `depth` (0 at depth 0).
    pub prey_available: usize,
    pub params: &'a SimulationParameters,
}

impl ReproductionContext<'_> {
    /// Whether a candidate has enough energy to pay for a birth.
    pub fn is_eligible(&self, agent: &Agent) -> bool {
        agent.energy() > self.params.birth_energy_threshold
    }
}

/// Trait for reproduction policies.
pub trait ReproductionPolicy: Send {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Depths this policy acts on, in processing order.
    fn depths(&self, _max_depth: Depth) -> Vec<Depth> {
        vec![0]
    }

    /// Choose the parents that give birth at `ctx.depth` this cycle.
    ///
    /// `candidates` is a snapshot of the depth bucket in ascending id
    /// order. Each returned id yields exactly one newborn; ids not found
    /// among the live agents are skipped by the engine.
    fn select_parents(
        &mut self,
        candidates: &[Agent],
        ctx: &ReproductionContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<AgentId>;
}

/// One Bernoulli draw per eligible agent at
/// `p = reproduction_probability_base / (1 + N / K)`.
#[derive(Debug, Clone, Default)]
pub struct DensityDependent;

impl ReproductionPolicy for DensityDependent {
    fn name(&self) -> &str {
        "density-dependent"
    }

    fn select_parents(
        &mut self,
        candidates: &[Agent],
        ctx: &ReproductionContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<AgentId> {
        let p = ctx
            .params
            .effective_reproduction_probability(ctx.total_population);
        candidates
            .iter()
            .filter(|a| ctx.is_eligible(a))
            .filter(|_| rng.gen::<f64>() < p)
            .map(|a| a.id())
            .collect()
    }
}

/// Draws the number of births from `Poisson(eligible * p)` and picks that
/// many distinct parents uniformly.
#[derive(Debug, Clone, Default)]
pub struct PoissonBirths;

impl ReproductionPolicy for PoissonBirths {
    fn name(&self) -> &str {
        "poisson"
    }

    fn select_parents(
        &mut self,
        candidates: &[Agent],
        ctx: &ReproductionContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<AgentId> {
        let mut eligible: Vec<AgentId> = candidates
            .iter()
            .filter(|a| ctx.is_eligible(a))
            .map(|a| a.id())
            .collect();
        let p = ctx
            .params
            .effective_reproduction_probability(ctx.total_population);
        let lambda = eligible.len() as f64 * p;
        if lambda <= 0.0 {
            return Vec::new();
        }

        let births = match Poisson::new(lambda) {
            Ok(dist) => {
                let draw: f64 = dist.sample(&mut *rng);
                (draw as usize).min(eligible.len())
            }
            Err(_) => 0,
        };

        let (chosen, _) = eligible.partial_shuffle(&mut *rng, births);
        let mut parents = chosen.to_vec();
        parents.sort();
        parents
    }
}

/// Per-level birth rates; levels above 0 only breed while the level below
/// has agents to feed on.
#[derive(Debug, Clone)]
pub struct TrophicReproduction {
    /// Base birth probability per depth; depths past the end never breed.
    pub level_rates: Vec<f64>,
}

impl TrophicReproduction {
    pub fn new(level_rates: Vec<f64>) -> Self {
        Self { level_rates }
    }
}

impl ReproductionPolicy for TrophicReproduction {
    fn name(&self) -> &str {
        "trophic"
    }

    fn depths(&self, max_depth: Depth) -> Vec<Depth> {
        (0..self.level_rates.len().min(max_depth + 1)).collect()
    }

    fn select_parents(
        &mut self,
        candidates: &[Agent],
        ctx: &ReproductionContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Vec<AgentId> {
        let rate = match self.level_rates.get(ctx.depth) {
            Some(&r) if r > 0.0 => r,
            _ => return Vec::new(),
        };
        let damping = 1.0 + ctx.total_population as f64 / ctx.params.carrying_capacity;
        let p = if ctx.depth == 0 {
            rate / damping
        } else {
            let prey = ctx.prey_available as f64;
            rate * prey / (prey + candidates.len() as f64).max(1.0) / damping
        };
        candidates
            .iter()
            .filter(|a| ctx.is_eligible(a))
            .filter(|_| rng.gen::<f64>() < p)
            .map(|a| a.id())
            .collect()
    }
}

/// Static population: nobody reproduces.
#[derive(Debug, Clone, Default)]
pub struct NoReproduction;

impl ReproductionPolicy for NoReproduction {
    fn name(&self) -> &str {
        "none"
    }

    fn depths(&self, _max_depth: Depth) -> Vec<Depth> {
        Vec::new()
    }

    fn select_parents(
        &mut self,
        _candidates: &[Agent],
        _ctx: &ReproductionContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Vec<AgentId> {
        Vec::new()
    }
}
