//! Simulation parameters.
//!
//! All fields are fixed for the duration of a run. Experiment drivers
//! build one of these (usually from `Default` plus a few `with_*`
//! overrides) and hand it to the engine, which validates it once at
//! construction.

use crate::error::{NrmError, Result};
use crate::resonance::ResonanceConstants;
use crate::types::Depth;
use serde::{Deserialize, Serialize};

/// Configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Energy gained per cycle at depth 0 (default: 0.4).
    pub recharge_base: f64,
    /// Per-agent birth probability before density damping (default: 0.17).
    pub reproduction_probability_base: f64,
    /// Carrying capacity K used to damp reproduction (default: 30.0).
    pub carrying_capacity: f64,
    /// Resonance at or above which a pair composes (default: 0.99).
    pub composition_threshold: f64,
    /// Energy above which an agent at depth >= 1 decomposes (default: 1.7).
    pub decomposition_threshold: f64,
    /// Energy lost per cycle at depth 0 (default: 0.1).
    pub decay_rate_base: f64,
    /// Fraction of the parents' summed energy kept by a composed child (default: 0.85).
    pub retention_factor: f64,
    /// Fraction of the parent's energy given to each decomposition child (default: 0.45).
    pub split_factor: f64,
    /// Deepest level agents may reach (default: 5).
    pub max_depth: Depth,
    /// Population ceiling; the run halts once reached (default: 4000).
    pub max_total_population: usize,
    /// Parents must hold strictly more than this to reproduce (default: 1.0).
    pub birth_energy_threshold: f64,
    /// Starting energy of a newborn (default: 0.5).
    pub offspring_energy: f64,
    /// Energy the parent pays per birth (default: 0.3).
    pub birth_cost: f64,
    /// Energy cap at depth 0 (default: 2.0).
    pub energy_cap_base: f64,
    /// Extra energy cap per depth level (default: 1.0).
    pub energy_cap_per_depth: f64,
    /// Recharge is divided by `1 + depth * attenuation` (default: 0.5).
    pub recharge_depth_attenuation: f64,
    /// Decay is multiplied by `1 + depth * factor` (default: 0.1).
    pub decay_depth_factor: f64,
    /// Constants wrapping energy and depth into phase space.
    pub resonance: ResonanceConstants,
    /// Attach lineage payloads to every agent the engine creates (default: false).
    pub track_lineage: bool,
    /// Maximum entries kept in a payload's pattern memory (default: 16).
    pub pattern_memory_len: usize,
    /// Most recent ancestors kept in a payload's ancestor set (default: 32).
    pub ancestor_window: usize,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            recharge_base: 0.4,
            reproduction_probability_base: 0.17,
            carrying_capacity: 30.0,
            composition_threshold: 0.99,
            decomposition_threshold: 1.7,
            decay_rate_base: 0.1,
            retention_factor: 0.85,
            split_factor: 0.45,
            max_depth: 5,
            max_total_population: 4000,
            birth_energy_threshold: 1.0,
            offspring_energy: 0.5,
            birth_cost: 0.3,
            energy_cap_base: 2.0,
            energy_cap_per_depth: 1.0,
            recharge_depth_attenuation: 0.5,
            decay_depth_factor: 0.1,
            resonance: ResonanceConstants::default(),
            track_lineage: false,
            pattern_memory_len: 16,
            ancestor_window: 32,
        }
    }
}

impl SimulationParameters {
    pub fn with_recharge(mut self, recharge_base: f64) -> Self {
        self.recharge_base = recharge_base;
        self
    }

    pub fn with_reproduction(mut self, probability: f64, carrying_capacity: f64) -> Self {
        self.reproduction_probability_base = probability;
        self.carrying_capacity = carrying_capacity;
        self
    }

    pub fn with_thresholds(mut self, composition: f64, decomposition: f64) -> Self {
        self.composition_threshold = composition;
        self.decomposition_threshold = decomposition;
        self
    }

    pub fn with_decay(mut self, decay_rate_base: f64) -> Self {
        self.decay_rate_base = decay_rate_base;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Depth) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_population(mut self, max_total_population: usize) -> Self {
        self.max_total_population = max_total_population;
        self
    }

    pub fn with_resonance(mut self, resonance: ResonanceConstants) -> Self {
        self.resonance = resonance;
        self
    }

    pub fn with_lineage(mut self, track_lineage: bool) -> Self {
        self.track_lineage = track_lineage;
        self
    }

    pub fn with_ancestor_window(mut self, ancestor_window: usize) -> Self {
        self.ancestor_window = ancestor_window;
        self
    }

    /// Energy ceiling for agents at `depth`.
    pub fn energy_cap(&self, depth: Depth) -> f64 {
        self.energy_cap_base + depth as f64 * self.energy_cap_per_depth
    }

    /// Energy gained per cycle at `depth`.
    pub fn recharge_at(&self, depth: Depth) -> f64 {
        self.recharge_base / (1.0 + depth as f64 * self.recharge_depth_attenuation)
    }

    /// Energy lost per cycle at `depth`.
    pub fn decay_at(&self, depth: Depth) -> f64 {
        self.decay_rate_base * (1.0 + depth as f64 * self.decay_depth_factor)
    }

    /// Birth probability after density damping against the current population.
    pub fn effective_reproduction_probability(&self, total_population: usize) -> f64 {
        self.reproduction_probability_base
            / (1.0 + total_population as f64 / self.carrying_capacity)
    }

    /// Check every field; the first violation is returned.
    pub fn validate(&self) -> Result<()> {
        non_negative("recharge_base", self.recharge_base)?;
        unit_interval("reproduction_probability_base", self.reproduction_probability_base)?;
        positive("carrying_capacity", self.carrying_capacity)?;
        unit_interval("composition_threshold", self.composition_threshold)?;
        non_negative("decomposition_threshold", self.decomposition_threshold)?;
        non_negative("decay_rate_base", self.decay_rate_base)?;
        positive("retention_factor", self.retention_factor)?;
        positive("split_factor", self.split_factor)?;
        non_negative("birth_energy_threshold", self.birth_energy_threshold)?;
        positive("offspring_energy", self.offspring_energy)?;
        non_negative("birth_cost", self.birth_cost)?;
        if self.birth_cost > self.birth_energy_threshold {
            return Err(NrmError::invalid_config(
                "birth_cost",
                self.birth_cost.to_string(),
                "must not exceed birth_energy_threshold",
            ));
        }
        positive("energy_cap_base", self.energy_cap_base)?;
        non_negative("energy_cap_per_depth", self.energy_cap_per_depth)?;
        non_negative("recharge_depth_attenuation", self.recharge_depth_attenuation)?;
        non_negative("decay_depth_factor", self.decay_depth_factor)?;

        if self.max_depth < 1 {
            return Err(NrmError::invalid_config(
                "max_depth",
                self.max_depth.to_string(),
                "must be at least 1",
            ));
        }
        if self.max_total_population < 1 {
            return Err(NrmError::invalid_config(
                "max_total_population",
                "0",
                "must be at least 1",
            ));
        }

        for (name, c) in [
            ("resonance.c1", self.resonance.c1),
            ("resonance.c2", self.resonance.c2),
            ("resonance.c3", self.resonance.c3),
        ] {
            if !c.is_finite() || c == 0.0 {
                return Err(NrmError::invalid_config(
                    name,
                    c.to_string(),
                    "must be finite and non-zero",
                ));
            }
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(NrmError::invalid_config(
            field,
            value.to_string(),
            "must be finite and non-negative",
        ));
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(NrmError::invalid_config(
            field,
            value.to_string(),
            "must be finite and greater than zero",
        ));
    }
    Ok(())
}

fn unit_interval(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(NrmError::out_of_range(field, 0.0, 1.0, value));
    }
    Ok(())
}
