//! Population metrics for experiment analysis.
//!
//! Two views:
//! - [`PopulationMetrics`]: energy statistics of the live population right now
//! - [`TrajectoryStats`]: aggregates over the summaries of a finished run

use crate::population::PopulationStore;
use crate::summary::{RunReport, TerminationReason};
use nrm_core::types::{Cycle, Depth};
use serde::Serialize;

/// Energy statistics for one depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthMetrics {
    pub depth: Depth,
    pub count: usize,
    pub total_energy: f64,
    /// 0.0 for an empty depth.
    pub mean_energy: f64,
    pub min_energy: f64,
    pub max_energy: f64,
}

impl DepthMetrics {
    fn compute(store: &PopulationStore, depth: Depth) -> Self {
        let energies: Vec<f64> = store.agents_at(depth).iter().map(|a| a.energy()).collect();
        if energies.is_empty() {
            return Self {
                depth,
                count: 0,
                total_energy: 0.0,
                mean_energy: 0.0,
                min_energy: 0.0,
                max_energy: 0.0,
            };
        }
        let total: f64 = energies.iter().sum();
        Self {
            depth,
            count: energies.len(),
            total_energy: total,
            mean_energy: total / energies.len() as f64,
            min_energy: energies.iter().copied().fold(f64::INFINITY, f64::min),
            max_energy: energies.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Snapshot statistics of a population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationMetrics {
    /// One entry per depth, including empty depths.
    pub depths: Vec<DepthMetrics>,
    pub total_population: usize,
    pub total_energy: f64,
    /// `None` when the population is extinct.
    pub deepest_occupied: Option<Depth>,
}

impl PopulationMetrics {
    pub fn compute(store: &PopulationStore) -> Self {
        let depths: Vec<DepthMetrics> = (0..=store.max_depth())
            .map(|depth| DepthMetrics::compute(store, depth))
            .collect();
        let total_energy = depths.iter().map(|d| d.total_energy).sum();
        let deepest_occupied = depths.iter().rev().find(|d| d.count > 0).map(|d| d.depth);
        Self {
            total_population: store.total_count(),
            total_energy,
            deepest_occupied,
            depths,
        }
    }

    pub fn at(&self, depth: Depth) -> Option<&DepthMetrics> {
        self.depths.get(depth)
    }

    /// Mean energy over every live agent.
    pub fn mean_energy(&self) -> f64 {
        if self.total_population == 0 {
            0.0
        } else {
            self.total_energy / self.total_population as f64
        }
    }
}

/// Aggregates over a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryStats {
    pub cycles: u64,
    pub peak_population: usize,
    pub final_population: usize,
    pub mean_population: f64,
    pub total_births: usize,
    pub total_compositions: usize,
    pub total_decompositions: usize,
    pub total_deaths: usize,
    pub compositions_per_cycle: f64,
    /// First cycle in which any composition happened.
    pub first_composition_cycle: Option<Cycle>,
    pub termination: Option<TerminationReason>,
}

impl TrajectoryStats {
    pub fn from_report(report: &RunReport) -> Self {
        let trajectory = report.trajectory();
        let cycles = report.summaries.len();
        let mean_population = if cycles == 0 {
            0.0
        } else {
            trajectory.iter().sum::<usize>() as f64 / cycles as f64
        };
        let total_compositions = report.total_compositions();

        Self {
            cycles: report.cycles_completed,
            peak_population: trajectory.iter().copied().max().unwrap_or(0),
            final_population: trajectory.last().copied().unwrap_or(0),
            mean_population,
            total_births: report.total_births(),
            total_compositions,
            total_decompositions: report.total_decompositions(),
            total_deaths: report.total_deaths(),
            compositions_per_cycle: if cycles == 0 {
                0.0
            } else {
                total_compositions as f64 / cycles as f64
            },
            first_composition_cycle: report
                .summaries
                .iter()
                .find(|s| s.compositions > 0)
                .map(|s| s.cycle),
            termination: report.termination,
        }
    }
}
