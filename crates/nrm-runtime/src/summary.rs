//! Per-cycle summaries and run reports.

use nrm_core::types::{Cycle, Depth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why a run stopped before its cycle budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// No live agents remain.
    ExtinctionReached,
    /// The population reached `max_total_population`.
    PopulationOverflow,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::ExtinctionReached => write!(f, "extinction"),
            TerminationReason::PopulationOverflow => write!(f, "population overflow"),
        }
    }
}

/// Outcome of one call to `SimulationEngine::step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Number of completed cycles after this step.
    pub cycle: Cycle,
    /// Population before phase 1.
    pub population_before: usize,
    pub births: usize,
    pub compositions: usize,
    pub decompositions: usize,
    pub deaths: usize,
    /// Population per depth after phase 5.
    pub population: BTreeMap<Depth, usize>,
    /// Total population after phase 5.
    pub total_population: usize,
    /// Set when the step found the run halted and ran no phases.
    pub termination: Option<TerminationReason>,
}

impl CycleSummary {
    /// Whether any event happened this cycle.
    pub fn is_quiet(&self) -> bool {
        self.births == 0 && self.compositions == 0 && self.decompositions == 0 && self.deaths == 0
    }

    /// Population predicted from the event counts: every composition
    /// removes two agents and adds one, every decomposition removes one
    /// and adds two.
    pub fn expected_population(&self) -> i64 {
        self.population_before as i64 + self.births as i64 - self.compositions as i64
            + self.decompositions as i64
            - self.deaths as i64
    }

    /// Whether the reported population matches the event accounting.
    pub fn is_balanced(&self) -> bool {
        self.expected_population() == self.total_population as i64
            && self.population.values().sum::<usize>() == self.total_population
    }
}

/// All summaries of a multi-cycle run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Summaries of the cycles that ran phases.
    pub summaries: Vec<CycleSummary>,
    /// Cycles completed by this run.
    pub cycles_completed: u64,
    /// `None` when the cycle budget ran out first.
    pub termination: Option<TerminationReason>,
}

impl RunReport {
    pub fn last(&self) -> Option<&CycleSummary> {
        self.summaries.last()
    }

    pub fn total_births(&self) -> usize {
        self.summaries.iter().map(|s| s.births).sum()
    }

    pub fn total_compositions(&self) -> usize {
        self.summaries.iter().map(|s| s.compositions).sum()
    }

    pub fn total_decompositions(&self) -> usize {
        self.summaries.iter().map(|s| s.decompositions).sum()
    }

    pub fn total_deaths(&self) -> usize {
        self.summaries.iter().map(|s| s.deaths).sum()
    }

    /// Population trajectory, one entry per completed cycle.
    pub fn trajectory(&self) -> Vec<usize> {
        self.summaries.iter().map(|s| s.total_population).collect()
    }
}
