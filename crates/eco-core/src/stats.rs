//! Population statistics and per-step reports.

use crate::{Species, Weather};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of live entities of each species found on the field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCounts {
    counts: BTreeMap<Species, usize>,
}

impl SpeciesCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, species: Species) {
        *self.counts.entry(species).or_insert(0) += 1;
    }

    pub fn get(&self, species: Species) -> usize {
        self.counts.get(&species).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn animals(&self) -> usize {
        self.counts
            .iter()
            .filter(|(species, _)| species.is_animal())
            .map(|(_, n)| n)
            .sum()
    }

    pub fn plants(&self) -> usize {
        self.total() - self.animals()
    }

    /// Number of species with at least one member
    pub fn species_present(&self) -> usize {
        self.counts.values().filter(|&&n| n > 0).count()
    }

    /// An ecosystem stays viable while more than one species survives.
    pub fn is_viable(&self) -> bool {
        self.species_present() > 1
    }
}

/// What the view is shown after every step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: u64,
    pub hour: u32,
    pub weather: Weather,
    pub counts: SpeciesCounts,
}

/// Outcome of a multi-step run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Steps actually simulated by this run
    pub steps_run: u64,
    /// True when the run stopped early because the ecosystem collapsed
    pub collapsed: bool,
    pub final_report: StepReport,
}
