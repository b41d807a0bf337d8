//! Reporting seam between the simulator and whatever displays it.

use crate::entity::World;
use eco_core::StepReport;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Receives the field state after every step and decides whether a run goes on
pub trait SimulatorView {
    /// Show the status of the field at `report.step`.
    fn show_status(&mut self, report: &StepReport, world: &World);

    /// Whether the ecosystem is still worth simulating.
    fn is_viable(&self, world: &World) -> bool {
        world.survey().is_viable()
    }
}

/// A view without a display: logs each status and keeps the most recent reports.
///
/// Only the last report is kept unless a larger window is asked for with
/// [`HeadlessView::with_history`].
#[derive(Debug, Clone)]
pub struct HeadlessView {
    history: VecDeque<StepReport>,
    capacity: usize,
    log_interval: u64,
}

impl HeadlessView {
    pub fn new(log_interval: u64) -> Self {
        Self {
            history: VecDeque::with_capacity(1),
            capacity: 1,
            log_interval: log_interval.max(1),
        }
    }

    /// Keep up to `capacity` of the latest reports, oldest dropped first.
    pub fn with_history(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self.history.truncate(self.capacity);
        self
    }

    pub fn history(&self) -> &VecDeque<StepReport> {
        &self.history
    }

    pub fn last(&self) -> Option<&StepReport> {
        self.history.back()
    }
}

impl Default for HeadlessView {
    fn default() -> Self {
        Self::new(100)
    }
}

impl SimulatorView for HeadlessView {
    fn show_status(&mut self, report: &StepReport, world: &World) {
        // A reset starts a new history
        if report.step == 0 {
            self.history.clear();
        }

        if report.step % self.log_interval == 0 {
            info!(
                event = "population_metrics",
                step = report.step,
                hour = report.hour,
                weather = %report.weather,
                animals = report.counts.animals(),
                plants = report.counts.plants(),
                occupied = world.field.occupied_count(),
                "Population metrics snapshot"
            );
        } else {
            debug!(
                step = report.step,
                hour = report.hour,
                total = report.counts.total(),
                "Step complete"
            );
        }

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(report.clone());
    }
}
