//! Per-run tally of instance outcomes. Logged, never persisted.

use serde::Serialize;

use crate::decision::SkipReason;
use crate::transition::{TransitionPlan, TransitionStep};

/// What happened to one instance during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceOutcome {
    Skipped(SkipReason),
    Transitioned(TransitionPlan),
    Failed {
        /// `None` when the failure happened before any transition step.
        step: Option<TransitionStep>,
        error: String,
    },
}

/// Counters for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub examined: usize,
    pub transitioned: usize,
    pub at_target: usize,
    pub above_threshold: usize,
    pub no_data: usize,
    pub not_eligible: usize,
    pub failed: usize,
    /// Error text of a top-level failure that ended the run early.
    pub aborted: Option<String>,
}

impl RunReport {
    /// Count one instance outcome.
    pub fn record(&mut self, outcome: &InstanceOutcome) {
        self.examined += 1;
        match outcome {
            InstanceOutcome::Skipped(SkipReason::AlreadyAtTarget) => self.at_target += 1,
            InstanceOutcome::Skipped(SkipReason::AboveThreshold(_)) => self.above_threshold += 1,
            InstanceOutcome::Skipped(SkipReason::NoData) => self.no_data += 1,
            InstanceOutcome::Skipped(SkipReason::NotEligible) => self.not_eligible += 1,
            InstanceOutcome::Transitioned(_) => self.transitioned += 1,
            InstanceOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Mark the run as ended early by `error`.
    pub fn abort(&mut self, error: impl Into<String>) {
        self.aborted = Some(error.into());
    }

    /// Number of notifications this run was expected to publish.
    #[must_use]
    pub fn notifications(&self) -> usize {
        self.transitioned + self.failed + usize::from(self.aborted.is_some())
    }
}
