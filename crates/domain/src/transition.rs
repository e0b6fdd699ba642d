//! Transition — the provider calls that move an instance to a new class.
//!
//! ```text
//! from running: Stop -> WaitUntilStopped -> Modify -> Start
//! from stopped:                             Modify -> Start
//! ```
//!
//! A failure at any step is terminal for that instance. There is no rollback.

use serde::{Deserialize, Serialize};

use crate::instance::{InstanceId, InstanceType};
use crate::utilization::UtilizationSample;

/// One provider call in a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStep {
    Stop,
    WaitUntilStopped,
    Modify,
    Start,
}

impl TransitionStep {
    /// Human-readable phrase used in logs and failure notifications.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Stop => "stopping",
            Self::WaitUntilStopped => "waiting for stop",
            Self::Modify => "changing instance type",
            Self::Start => "starting",
        }
    }
}

impl std::fmt::Display for TransitionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Which lifecycle state the transition starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPath {
    /// Running and under-utilized; `sample` is the bucket that triggered it.
    FromRunning { sample: UtilizationSample },
    /// Stopped; reconfigured without sampling.
    FromStopped,
}

/// A transition the executor is about to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub instance_id: InstanceId,
    pub from: InstanceType,
    pub to: InstanceType,
    pub path: TransitionPath,
}

impl TransitionPlan {
    /// Ordered provider calls for this plan.
    #[must_use]
    pub fn steps(&self) -> &'static [TransitionStep] {
        match self.path {
            TransitionPath::FromRunning { .. } => &[
                TransitionStep::Stop,
                TransitionStep::WaitUntilStopped,
                TransitionStep::Modify,
                TransitionStep::Start,
            ],
            TransitionPath::FromStopped => &[TransitionStep::Modify, TransitionStep::Start],
        }
    }

    /// Utilization sample that triggered the plan, if any.
    #[must_use]
    pub fn sample(&self) -> Option<UtilizationSample> {
        match self.path {
            TransitionPath::FromRunning { sample } => Some(sample),
            TransitionPath::FromStopped => None,
        }
    }
}
