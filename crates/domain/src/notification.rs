//! Notification — a subject/body pair published to the operator topic.

use crate::instance::InstanceId;
use crate::transition::{TransitionPath, TransitionPlan, TransitionStep};

pub const SUBJECT_RESIZED: &str = "EC2 Instance Resized";
pub const SUBJECT_MODIFIED_AND_STARTED: &str = "EC2 Instance Modified and Started";
pub const SUBJECT_RESIZE_FAILED: &str = "EC2 Instance Resize Failed";
pub const SUBJECT_CHECK_FAILED: &str = "EC2 Instance Check Failed";

/// Outbound operator message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Success message for a completed transition.
    ///
    /// Running-path messages carry the utilization that triggered them;
    /// stopped-path messages carry none.
    #[must_use]
    pub fn transition_succeeded(plan: &TransitionPlan) -> Self {
        match plan.path {
            TransitionPath::FromRunning { sample } => Self::new(
                SUBJECT_RESIZED,
                format!(
                    "Instance {} resized from {} to {} due to low CPU utilization ({sample})",
                    plan.instance_id, plan.from, plan.to
                ),
            ),
            TransitionPath::FromStopped => Self::new(
                SUBJECT_MODIFIED_AND_STARTED,
                format!(
                    "Stopped instance {} modified from {} to {} and started",
                    plan.instance_id, plan.from, plan.to
                ),
            ),
        }
    }

    /// Failure message for a transition aborted at `step`.
    #[must_use]
    pub fn transition_failed(
        instance_id: &InstanceId,
        step: Option<TransitionStep>,
        error: &str,
    ) -> Self {
        let body = match step {
            Some(step) => format!("Failed to resize instance {instance_id} while {step}: {error}"),
            None => format!("Failed to resize instance {instance_id}: {error}"),
        };
        Self::new(SUBJECT_RESIZE_FAILED, body)
    }

    /// Generic message for an error that ended the run early.
    #[must_use]
    pub fn check_failed(error: &str) -> Self {
        Self::new(SUBJECT_CHECK_FAILED, format!("Instance check failed: {error}"))
    }
}
