//! Simulation error types.

use rightsize_domain::error::RightsizeError;
use rightsize_domain::instance::{InstanceId, LifecycleState};

/// Errors raised by the in-memory adapters.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// No instance with this id exists in the fleet.
    #[error("instance {0} does not exist")]
    UnknownInstance(InstanceId),

    /// The call is not valid from the instance's current state.
    #[error("instance {id} is {actual}, expected {expected}")]
    IncorrectState {
        id: InstanceId,
        expected: &'static str,
        actual: LifecycleState,
    },

    /// A compute fault scripted by the test.
    #[error("{0}")]
    ComputeFault(String),

    /// A metrics fault scripted by the test.
    #[error("{0}")]
    MetricsFault(String),

    /// A publish fault scripted by the test.
    #[error("{0}")]
    PublishFault(String),
}

impl SimulationError {
    /// Convert into the [`RightsizeError`] variant matching the simulated service.
    #[must_use]
    pub fn into_domain(self) -> RightsizeError {
        match self {
            err @ Self::MetricsFault(_) => RightsizeError::Metrics(Box::new(err)),
            err @ Self::PublishFault(_) => RightsizeError::Notification(Box::new(err)),
            err => RightsizeError::Compute(Box::new(err)),
        }
    }
}

impl From<SimulationError> for RightsizeError {
    fn from(err: SimulationError) -> Self {
        err.into_domain()
    }
}
