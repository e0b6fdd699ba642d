//! Compute port — the provider's instance control-plane.

use std::future::Future;

use rightsize_domain::error::RightsizeError;
use rightsize_domain::instance::{Instance, InstanceId, InstanceType, LifecycleState};

/// Instance enumeration and lifecycle control.
///
/// Every call is a single best-effort attempt; implementations must not retry.
pub trait ComputePlane {
    /// List every instance whose lifecycle state is one of `states`.
    ///
    /// Implementations aggregate all result pages and preserve the
    /// provider's ordering.
    fn list_instances(
        &self,
        states: &[LifecycleState],
    ) -> impl Future<Output = Result<Vec<Instance>, RightsizeError>> + Send;

    /// Request a stop. Returns once the request is accepted.
    fn stop_instance(
        &self,
        id: &InstanceId,
    ) -> impl Future<Output = Result<(), RightsizeError>> + Send;

    /// Block until the instance reports `stopped`.
    ///
    /// The wait is bounded by the implementation; a timeout is reported as an
    /// ordinary [`RightsizeError::Compute`].
    fn wait_until_stopped(
        &self,
        id: &InstanceId,
    ) -> impl Future<Output = Result<(), RightsizeError>> + Send;

    /// Change the configuration class of a stopped instance.
    fn modify_instance_type(
        &self,
        id: &InstanceId,
        instance_type: &InstanceType,
    ) -> impl Future<Output = Result<(), RightsizeError>> + Send;

    /// Request a start. Returns once the request is accepted.
    fn start_instance(
        &self,
        id: &InstanceId,
    ) -> impl Future<Output = Result<(), RightsizeError>> + Send;
}
