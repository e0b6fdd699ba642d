//! Simulated fleet — an in-memory compute plane with EC2-like state rules.
//!
//! `stop` moves a running instance to `stopping`; the stop waiter settles it
//! to `stopped`. The type can only be changed while stopped, and only stopped
//! instances can be started.

use std::collections::HashMap;
use std::sync::Arc;

use rightsize_app::ports::ComputePlane;
use rightsize_domain::error::RightsizeError;
use rightsize_domain::instance::{Instance, InstanceId, InstanceType, LifecycleState};
use rightsize_domain::transition::TransitionStep;
use tokio::sync::Mutex;

use crate::error::SimulationError;

const STOPPING: &str = "stopping";

/// A call received by the fleet, in order of arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetCall {
    List,
    Stop(InstanceId),
    WaitUntilStopped(InstanceId),
    Modify(InstanceId, InstanceType),
    Start(InstanceId),
}

#[derive(Debug, Default)]
struct FleetState {
    instances: Vec<Instance>,
    calls: Vec<FleetCall>,
    faults: HashMap<(InstanceId, TransitionStep), String>,
    list_fault: Option<String>,
}

impl FleetState {
    fn find(&mut self, id: &InstanceId) -> Result<&mut Instance, SimulationError> {
        self.instances
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| SimulationError::UnknownInstance(id.clone()))
    }

    fn check_fault(&self, id: &InstanceId, step: TransitionStep) -> Result<(), SimulationError> {
        match self.faults.get(&(id.clone(), step)) {
            Some(message) => Err(SimulationError::ComputeFault(message.clone())),
            None => Ok(()),
        }
    }
}

/// In-memory [`ComputePlane`]. Clones share the same fleet.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFleet {
    inner: Arc<Mutex<FleetState>>,
}

impl SimulatedFleet {
    /// Create a fleet holding `instances` in enumeration order.
    #[must_use]
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FleetState {
                instances,
                ..FleetState::default()
            })),
        }
    }

    /// Make `step` fail for `id` with `message`.
    pub async fn inject_fault(&self, id: &InstanceId, step: TransitionStep, message: &str) {
        self.inner
            .lock()
            .await
            .faults
            .insert((id.clone(), step), message.to_string());
    }

    /// Make enumeration fail with `message`.
    pub async fn fail_listing(&self, message: &str) {
        self.inner.lock().await.list_fault = Some(message.to_string());
    }

    /// Every call received so far.
    pub async fn calls(&self) -> Vec<FleetCall> {
        self.inner.lock().await.calls.clone()
    }

    /// Current view of one instance.
    pub async fn instance(&self, id: &InstanceId) -> Option<Instance> {
        self.inner
            .lock()
            .await
            .instances
            .iter()
            .find(|i| &i.id == id)
            .cloned()
    }
}

impl ComputePlane for SimulatedFleet {
    async fn list_instances(
        &self,
        states: &[LifecycleState],
    ) -> Result<Vec<Instance>, RightsizeError> {
        let mut state = self.inner.lock().await;
        state.calls.push(FleetCall::List);
        if let Some(message) = &state.list_fault {
            return Err(SimulationError::ComputeFault(message.clone()).into());
        }
        Ok(state
            .instances
            .iter()
            .filter(|i| states.contains(&i.state))
            .cloned()
            .collect())
    }

    async fn stop_instance(&self, id: &InstanceId) -> Result<(), RightsizeError> {
        let mut state = self.inner.lock().await;
        state.calls.push(FleetCall::Stop(id.clone()));
        state.check_fault(id, TransitionStep::Stop)?;
        let instance = state.find(id)?;
        if instance.state != LifecycleState::Running {
            return Err(incorrect_state(instance, "running").into());
        }
        instance.state = LifecycleState::Other(STOPPING.to_string());
        tracing::debug!(instance_id = %id, "simulated stop");
        Ok(())
    }

    async fn wait_until_stopped(&self, id: &InstanceId) -> Result<(), RightsizeError> {
        let mut state = self.inner.lock().await;
        state.calls.push(FleetCall::WaitUntilStopped(id.clone()));
        state.check_fault(id, TransitionStep::WaitUntilStopped)?;
        let instance = state.find(id)?;
        if instance.state.as_str() == STOPPING {
            instance.state = LifecycleState::Stopped;
        }
        if instance.state != LifecycleState::Stopped {
            return Err(incorrect_state(instance, STOPPING).into());
        }
        Ok(())
    }

    async fn modify_instance_type(
        &self,
        id: &InstanceId,
        instance_type: &InstanceType,
    ) -> Result<(), RightsizeError> {
        let mut state = self.inner.lock().await;
        state
            .calls
            .push(FleetCall::Modify(id.clone(), instance_type.clone()));
        state.check_fault(id, TransitionStep::Modify)?;
        let instance = state.find(id)?;
        if instance.state != LifecycleState::Stopped {
            return Err(incorrect_state(instance, "stopped").into());
        }
        instance.instance_type = instance_type.clone();
        Ok(())
    }

    async fn start_instance(&self, id: &InstanceId) -> Result<(), RightsizeError> {
        let mut state = self.inner.lock().await;
        state.calls.push(FleetCall::Start(id.clone()));
        state.check_fault(id, TransitionStep::Start)?;
        let instance = state.find(id)?;
        if instance.state != LifecycleState::Stopped {
            return Err(incorrect_state(instance, "stopped").into());
        }
        instance.state = LifecycleState::Running;
        Ok(())
    }
}

fn incorrect_state(instance: &Instance, expected: &'static str) -> SimulationError {
    SimulationError::IncorrectState {
        id: instance.id.clone(),
        expected,
        actual: instance.state.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> SimulatedFleet {
        SimulatedFleet::new(vec![
            Instance::builder()
                .id("i-1")
                .instance_type("t2.large")
                .state(LifecycleState::Running)
                .build()
                .unwrap(),
            Instance::builder()
                .id("i-2")
                .instance_type("t2.large")
                .state(LifecycleState::Stopped)
                .build()
                .unwrap(),
        ])
    }

    fn id(value: &str) -> InstanceId {
        value.parse().unwrap()
    }

    #[tokio::test]
    async fn should_filter_listing_by_state() {
        let fleet = fleet();
        let running = fleet
            .list_instances(&[LifecycleState::Running])
            .await
            .unwrap();
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].id, id("i-1"));
    }

    #[tokio::test]
    async fn should_walk_running_instance_through_full_transition() {
        let fleet = fleet();
        let target: InstanceType = "t2.micro".parse().unwrap();

        fleet.stop_instance(&id("i-1")).await.unwrap();
        assert_eq!(
            fleet.instance(&id("i-1")).await.unwrap().state,
            LifecycleState::Other("stopping".to_string())
        );
        fleet.wait_until_stopped(&id("i-1")).await.unwrap();
        fleet.modify_instance_type(&id("i-1"), &target).await.unwrap();
        fleet.start_instance(&id("i-1")).await.unwrap();

        let instance = fleet.instance(&id("i-1")).await.unwrap();
        assert_eq!(instance.state, LifecycleState::Running);
        assert_eq!(instance.instance_type, target);
        assert_eq!(fleet.calls().await.len(), 4);
    }

    #[tokio::test]
    async fn should_refuse_to_modify_running_instance() {
        let fleet = fleet();
        let result = fleet
            .modify_instance_type(&id("i-1"), &"t2.micro".parse().unwrap())
            .await;
        assert!(matches!(result, Err(RightsizeError::Compute(_))));
    }

    #[tokio::test]
    async fn should_fail_wait_when_stop_was_never_requested() {
        let fleet = fleet();
        assert!(fleet.wait_until_stopped(&id("i-1")).await.is_err());
    }

    #[tokio::test]
    async fn should_return_injected_fault() {
        let fleet = fleet();
        fleet
            .inject_fault(&id("i-2"), TransitionStep::Start, "InsufficientInstanceCapacity")
            .await;
        let err = fleet.start_instance(&id("i-2")).await.unwrap_err();
        assert_eq!(
            err.chain(),
            "compute provider error: InsufficientInstanceCapacity"
        );
    }

    #[tokio::test]
    async fn should_fail_listing_when_scripted() {
        let fleet = fleet();
        fleet.fail_listing("RequestLimitExceeded").await;
        assert!(fleet.list_instances(&[LifecycleState::Running]).await.is_err());
    }

    #[tokio::test]
    async fn should_report_unknown_instance() {
        let fleet = fleet();
        let err = fleet.stop_instance(&id("i-404")).await.unwrap_err();
        assert!(err.chain().contains("instance i-404 does not exist"));
    }
}
