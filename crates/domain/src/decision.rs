//! Resize decision — whether an instance is transitioned this run.

use crate::instance::{Instance, LifecycleState};
use crate::policy::RightsizePolicy;
use crate::transition::{TransitionPath, TransitionPlan};
use crate::utilization::UtilizationSample;

/// Why an instance was left alone.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Already running with the target class.
    AlreadyAtTarget,
    /// Latest sample is at or above the threshold.
    AboveThreshold(UtilizationSample),
    /// The metric window contained no samples.
    NoData,
    /// Lifecycle state is neither running nor stopped.
    NotEligible,
}

/// Outcome of evaluating one instance against the policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeDecision {
    Skip(SkipReason),
    Transition(TransitionPlan),
}

/// Whether the decision for `instance` depends on a utilization sample.
///
/// Only running instances that are not yet at the target are sampled.
#[must_use]
pub fn needs_sample(instance: &Instance, policy: &RightsizePolicy) -> bool {
    instance.state == LifecycleState::Running && !instance.is_at(&policy.target)
}

/// Decide what to do with `instance`.
///
/// `sample` is ignored for stopped instances, which are reconfigured
/// unconditionally when off target.
#[must_use]
pub fn decide(
    instance: &Instance,
    policy: &RightsizePolicy,
    sample: Option<UtilizationSample>,
) -> ResizeDecision {
    if !instance.state.is_actionable() {
        return ResizeDecision::Skip(SkipReason::NotEligible);
    }
    if instance.is_at(&policy.target) {
        return ResizeDecision::Skip(SkipReason::AlreadyAtTarget);
    }

    let path = match instance.state {
        LifecycleState::Stopped => TransitionPath::FromStopped,
        _ => match sample {
            None => return ResizeDecision::Skip(SkipReason::NoData),
            Some(sample) if sample.is_below(policy.cpu_threshold_percent) => {
                TransitionPath::FromRunning { sample }
            }
            Some(sample) => return ResizeDecision::Skip(SkipReason::AboveThreshold(sample)),
        },
    };

    ResizeDecision::Transition(TransitionPlan {
        instance_id: instance.id.clone(),
        from: instance.instance_type.clone(),
        to: policy.target.clone(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn instance(instance_type: &str, state: LifecycleState) -> Instance {
        Instance::builder()
            .id("i-1")
            .instance_type(instance_type)
            .state(state)
            .build()
            .unwrap()
    }

    fn sample(percent: f64) -> Option<UtilizationSample> {
        Some(UtilizationSample::new(Utc::now(), percent))
    }

    #[test]
    fn should_skip_running_instance_at_target() {
        let policy = RightsizePolicy::default();
        let inst = instance("t2.micro", LifecycleState::Running);
        assert!(!needs_sample(&inst, &policy));
        assert_eq!(
            decide(&inst, &policy, sample(1.0)),
            ResizeDecision::Skip(SkipReason::AlreadyAtTarget)
        );
    }

    #[test]
    fn should_skip_stopped_instance_at_target() {
        let policy = RightsizePolicy::default();
        let inst = instance("t2.micro", LifecycleState::Stopped);
        assert_eq!(
            decide(&inst, &policy, None),
            ResizeDecision::Skip(SkipReason::AlreadyAtTarget)
        );
    }

    #[test]
    fn should_transition_running_instance_below_threshold() {
        let policy = RightsizePolicy::default();
        let inst = instance("t2.large", LifecycleState::Running);
        assert!(needs_sample(&inst, &policy));

        let ResizeDecision::Transition(plan) = decide(&inst, &policy, sample(4.5)) else {
            panic!("expected a transition");
        };
        assert_eq!(plan.from.as_str(), "t2.large");
        assert_eq!(plan.to.as_str(), "t2.micro");
        assert!(matches!(plan.path, TransitionPath::FromRunning { .. }));
    }

    #[test]
    fn should_skip_running_instance_at_threshold() {
        let policy = RightsizePolicy::default();
        let inst = instance("t2.large", LifecycleState::Running);
        assert!(matches!(
            decide(&inst, &policy, sample(10.0)),
            ResizeDecision::Skip(SkipReason::AboveThreshold(_))
        ));
    }

    #[test]
    fn should_skip_running_instance_without_data() {
        let policy = RightsizePolicy::default();
        let inst = instance("t2.large", LifecycleState::Running);
        assert_eq!(
            decide(&inst, &policy, None),
            ResizeDecision::Skip(SkipReason::NoData)
        );
    }

    #[test]
    fn should_transition_stopped_instance_without_sample() {
        let policy = RightsizePolicy::default();
        let inst = instance("t2.large", LifecycleState::Stopped);
        assert!(!needs_sample(&inst, &policy));

        let ResizeDecision::Transition(plan) = decide(&inst, &policy, None) else {
            panic!("expected a transition");
        };
        assert_eq!(plan.path, TransitionPath::FromStopped);
    }

    #[test]
    fn should_ignore_sample_for_stopped_instance() {
        let policy = RightsizePolicy::default();
        let inst = instance("t2.large", LifecycleState::Stopped);
        let decision = decide(&inst, &policy, sample(90.0));
        assert!(matches!(decision, ResizeDecision::Transition(_)));
    }

    #[test]
    fn should_not_act_on_pending_instance() {
        let policy = RightsizePolicy::default();
        let inst = instance("t2.large", LifecycleState::Other("pending".to_string()));
        assert_eq!(
            decide(&inst, &policy, sample(1.0)),
            ResizeDecision::Skip(SkipReason::NotEligible)
        );
    }
}
