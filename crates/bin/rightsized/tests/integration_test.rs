//! End-to-end tests for the full rightsize pipeline.
//!
//! Each test wires the real service to the in-memory adapters (simulated
//! fleet, scripted metrics, recording notifier) and drives it through
//! `handle_invocation`, exactly as the Lambda handler does — no cloud account
//! is touched.

use chrono::{TimeDelta, Utc};
use rightsize_adapter_memory::{FleetCall, RecordingNotifier, ScriptedMetrics, SimulatedFleet};
use rightsize_app::invocation::{Invocation, InvocationResponse, handle_invocation};
use rightsize_app::services::rightsize_service::RightsizeService;
use rightsize_domain::instance::{Instance, InstanceId, InstanceType, LifecycleState};
use rightsize_domain::notification::{
    SUBJECT_CHECK_FAILED, SUBJECT_MODIFIED_AND_STARTED, SUBJECT_RESIZE_FAILED, SUBJECT_RESIZED,
};
use rightsize_domain::policy::RightsizePolicy;
use rightsize_domain::transition::TransitionStep;
use rightsize_domain::utilization::UtilizationSample;

struct Harness {
    fleet: SimulatedFleet,
    metrics: ScriptedMetrics,
    notifier: RecordingNotifier,
}

impl Harness {
    fn new(instances: Vec<Instance>) -> Self {
        Self {
            fleet: SimulatedFleet::new(instances),
            metrics: ScriptedMetrics::new(),
            notifier: RecordingNotifier::new(),
        }
    }

    /// Register one bucket `minutes_ago` minutes in the past.
    async fn utilization(&self, id: &str, minutes_ago: i64, percent: f64) {
        self.metrics
            .record(
                &id.parse().unwrap(),
                UtilizationSample::new(Utc::now() - TimeDelta::minutes(minutes_ago), percent),
            )
            .await;
    }

    async fn invoke(&self) -> InvocationResponse {
        let service = RightsizeService::new(
            self.fleet.clone(),
            self.metrics.clone(),
            self.notifier.clone(),
            RightsizePolicy::default(),
        );
        handle_invocation(&service, Invocation::default()).await
    }

    async fn subjects(&self) -> Vec<String> {
        self.notifier
            .published()
            .await
            .into_iter()
            .map(|n| n.subject)
            .collect()
    }

    async fn instance(&self, id: &str) -> Instance {
        self.fleet.instance(&id.parse().unwrap()).await.unwrap()
    }
}

fn instance(id: &str, instance_type: &str, state: LifecycleState) -> Instance {
    Instance::builder()
        .id(id)
        .instance_type(instance_type)
        .state(state)
        .build()
        .unwrap()
}

fn id(value: &str) -> InstanceId {
    value.parse().unwrap()
}

fn micro() -> InstanceType {
    "t2.micro".parse().unwrap()
}

fn assert_completed(response: &InvocationResponse) {
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "Instance check completed");
}

// ---------------------------------------------------------------------------
// Running instances
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_resize_idle_running_instance() {
    let h = Harness::new(vec![instance("i-1", "t2.large", LifecycleState::Running)]);
    h.utilization("i-1", 5, 4.5).await;

    let response = h.invoke().await;

    assert_completed(&response);
    let inst = h.instance("i-1").await;
    assert_eq!(inst.instance_type, micro());
    assert_eq!(inst.state, LifecycleState::Running);
    assert_eq!(
        h.fleet.calls().await,
        vec![
            FleetCall::List,
            FleetCall::Stop(id("i-1")),
            FleetCall::WaitUntilStopped(id("i-1")),
            FleetCall::Modify(id("i-1"), micro()),
            FleetCall::Start(id("i-1")),
        ]
    );

    let sent = h.notifier.published().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, SUBJECT_RESIZED);
    assert!(sent[0].body.contains("i-1"));
    assert!(sent[0].body.contains("t2.large"));
    assert!(sent[0].body.contains("t2.micro"));
    assert!(sent[0].body.contains("4.50%"));
}

#[tokio::test]
async fn should_leave_busy_running_instance_untouched() {
    let h = Harness::new(vec![instance("i-2", "t2.large", LifecycleState::Running)]);
    h.utilization("i-2", 5, 55.0).await;

    assert_completed(&h.invoke().await);

    assert_eq!(h.instance("i-2").await.instance_type.as_str(), "t2.large");
    assert_eq!(h.fleet.calls().await, vec![FleetCall::List]);
    assert!(h.notifier.published().await.is_empty());
}

#[tokio::test]
async fn should_not_resize_at_exactly_the_threshold() {
    let h = Harness::new(vec![instance("i-1", "t2.large", LifecycleState::Running)]);
    h.utilization("i-1", 5, 10.0).await;

    h.invoke().await;

    assert_eq!(h.fleet.calls().await, vec![FleetCall::List]);
    assert!(h.notifier.published().await.is_empty());
}

#[tokio::test]
async fn should_decide_on_the_most_recent_bucket() {
    let h = Harness::new(vec![instance("i-1", "t2.large", LifecycleState::Running)]);
    h.utilization("i-1", 50, 2.0).await;
    h.utilization("i-1", 5, 80.0).await;

    h.invoke().await;

    assert_eq!(h.instance("i-1").await.instance_type.as_str(), "t2.large");
    assert!(h.notifier.published().await.is_empty());
}

#[tokio::test]
async fn should_skip_running_instance_without_recent_data() {
    let h = Harness::new(vec![instance("i-1", "t2.large", LifecycleState::Running)]);
    h.utilization("i-1", 180, 1.0).await;

    assert_completed(&h.invoke().await);

    assert_eq!(h.fleet.calls().await, vec![FleetCall::List]);
    assert!(h.notifier.published().await.is_empty());
}

#[tokio::test]
async fn should_query_one_hour_window_in_five_minute_buckets() {
    let h = Harness::new(vec![instance("i-1", "t2.large", LifecycleState::Running)]);

    h.invoke().await;

    let queries = h.metrics.queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].instance_id, id("i-1"));
    assert_eq!(queries[0].window(), TimeDelta::hours(1));
    assert_eq!(queries[0].period_secs, 300);
}

// ---------------------------------------------------------------------------
// Stopped instances
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_modify_and_start_stopped_instance_without_sampling() {
    let h = Harness::new(vec![instance("i-3", "t2.large", LifecycleState::Stopped)]);

    assert_completed(&h.invoke().await);

    let inst = h.instance("i-3").await;
    assert_eq!(inst.instance_type, micro());
    assert_eq!(inst.state, LifecycleState::Running);
    assert!(h.metrics.queries().await.is_empty());
    assert_eq!(
        h.fleet.calls().await,
        vec![
            FleetCall::List,
            FleetCall::Modify(id("i-3"), micro()),
            FleetCall::Start(id("i-3")),
        ]
    );

    let sent = h.notifier.published().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, SUBJECT_MODIFIED_AND_STARTED);
    assert!(!sent[0].body.contains('%'));
}

#[tokio::test]
async fn should_leave_stopped_instance_already_at_target_stopped() {
    let h = Harness::new(vec![instance("i-4", "t2.micro", LifecycleState::Stopped)]);

    assert_completed(&h.invoke().await);

    assert_eq!(h.instance("i-4").await.state, LifecycleState::Stopped);
    assert_eq!(h.fleet.calls().await, vec![FleetCall::List]);
    assert!(h.notifier.published().await.is_empty());
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_notify_failure_and_continue_with_next_instance() {
    let h = Harness::new(vec![
        instance("i-5", "t2.large", LifecycleState::Running),
        instance("i-6", "t2.large", LifecycleState::Stopped),
    ]);
    h.utilization("i-5", 5, 3.0).await;
    h.fleet
        .inject_fault(&id("i-5"), TransitionStep::Modify, "Unsupported instance type")
        .await;

    assert_completed(&h.invoke().await);

    let sent = h.notifier.published().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].subject, SUBJECT_RESIZE_FAILED);
    assert!(sent[0].body.contains("i-5"));
    assert!(sent[0].body.contains("Unsupported instance type"));
    assert_eq!(sent[1].subject, SUBJECT_MODIFIED_AND_STARTED);

    // Stopped by the failed transition and left that way.
    let failed = h.instance("i-5").await;
    assert_eq!(failed.state, LifecycleState::Stopped);
    assert_eq!(failed.instance_type.as_str(), "t2.large");
    assert_eq!(h.instance("i-6").await.instance_type, micro());
}

#[tokio::test]
async fn should_send_single_check_failure_when_enumeration_fails() {
    let h = Harness::new(vec![instance("i-1", "t2.large", LifecycleState::Running)]);
    h.fleet.fail_listing("UnauthorizedOperation").await;

    let response = h.invoke().await;

    assert_completed(&response);
    let sent = h.notifier.published().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, SUBJECT_CHECK_FAILED);
    assert!(sent[0].body.contains("UnauthorizedOperation"));
}

#[tokio::test]
async fn should_complete_even_when_every_publish_fails() {
    let h = Harness::new(vec![instance("i-1", "t2.large", LifecycleState::Stopped)]);
    h.fleet.fail_listing("RequestLimitExceeded").await;
    h.notifier.reject_subject(SUBJECT_CHECK_FAILED).await;

    assert_completed(&h.invoke().await);
    assert!(h.notifier.published().await.is_empty());
}

// ---------------------------------------------------------------------------
// Whole fleet
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_process_running_before_stopped_and_ignore_other_states() {
    let h = Harness::new(vec![
        instance("i-3", "t2.large", LifecycleState::Stopped),
        instance("i-7", "t2.large", LifecycleState::Other("pending".to_string())),
        instance("i-1", "t2.large", LifecycleState::Running),
        instance("i-2", "t2.large", LifecycleState::Running),
        instance("i-4", "t2.micro", LifecycleState::Stopped),
    ]);
    h.utilization("i-1", 5, 4.5).await;
    h.utilization("i-2", 5, 55.0).await;

    assert_completed(&h.invoke().await);

    assert_eq!(
        h.subjects().await,
        vec![SUBJECT_RESIZED, SUBJECT_MODIFIED_AND_STARTED]
    );
    assert_eq!(h.instance("i-7").await.instance_type.as_str(), "t2.large");
    let bodies: Vec<_> = h
        .notifier
        .published()
        .await
        .into_iter()
        .map(|n| n.body)
        .collect();
    assert!(bodies[0].contains("i-1"));
    assert!(bodies[1].contains("i-3"));
}

#[tokio::test]
async fn should_be_idempotent_across_invocations() {
    let h = Harness::new(vec![
        instance("i-1", "t2.large", LifecycleState::Running),
        instance("i-3", "t2.large", LifecycleState::Stopped),
    ]);
    h.utilization("i-1", 5, 4.5).await;

    h.invoke().await;
    assert_eq!(h.notifier.published().await.len(), 2);

    h.invoke().await;
    assert_eq!(h.notifier.published().await.len(), 2);
    assert_eq!(h.instance("i-1").await.instance_type, micro());
    assert_eq!(h.instance("i-3").await.instance_type, micro());
}
