//! Rightsize service — the enumerate → sample → decide → transition → notify
//! pipeline.
//!
//! Instances are processed strictly one at a time: running instances first,
//! then stopped ones, each list in enumeration order. A failure while handling
//! one instance is reported through the notifier and the run moves on; only a
//! failure to enumerate, or to publish a failure notification, ends the run
//! early.

use rightsize_domain::decision::{self, ResizeDecision, SkipReason};
use rightsize_domain::error::RightsizeError;
use rightsize_domain::instance::{Instance, InstanceId, Inventory, LifecycleState};
use rightsize_domain::notification::Notification;
use rightsize_domain::policy::RightsizePolicy;
use rightsize_domain::report::{InstanceOutcome, RunReport};
use rightsize_domain::time::Timestamp;
use rightsize_domain::transition::{TransitionPlan, TransitionStep};
use rightsize_domain::utilization::{self, UtilizationQuery, UtilizationSample};

use crate::ports::{ComputePlane, MetricsSource, Notifier};

/// A transition aborted at `step` (`None` once every step has succeeded).
struct TransitionFailure {
    step: Option<TransitionStep>,
    source: RightsizeError,
}

/// Application service converging instances toward the policy's target class.
pub struct RightsizeService<C, M, N> {
    compute: C,
    metrics: M,
    notifier: N,
    policy: RightsizePolicy,
}

impl<C, M, N> RightsizeService<C, M, N>
where
    C: ComputePlane + Sync,
    M: MetricsSource + Sync,
    N: Notifier + Sync,
{
    /// Create a new service backed by the given ports.
    pub fn new(compute: C, metrics: M, notifier: N, policy: RightsizePolicy) -> Self {
        Self {
            compute,
            metrics,
            notifier,
            policy,
        }
    }

    /// The policy this service applies.
    #[must_use]
    pub fn policy(&self) -> &RightsizePolicy {
        &self.policy
    }

    /// Run one full check. Never fails: every error ends up in a notification
    /// (or, if even that fails, in the log) and in the returned report.
    #[tracing::instrument(skip(self), fields(target_type = %self.policy.target))]
    pub async fn run(&self, now: Timestamp) -> RunReport {
        let mut report = RunReport::default();

        if let Err(err) = self.process_all(now, &mut report).await {
            let text = err.chain();
            tracing::error!(error = %text, "instance check aborted");
            report.abort(text.clone());
            if let Err(err) = self.notifier.publish(&Notification::check_failed(&text)).await {
                tracing::error!(error = %err.chain(), "failed to publish check failure");
            }
        }

        tracing::info!(
            examined = report.examined,
            transitioned = report.transitioned,
            at_target = report.at_target,
            above_threshold = report.above_threshold,
            no_data = report.no_data,
            failed = report.failed,
            notifications = report.notifications(),
            aborted = report.aborted.is_some(),
            "instance check completed"
        );
        report
    }

    async fn process_all(
        &self,
        now: Timestamp,
        report: &mut RunReport,
    ) -> Result<(), RightsizeError> {
        let inventory = self.enumerate().await?;
        if inventory.is_empty() {
            tracing::info!("no running or stopped instances");
        }
        for instance in inventory.running.iter().chain(&inventory.stopped) {
            let outcome = self.process_instance(instance, now).await?;
            report.record(&outcome);
        }
        Ok(())
    }

    /// List running and stopped instances, partitioned by state.
    ///
    /// # Errors
    ///
    /// Returns a compute error propagated from the provider.
    pub async fn enumerate(&self) -> Result<Inventory, RightsizeError> {
        let instances = self
            .compute
            .list_instances(&[LifecycleState::Running, LifecycleState::Stopped])
            .await?;
        let inventory = Inventory::partition(instances);
        tracing::debug!(
            total = inventory.len(),
            running = inventory.running.len(),
            stopped = inventory.stopped.len(),
            "enumerated instances"
        );
        Ok(inventory)
    }

    /// Fetch the most recent utilization bucket for `instance_id`.
    ///
    /// Returns `Ok(None)` when the look-back window holds no data.
    ///
    /// # Errors
    ///
    /// Returns a metrics error propagated from the provider.
    pub async fn sample(
        &self,
        instance_id: &InstanceId,
        now: Timestamp,
    ) -> Result<Option<UtilizationSample>, RightsizeError> {
        let query = UtilizationQuery::for_instance(instance_id.clone(), &self.policy, now);
        let samples = self.metrics.cpu_utilization(&query).await?;
        Ok(utilization::latest(&samples))
    }

    /// Evaluate and, if needed, transition a single instance.
    ///
    /// Provider failures are converted into a failure notification and a
    /// [`InstanceOutcome::Failed`].
    ///
    /// # Errors
    ///
    /// Returns a notification error only when the failure notification
    /// itself could not be published.
    #[tracing::instrument(
        skip(self, instance, now),
        fields(
            instance_id = %instance.id,
            instance_type = %instance.instance_type,
            state = %instance.state,
        )
    )]
    pub async fn process_instance(
        &self,
        instance: &Instance,
        now: Timestamp,
    ) -> Result<InstanceOutcome, RightsizeError> {
        let decision = match self.evaluate(instance, now).await {
            Ok(decision) => decision,
            Err(err) => return self.report_failure(&instance.id, None, &err).await,
        };

        match decision {
            ResizeDecision::Skip(reason) => {
                log_skip(&reason);
                Ok(InstanceOutcome::Skipped(reason))
            }
            ResizeDecision::Transition(plan) => match self.execute(&plan).await {
                Ok(()) => {
                    tracing::info!(
                        from = %plan.from,
                        to = %plan.to,
                        utilization = ?plan.sample().map(|s| s.average_percent),
                        "instance transitioned"
                    );
                    Ok(InstanceOutcome::Transitioned(plan))
                }
                Err(failure) => {
                    self.report_failure(&plan.instance_id, failure.step, &failure.source)
                        .await
                }
            },
        }
    }

    async fn evaluate(
        &self,
        instance: &Instance,
        now: Timestamp,
    ) -> Result<ResizeDecision, RightsizeError> {
        let sample = if decision::needs_sample(instance, &self.policy) {
            self.sample(&instance.id, now).await?
        } else {
            None
        };
        Ok(decision::decide(instance, &self.policy, sample))
    }

    /// Perform every step of `plan`, then publish the success notification.
    async fn execute(&self, plan: &TransitionPlan) -> Result<(), TransitionFailure> {
        for &step in plan.steps() {
            self.perform(step, plan)
                .await
                .map_err(|source| TransitionFailure {
                    step: Some(step),
                    source,
                })?;
            tracing::debug!(%step, "transition step completed");
        }

        self.notifier
            .publish(&Notification::transition_succeeded(plan))
            .await
            .map_err(|source| TransitionFailure { step: None, source })
    }

    async fn perform(
        &self,
        step: TransitionStep,
        plan: &TransitionPlan,
    ) -> Result<(), RightsizeError> {
        let id = &plan.instance_id;
        match step {
            TransitionStep::Stop => self.compute.stop_instance(id).await,
            TransitionStep::WaitUntilStopped => self.compute.wait_until_stopped(id).await,
            TransitionStep::Modify => self.compute.modify_instance_type(id, &plan.to).await,
            TransitionStep::Start => self.compute.start_instance(id).await,
        }
    }

    async fn report_failure(
        &self,
        instance_id: &InstanceId,
        step: Option<TransitionStep>,
        err: &RightsizeError,
    ) -> Result<InstanceOutcome, RightsizeError> {
        let error = err.chain();
        tracing::error!(step = ?step, error = %error, "instance transition failed");
        self.notifier
            .publish(&Notification::transition_failed(instance_id, step, &error))
            .await?;
        Ok(InstanceOutcome::Failed { step, error })
    }
}

fn log_skip(reason: &SkipReason) {
    match reason {
        SkipReason::AlreadyAtTarget => tracing::debug!("already at target"),
        SkipReason::AboveThreshold(sample) => {
            tracing::debug!(utilization = %sample, "utilization at or above threshold");
        }
        SkipReason::NoData => tracing::warn!("no utilization data in look-back window, skipping"),
        SkipReason::NotEligible => tracing::debug!("lifecycle state not eligible"),
    }
}
