//! # rightsize-adapter-aws
//!
//! AWS adapter — implements the application ports over the official AWS SDK.
//!
//! | Port | Implementation | Service calls |
//! |------|----------------|---------------|
//! | `ComputePlane` | [`Ec2ComputePlane`] | `DescribeInstances` (all pages), `StopInstances`, `InstanceStopped` waiter, `ModifyInstanceAttribute`, `StartInstances` |
//! | `MetricsSource` | [`CloudWatchMetrics`] | `GetMetricStatistics` on `AWS/EC2` `CPUUtilization`, statistic `Average` |
//! | `Notifier` | [`SnsNotifier`] | `Publish` to the configured topic |
//!
//! Credentials and region come from the SDK's default provider chain.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `rightsize-app` and `rightsize-domain`.

pub mod cloudwatch;
pub mod config;
pub mod ec2;
pub mod error;
pub mod sns;

pub use cloudwatch::CloudWatchMetrics;
pub use config::AwsConfig;
pub use ec2::Ec2ComputePlane;
pub use error::AwsError;
pub use sns::SnsNotifier;

/// The three AWS-backed port implementations, built from one SDK config.
#[derive(Debug, Clone)]
pub struct AwsAdapters {
    pub compute: Ec2ComputePlane,
    pub metrics: CloudWatchMetrics,
    pub notifier: SnsNotifier,
}
