//! AWS adapter configuration.

use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use serde::Deserialize;

use crate::{AwsAdapters, CloudWatchMetrics, Ec2ComputePlane, SnsNotifier};

/// Configuration for the AWS adapters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Region override. `None` uses the SDK's default provider chain.
    pub region: Option<String>,
    /// SNS topic every notification is published to.
    pub topic_arn: String,
    /// Upper bound on waiting for an instance to reach `stopped`, in seconds.
    pub stop_wait_timeout_secs: u64,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: None,
            topic_arn: String::new(),
            stop_wait_timeout_secs: 600,
        }
    }
}

impl AwsConfig {
    /// Load shared SDK configuration and build the three adapters.
    pub async fn build(&self) -> AwsAdapters {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk = loader.load().await;

        AwsAdapters {
            compute: Ec2ComputePlane::new(
                aws_sdk_ec2::Client::new(&sdk),
                Duration::from_secs(self.stop_wait_timeout_secs),
            ),
            metrics: CloudWatchMetrics::new(aws_sdk_cloudwatch::Client::new(&sdk)),
            notifier: SnsNotifier::new(aws_sdk_sns::Client::new(&sdk), self.topic_arn.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = AwsConfig::default();
        assert!(config.region.is_none());
        assert!(config.topic_arn.is_empty());
        assert_eq!(config.stop_wait_timeout_secs, 600);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            region = "eu-west-1"
            topic_arn = "arn:aws:sns:eu-west-1:123456789012:ops"
            stop_wait_timeout_secs = 300
        "#;
        let config: AwsConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.topic_arn, "arn:aws:sns:eu-west-1:123456789012:ops");
        assert_eq!(config.stop_wait_timeout_secs, 300);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: AwsConfig = toml::from_str(r#"region = "us-east-1""#).unwrap();
        assert_eq!(config.stop_wait_timeout_secs, 600);
    }
}
