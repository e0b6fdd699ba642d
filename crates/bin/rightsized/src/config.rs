//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `rightsize.toml` in the working directory, or at the path named
//! by `RIGHTSIZE_CONFIG`. Every field except the topic ARN has a sensible
//! default so the file is optional on Lambda, where the environment carries
//! everything. Environment variables take precedence over file values.

use chrono::TimeDelta;
use rightsize_adapter_aws::AwsConfig;
use rightsize_domain::error::RightsizeError;
use rightsize_domain::instance::InstanceType;
use rightsize_domain::policy::{
    DEFAULT_CPU_THRESHOLD_PERCENT, DEFAULT_LOOKBACK_MINUTES, DEFAULT_PERIOD_SECS,
    DEFAULT_TARGET_INSTANCE_TYPE, RightsizePolicy,
};
use serde::Deserialize;

const DEFAULT_PATH: &str = "rightsize.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Operator channel settings.
    pub notification: NotificationConfig,
    /// Decision parameters.
    pub policy: PolicyConfig,
    /// AWS SDK settings.
    pub aws: AwsSection,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Where notifications go.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// SNS topic ARN. Required.
    pub topic_arn: String,
}

/// Right-sizing policy.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Instance type every eligible instance converges to.
    pub target_instance_type: String,
    /// Running instances strictly below this average are resized.
    pub cpu_threshold_percent: f64,
    /// How far back to look for utilization data.
    pub lookback_minutes: i64,
    /// Metric bucket width.
    pub period_secs: u32,
    /// Upper bound on waiting for a stop to complete.
    pub stop_wait_timeout_secs: u64,
}

/// AWS SDK overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AwsSection {
    /// Region override; the SDK's provider chain is used when unset.
    pub region: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present), apply
    /// environment-variable overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is malformed, an override
    /// cannot be parsed, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("RIGHTSIZE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SNS_TOPIC_ARN") {
            self.notification.topic_arn = val;
        }
        if let Some(val) = lookup("TARGET_INSTANCE_TYPE") {
            self.policy.target_instance_type = val;
        }
        if let Some(val) = lookup("RIGHTSIZE_CPU_THRESHOLD") {
            self.policy.cpu_threshold_percent = val.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("RIGHTSIZE_CPU_THRESHOLD is not a number: {val}"))
            })?;
        }
        if let Some(val) = lookup("RIGHTSIZE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.notification.topic_arn.trim().is_empty() {
            return Err(ConfigError::Validation(
                "notification topic ARN is required (set SNS_TOPIC_ARN)".to_string(),
            ));
        }
        self.rightsize_policy()?;
        Ok(())
    }

    /// Build the validated decision policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Policy`] when the target type is blank or the
    /// numeric parameters violate the policy's invariants, and
    /// [`ConfigError::Validation`] when the look-back cannot be represented.
    pub fn rightsize_policy(&self) -> Result<RightsizePolicy, ConfigError> {
        let target = InstanceType::new(self.policy.target_instance_type.clone())
            .map_err(|err| ConfigError::Policy(err.into()))?;
        let lookback = TimeDelta::try_minutes(self.policy.lookback_minutes).ok_or_else(|| {
            ConfigError::Validation(format!(
                "lookback_minutes is out of range: {}",
                self.policy.lookback_minutes
            ))
        })?;
        let policy = RightsizePolicy {
            target,
            cpu_threshold_percent: self.policy.cpu_threshold_percent,
            lookback,
            period_secs: self.policy.period_secs,
        };
        policy.validate().map_err(ConfigError::Policy)?;
        Ok(policy)
    }

    /// Settings for the AWS adapters.
    #[must_use]
    pub fn aws_config(&self) -> AwsConfig {
        AwsConfig {
            region: self.aws.region.clone(),
            topic_arn: self.notification.topic_arn.clone(),
            stop_wait_timeout_secs: self.policy.stop_wait_timeout_secs,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            target_instance_type: DEFAULT_TARGET_INSTANCE_TYPE.to_string(),
            cpu_threshold_percent: DEFAULT_CPU_THRESHOLD_PERCENT,
            lookback_minutes: DEFAULT_LOOKBACK_MINUTES,
            period_secs: DEFAULT_PERIOD_SECS,
            stop_wait_timeout_secs: AwsConfig::default().stop_wait_timeout_secs,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "rightsized=info,rightsize=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Policy parameters rejected by the domain.
    #[error("invalid policy")]
    Policy(#[source] RightsizeError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
