//! Rightsizing policy — what to converge toward and when.

use chrono::TimeDelta;

use crate::error::{RightsizeError, ValidationError};
use crate::instance::InstanceType;

/// Configuration class instances converge toward unless told otherwise.
pub const DEFAULT_TARGET_INSTANCE_TYPE: &str = "t2.micro";
/// Running instances strictly below this average CPU are downsized.
pub const DEFAULT_CPU_THRESHOLD_PERCENT: f64 = 10.0;
/// Metric look-back window.
pub const DEFAULT_LOOKBACK_MINUTES: i64 = 60;
/// Metric bucket size.
pub const DEFAULT_PERIOD_SECS: u32 = 300;
/// Longest look-back CloudWatch can answer; older data has expired.
pub const MAX_LOOKBACK_DAYS: i64 = 455;

/// Fixed decision parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RightsizePolicy {
    pub target: InstanceType,
    pub cpu_threshold_percent: f64,
    pub lookback: TimeDelta,
    pub period_secs: u32,
}

impl Default for RightsizePolicy {
    fn default() -> Self {
        Self {
            target: InstanceType::default(),
            cpu_threshold_percent: DEFAULT_CPU_THRESHOLD_PERCENT,
            lookback: TimeDelta::minutes(DEFAULT_LOOKBACK_MINUTES),
            period_secs: DEFAULT_PERIOD_SECS,
        }
    }
}

impl RightsizePolicy {
    /// Default policy converging toward `target`.
    #[must_use]
    pub fn with_target(target: InstanceType) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Check policy invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RightsizeError::Validation`] when the threshold is outside
    /// `(0, 100]`, the period is not a positive multiple of 60 seconds, or the
    /// look-back window is shorter than one period or longer than
    /// [`MAX_LOOKBACK_DAYS`].
    pub fn validate(&self) -> Result<(), RightsizeError> {
        if !(self.cpu_threshold_percent > 0.0 && self.cpu_threshold_percent <= 100.0) {
            return Err(ValidationError::ThresholdOutOfRange(self.cpu_threshold_percent).into());
        }
        if self.period_secs == 0 || self.period_secs % 60 != 0 {
            return Err(ValidationError::InvalidPeriod(self.period_secs).into());
        }
        if self.lookback.num_seconds() < i64::from(self.period_secs) {
            return Err(ValidationError::LookbackTooShort {
                lookback_secs: self.lookback.num_seconds(),
                period_secs: self.period_secs,
            }
            .into());
        }
        if self.lookback > TimeDelta::days(MAX_LOOKBACK_DAYS) {
            return Err(ValidationError::LookbackTooLong {
                lookback_secs: self.lookback.num_seconds(),
                max_days: MAX_LOOKBACK_DAYS,
            }
            .into());
        }
        Ok(())
    }
}
