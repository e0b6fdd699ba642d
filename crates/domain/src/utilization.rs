//! Utilization samples and the query window used to fetch them.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::instance::InstanceId;
use crate::policy::RightsizePolicy;
use crate::time::Timestamp;

/// Averaged CPU utilization of one instance over one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationSample {
    /// Start of the bucket as reported by the metrics provider.
    pub timestamp: Timestamp,
    /// Average utilization in percent (0–100).
    pub average_percent: f64,
}

impl UtilizationSample {
    #[must_use]
    pub fn new(timestamp: Timestamp, average_percent: f64) -> Self {
        Self {
            timestamp,
            average_percent,
        }
    }

    /// Whether this sample is strictly below `threshold_percent`.
    #[must_use]
    pub fn is_below(&self, threshold_percent: f64) -> bool {
        self.average_percent < threshold_percent
    }
}

impl std::fmt::Display for UtilizationSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.average_percent)
    }
}

/// Pick the most recent bucket.
///
/// When several buckets share the latest timestamp, the one returned last by
/// the provider wins.
#[must_use]
pub fn latest(samples: &[UtilizationSample]) -> Option<UtilizationSample> {
    samples.iter().copied().max_by_key(|s| s.timestamp)
}

/// Parameters for a single utilization lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilizationQuery {
    pub instance_id: InstanceId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub period_secs: u32,
}

impl UtilizationQuery {
    /// Build the window `[now - lookback, now)` for `instance_id`.
    ///
    /// A look-back reaching before the earliest representable time starts the
    /// window there.
    #[must_use]
    pub fn for_instance(instance_id: InstanceId, policy: &RightsizePolicy, now: Timestamp) -> Self {
        Self {
            instance_id,
            start: now
                .checked_sub_signed(policy.lookback)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: now,
            period_secs: policy.period_secs,
        }
    }

    /// Length of the window.
    #[must_use]
    pub fn window(&self) -> TimeDelta {
        self.end - self.start
    }
}
