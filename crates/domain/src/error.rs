//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RightsizeError`] at port boundaries via `#[from]` or `into_domain()`.

use std::error::Error as StdError;
use std::fmt::Write as _;

/// Boxed provider error carried across port boundaries.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Top-level error for the rightsize workspace.
#[derive(Debug, thiserror::Error)]
pub enum RightsizeError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("compute provider error")]
    Compute(#[source] BoxError),

    #[error("metrics provider error")]
    Metrics(#[source] BoxError),

    #[error("notification provider error")]
    Notification(#[source] BoxError),
}

impl RightsizeError {
    /// Render this error and every source below it as `a: b: c`.
    ///
    /// Notification bodies use this so operators see the provider's own
    /// message rather than the top-level category alone.
    #[must_use]
    pub fn chain(&self) -> String {
        error_chain(self)
    }
}

/// Invariant violations on domain values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("instance id must not be empty")]
    EmptyInstanceId,

    #[error("instance type must not be empty")]
    EmptyInstanceType,

    #[error("cpu threshold must be within (0, 100], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("sampling period must be a positive multiple of 60 seconds, got {0}")]
    InvalidPeriod(u32),

    #[error("look-back window of {lookback_secs}s is shorter than one period of {period_secs}s")]
    LookbackTooShort { lookback_secs: i64, period_secs: u32 },

    #[error("look-back window of {lookback_secs}s exceeds the {max_days}-day metric retention")]
    LookbackTooLong { lookback_secs: i64, max_days: i64 },
}

/// Render an error and its `source()` chain joined by `": "`.
#[must_use]
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        let _ = write!(out, ": {source}");
        current = source.source();
    }
    out
}
