//! AWS adapter error types.

use aws_sdk_ec2::error::DisplayErrorContext;
use rightsize_domain::error::RightsizeError;

/// Errors specific to the AWS adapter.
///
/// SDK errors are flattened to their full display context at the call site so
/// the operator sees the service's error code and message.
#[derive(Debug, thiserror::Error)]
pub enum AwsError {
    /// An EC2 call failed (including the stop waiter timing out).
    #[error("EC2 {operation} failed: {message}")]
    Ec2 {
        operation: &'static str,
        message: String,
    },

    /// A CloudWatch call failed.
    #[error("CloudWatch {operation} failed: {message}")]
    CloudWatch {
        operation: &'static str,
        message: String,
    },

    /// An SNS call failed.
    #[error("SNS {operation} failed: {message}")]
    Sns {
        operation: &'static str,
        message: String,
    },

    /// EC2 described an instance without a field we rely on.
    #[error("EC2 returned an instance without {0}")]
    MissingField(&'static str),

    /// The sampling period does not fit CloudWatch's integer period.
    #[error("sampling period {0}s is out of range for CloudWatch")]
    PeriodOutOfRange(u32),

    /// A domain-level error (validation of provider values).
    #[error("domain error")]
    Domain(#[source] RightsizeError),
}

impl AwsError {
    pub(crate) fn ec2(operation: &'static str, err: &impl std::error::Error) -> Self {
        Self::Ec2 {
            operation,
            message: DisplayErrorContext(err).to_string(),
        }
    }

    pub(crate) fn cloudwatch(operation: &'static str, err: &impl std::error::Error) -> Self {
        Self::CloudWatch {
            operation,
            message: DisplayErrorContext(err).to_string(),
        }
    }

    pub(crate) fn sns(operation: &'static str, err: &impl std::error::Error) -> Self {
        Self::Sns {
            operation,
            message: DisplayErrorContext(err).to_string(),
        }
    }

    /// Convert into the [`RightsizeError`] variant matching the failing
    /// service, for propagation across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> RightsizeError {
        match self {
            Self::Domain(err) => err,
            err @ (Self::Ec2 { .. } | Self::MissingField(_)) => RightsizeError::Compute(Box::new(err)),
            err @ (Self::CloudWatch { .. } | Self::PeriodOutOfRange(_)) => {
                RightsizeError::Metrics(Box::new(err))
            }
            err @ Self::Sns { .. } => RightsizeError::Notification(Box::new(err)),
        }
    }
}

impl From<AwsError> for RightsizeError {
    fn from(err: AwsError) -> Self {
        err.into_domain()
    }
}
