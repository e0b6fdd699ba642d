//! Notifier port — fire-and-forget operator messages.

use std::future::Future;

use rightsize_domain::error::RightsizeError;
use rightsize_domain::notification::Notification;

/// Publishes notifications to a destination fixed by the implementation.
pub trait Notifier {
    /// Publish once. No batching, deduplication or retry.
    fn publish(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), RightsizeError>> + Send;
}
