//! Recording notifier — keeps every published notification.

use std::collections::HashSet;
use std::sync::Arc;

use rightsize_app::ports::Notifier;
use rightsize_domain::error::RightsizeError;
use rightsize_domain::notification::Notification;
use tokio::sync::Mutex;

use crate::error::SimulationError;

#[derive(Debug, Default)]
struct NotifierState {
    published: Vec<Notification>,
    rejected_subjects: HashSet<String>,
}

/// In-memory [`Notifier`]. Clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<NotifierState>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every publish whose subject is `subject`.
    pub async fn reject_subject(&self, subject: &str) {
        self.inner
            .lock()
            .await
            .rejected_subjects
            .insert(subject.to_string());
    }

    /// Every notification accepted so far, in publish order.
    pub async fn published(&self) -> Vec<Notification> {
        self.inner.lock().await.published.clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn publish(&self, notification: &Notification) -> Result<(), RightsizeError> {
        let mut state = self.inner.lock().await;
        if state.rejected_subjects.contains(&notification.subject) {
            return Err(SimulationError::PublishFault(format!(
                "publish rejected for subject {:?}",
                notification.subject
            ))
            .into());
        }
        tracing::debug!(subject = %notification.subject, "recorded notification");
        state.published.push(notification.clone());
        Ok(())
    }
}
