//! SNS notifier.

use rightsize_app::ports::Notifier;
use rightsize_domain::error::RightsizeError;
use rightsize_domain::notification::Notification;

use crate::error::AwsError;

/// [`Notifier`] publishing to a single SNS topic.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsNotifier {
    #[must_use]
    pub fn new(client: aws_sdk_sns::Client, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }

    /// Destination of every notification.
    #[must_use]
    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

impl Notifier for SnsNotifier {
    async fn publish(&self, notification: &Notification) -> Result<(), RightsizeError> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(&notification.subject)
            .message(&notification.body)
            .send()
            .await
            .map_err(|err| AwsError::sns("Publish", &err))?;

        tracing::info!(
            subject = %notification.subject,
            message_id = output.message_id().unwrap_or_default(),
            "notification published"
        );
        Ok(())
    }
}
