//! CloudWatch metrics source.

use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, Statistic};
use rightsize_app::ports::MetricsSource;
use rightsize_domain::error::RightsizeError;
use rightsize_domain::time::Timestamp;
use rightsize_domain::utilization::{UtilizationQuery, UtilizationSample};

use crate::error::AwsError;

pub const NAMESPACE: &str = "AWS/EC2";
pub const METRIC_NAME: &str = "CPUUtilization";
pub const DIMENSION_NAME: &str = "InstanceId";

/// [`MetricsSource`] backed by `GetMetricStatistics`.
#[derive(Debug, Clone)]
pub struct CloudWatchMetrics {
    client: aws_sdk_cloudwatch::Client,
}

impl CloudWatchMetrics {
    #[must_use]
    pub fn new(client: aws_sdk_cloudwatch::Client) -> Self {
        Self { client }
    }
}

impl MetricsSource for CloudWatchMetrics {
    async fn cpu_utilization(
        &self,
        query: &UtilizationQuery,
    ) -> Result<Vec<UtilizationSample>, RightsizeError> {
        let period = i32::try_from(query.period_secs)
            .map_err(|_| AwsError::PeriodOutOfRange(query.period_secs))?;

        let dimension = Dimension::builder()
            .name(DIMENSION_NAME)
            .value(query.instance_id.as_str())
            .build()
            .map_err(|err| AwsError::cloudwatch("GetMetricStatistics", &err))?;
        let output = self
            .client
            .get_metric_statistics()
            .namespace(NAMESPACE)
            .metric_name(METRIC_NAME)
            .dimensions(dimension)
            .start_time(to_smithy(query.start))
            .end_time(to_smithy(query.end))
            .period(period)
            .statistics(Statistic::Average)
            .send()
            .await
            .map_err(|err| AwsError::cloudwatch("GetMetricStatistics", &err))?;

        let samples: Vec<_> = output.datapoints().iter().filter_map(to_sample).collect();
        tracing::debug!(
            instance_id = %query.instance_id,
            datapoints = samples.len(),
            "fetched cpu utilization"
        );
        Ok(samples)
    }
}

fn to_smithy(timestamp: Timestamp) -> DateTime {
    DateTime::from_millis(timestamp.timestamp_millis())
}

/// Datapoints without a timestamp or an average are dropped.
fn to_sample(datapoint: &Datapoint) -> Option<UtilizationSample> {
    let at = datapoint.timestamp()?;
    let average = datapoint.average()?;
    let timestamp = chrono::DateTime::from_timestamp(at.secs(), at.subsec_nanos())?;
    Some(UtilizationSample::new(timestamp, average))
}
