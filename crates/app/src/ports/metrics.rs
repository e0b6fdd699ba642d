//! Metrics port — averaged CPU utilization per instance.

use std::future::Future;

use rightsize_domain::error::RightsizeError;
use rightsize_domain::utilization::{UtilizationQuery, UtilizationSample};

/// Source of utilization buckets.
pub trait MetricsSource {
    /// Return every average-CPU bucket inside the query window.
    ///
    /// An empty vector means "no data" and is not an error. Ordering is
    /// whatever the provider returns.
    fn cpu_utilization(
        &self,
        query: &UtilizationQuery,
    ) -> impl Future<Output = Result<Vec<UtilizationSample>, RightsizeError>> + Send;
}
