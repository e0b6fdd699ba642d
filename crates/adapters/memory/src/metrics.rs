//! Scripted metrics — utilization buckets registered per instance.

use std::collections::HashMap;
use std::sync::Arc;

use rightsize_app::ports::MetricsSource;
use rightsize_domain::error::RightsizeError;
use rightsize_domain::instance::InstanceId;
use rightsize_domain::utilization::{UtilizationQuery, UtilizationSample};
use tokio::sync::Mutex;

use crate::error::SimulationError;

#[derive(Debug, Default)]
struct MetricsState {
    samples: HashMap<InstanceId, Vec<UtilizationSample>>,
    faults: HashMap<InstanceId, String>,
    queries: Vec<UtilizationQuery>,
}

/// In-memory [`MetricsSource`]. Only buckets inside the query window are returned.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMetrics {
    inner: Arc<Mutex<MetricsState>>,
}

impl ScriptedMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bucket for `id`.
    pub async fn record(&self, id: &InstanceId, sample: UtilizationSample) {
        self.inner
            .lock()
            .await
            .samples
            .entry(id.clone())
            .or_default()
            .push(sample);
    }

    /// Make queries for `id` fail with `message`.
    pub async fn inject_fault(&self, id: &InstanceId, message: &str) {
        self.inner
            .lock()
            .await
            .faults
            .insert(id.clone(), message.to_string());
    }

    /// Every query received so far.
    pub async fn queries(&self) -> Vec<UtilizationQuery> {
        self.inner.lock().await.queries.clone()
    }
}

impl MetricsSource for ScriptedMetrics {
    async fn cpu_utilization(
        &self,
        query: &UtilizationQuery,
    ) -> Result<Vec<UtilizationSample>, RightsizeError> {
        let mut state = self.inner.lock().await;
        state.queries.push(query.clone());
        if let Some(message) = state.faults.get(&query.instance_id) {
            return Err(SimulationError::MetricsFault(message.clone()).into());
        }
        Ok(state
            .samples
            .get(&query.instance_id)
            .map(|samples| {
                samples
                    .iter()
                    .filter(|s| s.timestamp >= query.start && s.timestamp < query.end)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}
