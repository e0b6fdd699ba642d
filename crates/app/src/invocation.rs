//! Invocation entry point — one trigger, one full check, one fixed response.

use serde::{Deserialize, Serialize};

use rightsize_domain::time::{self, Timestamp};

use crate::ports::{ComputePlane, MetricsSource, Notifier};
use crate::services::rightsize_service::RightsizeService;

/// Status code returned for every completed invocation.
pub const STATUS_OK: u16 = 200;
/// Body returned for every completed invocation.
pub const COMPLETED_BODY: &str = "Instance check completed";

/// What the trigger hands us.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Trigger payload. Not inspected.
    pub payload: serde_json::Value,
    /// Wall-clock time by which the invocation must finish, when known.
    ///
    /// Only logged; the metric window is always computed from the wall clock.
    pub deadline: Option<Timestamp>,
}

/// Response handed back to the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    #[must_use]
    pub fn completed() -> Self {
        Self {
            status_code: STATUS_OK,
            body: COMPLETED_BODY.to_string(),
        }
    }
}

/// Run one check and return the fixed completion response.
///
/// The response is the same however many instance transitions failed;
/// notifications are the only signal of partial failure.
pub async fn handle_invocation<C, M, N>(
    service: &RightsizeService<C, M, N>,
    invocation: Invocation,
) -> InvocationResponse
where
    C: ComputePlane + Sync,
    M: MetricsSource + Sync,
    N: Notifier + Sync,
{
    let now = time::now();
    let remaining_ms = invocation
        .deadline
        .map(|deadline| (deadline - now).num_milliseconds());
    tracing::info!(?remaining_ms, "invocation started");

    let report = service.run(now).await;
    tracing::debug!(?report, "run report");

    InvocationResponse::completed()
}
