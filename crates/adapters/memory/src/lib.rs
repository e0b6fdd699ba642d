//! # rightsize-adapter-memory
//!
//! In-memory implementations of every port, for end-to-end tests that run
//! without a cloud account.
//!
//! | Port | Implementation | Behaviour |
//! |------|----------------|-----------|
//! | `ComputePlane` | [`SimulatedFleet`] | EC2-like state rules, call log, scripted faults |
//! | `MetricsSource` | [`ScriptedMetrics`] | Registered buckets filtered by query window |
//! | `Notifier` | [`RecordingNotifier`] | Keeps every notification, scripted rejections |
//!
//! All three are cheap to clone; clones share state so a test can keep a
//! handle after moving one into the service.
//!
//! ## Dependency rule
//!
//! Depends on `rightsize-app` (port traits) and `rightsize-domain` only.

mod error;
mod fleet;
mod metrics;
mod notifier;

pub use error::SimulationError;
pub use fleet::{FleetCall, SimulatedFleet};
pub use metrics::ScriptedMetrics;
pub use notifier::RecordingNotifier;
