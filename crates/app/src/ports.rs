//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod compute;
pub mod metrics;
pub mod notifier;

pub use compute::ComputePlane;
pub use metrics::MetricsSource;
pub use notifier::Notifier;
