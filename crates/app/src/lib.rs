//! # rightsize-app
//!
//! Application layer — the rightsizing use-case and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ComputePlane` — enumerate, stop, wait, modify, start instances
//!   - `MetricsSource` — fetch averaged CPU utilization buckets
//!   - `Notifier` — publish operator notifications
//! - Define the **driving/inbound** side:
//!   - `RightsizeService` — enumerate → sample → decide → transition → notify
//!   - `handle_invocation` — the per-trigger entry point
//! - Orchestrate domain objects without knowing *how* the provider is reached
//!
//! ## Dependency rule
//! Depends on `rightsize-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod invocation;
pub mod ports;
pub mod services;
