//! # rightsize-domain
//!
//! Pure domain model for the rightsize routine.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Instances** (identifier, configuration class, lifecycle state)
//! - Define **Utilization samples** and the query window used to fetch them
//! - Define the **Policy** (target class, threshold, sampling window)
//! - Define the **Resize decision** and the **Transition** steps it leads to
//! - Define **Notifications** (subject/body pairs sent to operators)
//! - Define the per-run **Report**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod decision;
pub mod instance;
pub mod notification;
pub mod policy;
pub mod report;
pub mod transition;
pub mod utilization;
