//! Output module for persisting harvested data
//!
//! This module handles:
//! - Writing one JSON document per event
//! - Writing the run manifest listing those documents
//! - Reporting run counters

mod store;
mod summary;

pub use store::JsonStore;
pub use summary::{print_summary, HarvestSummary};
