//! Crawler module for fetching and walking the results site
//!
//! This module contains the I/O side of the harvest, including:
//! - HTTP fetching with host restriction and politeness pacing
//! - The three-stage crawl coordination

mod coordinator;
mod fetcher;

pub use coordinator::{run_harvest, Harvester};
pub use fetcher::{build_http_client, user_agent_string, Fetcher, Pacer};

use crate::config::Config;
use crate::output::HarvestSummary;
use crate::HarvestError;

/// Runs a complete harvest operation
///
/// This is the main entry point for starting a run. It will:
/// 1. Fetch the format index and register every listed event
/// 2. Visit each event page and collect its results
/// 3. Fetch and parse every result's decklist
/// 4. Write one document per event and the run manifest
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(HarvestSummary)` - Harvest completed successfully
/// * `Err(HarvestError)` - Harvest aborted
pub async fn harvest(config: Config) -> Result<HarvestSummary, HarvestError> {
    run_harvest(config).await
}
