//! End-of-run summary

use std::path::PathBuf;

/// Counters for one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub events_discovered: usize,
    pub events_persisted: usize,
    pub results_collected: usize,

    /// Result containers dropped for lack of a decklist id
    pub results_discarded: usize,

    pub decks_attached: usize,
    pub cards_parsed: usize,
    pub warnings: usize,
    pub manifest_path: Option<PathBuf>,
}

/// Prints the summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Events:");
    println!("  Discovered: {}", summary.events_discovered);
    println!("  Persisted: {}", summary.events_persisted);
    println!();

    println!("Results:");
    println!("  Collected: {}", summary.results_collected);
    println!("  Discarded rows: {}", summary.results_discarded);
    println!("  Decks attached: {}", summary.decks_attached);
    println!("  Card lines parsed: {}", summary.cards_parsed);
    println!();

    if summary.warnings > 0 {
        println!("Warnings: {}", summary.warnings);
        println!();
    }

    if let Some(path) = &summary.manifest_path {
        println!("Manifest: {}", path.display());
    }
}
