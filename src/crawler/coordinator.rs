//! Harvest coordinator - the three-stage crawl
//!
//! This module drives one run, strictly in order and one request at a time:
//! - Fetch the format index and build the event registry
//! - For each event: fetch its page and collect results
//! - For each result: fetch and parse the decklist export
//! - Write the event document, then, after all events, the manifest
//!
//! Any fetch, serialization or filesystem error aborts the run. Event
//! documents already written stay on disk; the manifest is only written
//! once every event has been persisted.

use crate::config::Config;
use crate::crawler::Fetcher;
use crate::extract::{build_event_index, collect_results, parse_decklist, ParseWarning};
use crate::model::{Event, EventList, EventRegistry, EventStage};
use crate::output::{HarvestSummary, JsonStore};
use crate::HarvestError;
use std::time::Instant;
use url::Url;

/// Main harvest coordinator structure
pub struct Harvester {
    config: Config,
    base_url: Url,
    fetcher: Fetcher,
    store: JsonStore,
    registry: EventRegistry,
    summary: HarvestSummary,
}

impl Harvester {
    /// Creates a new harvester for the given configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The base URL or HTTP client could not be set up
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let fetcher = Fetcher::new(&config)?;
        let store = JsonStore::new(&config.output);

        Ok(Self {
            config,
            base_url,
            fetcher,
            store,
            registry: EventRegistry::new(),
            summary: HarvestSummary::default(),
        })
    }

    /// URL of the format index page, e.g. `format?f=EDH&meta=209&a=`
    pub fn index_url(&self) -> Result<Url, HarvestError> {
        let mut url = self.base_url.join("format")?;
        url.query_pairs_mut()
            .append_pair("f", &self.config.site.format)
            .append_pair("meta", &self.config.site.meta)
            .append_pair("a", "");
        Ok(url)
    }

    /// URL of the plain-text export for one decklist, e.g. `mtgo?d=600123`
    pub fn decklist_url(&self, result_id: &str) -> Result<Url, HarvestError> {
        let mut url = self.base_url.join(&self.config.site.decklist_path)?;
        url.query_pairs_mut().append_pair("d", result_id);
        Ok(url)
    }

    /// The events gathered so far
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Runs the whole harvest
    pub async fn run(&mut self) -> Result<HarvestSummary, HarvestError> {
        let start_time = Instant::now();

        let index_url = self.discover_events().await?;

        let mut manifest = EventList::new(self.config.site.meta.clone());
        let event_ids = self.registry.ids();
        let total = event_ids.len();

        for (position, event_id) in event_ids.iter().enumerate() {
            tracing::info!("Harvesting event {} ({}/{})", event_id, position + 1, total);
            self.harvest_event(&index_url, event_id, &mut manifest)
                .await?;
        }

        let manifest_path = self.store.write_manifest(&manifest)?;
        tracing::info!(
            "Manifest with {} events written to {}",
            manifest.events.len(),
            manifest_path.display()
        );
        self.summary.manifest_path = Some(manifest_path);

        tracing::info!(
            "Harvest completed: {} events, {} decks in {:?}",
            self.summary.events_persisted,
            self.summary.decks_attached,
            start_time.elapsed()
        );

        Ok(self.summary.clone())
    }

    /// Stage 1: fetch the format index and fill the registry
    async fn discover_events(&mut self) -> Result<Url, HarvestError> {
        let index_url = self.index_url()?;
        tracing::info!("Fetching format index {}", index_url);

        let html = self.fetcher.fetch_page(&index_url).await?;
        let scan = build_event_index(
            &html,
            &index_url,
            &self.config.site.event_prefix,
            &mut self.registry,
        )?;
        self.record_warnings(index_url.as_str(), &scan.warnings);

        self.summary.events_discovered = self.registry.len();
        tracing::info!(
            "Discovered {} events from {} index rows",
            self.registry.len(),
            scan.rows_seen
        );

        Ok(index_url)
    }

    /// Stages 2-4 for a single event
    async fn harvest_event(
        &mut self,
        index_url: &Url,
        event_id: &str,
        manifest: &mut EventList,
    ) -> Result<(), HarvestError> {
        let page_url = index_url.join(&event_mut(&mut self.registry, event_id)?.link)?;
        let html = self.fetcher.fetch_page(&page_url).await?;

        let scan = collect_results(&html, &page_url, &mut self.registry)?;
        self.record_warnings(page_url.as_str(), &scan.warnings);
        self.summary.results_collected += scan.appended;
        self.summary.results_discarded += scan.discarded;
        tracing::debug!(
            "Event {}: {} results, {} rows discarded",
            event_id,
            scan.appended,
            scan.discarded
        );

        let event = event_mut(&mut self.registry, event_id)?;
        event.advance(EventStage::ResultsCollected)?;
        let result_ids: Vec<String> = event.results.iter().map(|r| r.id.clone()).collect();

        for (index, result_id) in result_ids.iter().enumerate() {
            let deck_url = self.decklist_url(result_id)?;
            let raw = self.fetcher.fetch_bytes(&deck_url).await?;
            let parsed = parse_decklist(&raw);
            self.record_warnings(deck_url.as_str(), &parsed.warnings);

            tracing::debug!(
                "Deck {}: {} cards, {} commanders",
                result_id,
                parsed.deck.list.len(),
                parsed.deck.commanders.len()
            );
            self.summary.cards_parsed += parsed.deck.list.len();
            self.summary.decks_attached += 1;
            event_mut(&mut self.registry, event_id)?.results[index].deck = Some(parsed.deck);
        }

        let event = event_mut(&mut self.registry, event_id)?;
        event.advance(EventStage::DecksAttached)?;

        let path = self.store.write_event(event)?;
        event.advance(EventStage::Persisted)?;
        tracing::info!("Event {} written to {}", event_id, path.display());

        manifest.push(path.to_string_lossy());
        self.summary.events_persisted += 1;
        Ok(())
    }

    fn record_warnings(&mut self, source: &str, warnings: &[ParseWarning]) {
        for warning in warnings {
            tracing::warn!("{}: {}", source, warning);
        }
        self.summary.warnings += warnings.len();
    }
}

fn event_mut<'a>(
    registry: &'a mut EventRegistry,
    event_id: &str,
) -> Result<&'a mut Event, HarvestError> {
    registry
        .get_mut(event_id)
        .ok_or_else(|| HarvestError::MissingEvent {
            event_id: event_id.to_string(),
        })
}

/// Runs a complete harvest with the given configuration
pub async fn run_harvest(config: Config) -> Result<HarvestSummary, HarvestError> {
    let mut harvester = Harvester::new(config)?;
    harvester.run().await
}
