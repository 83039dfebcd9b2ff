//! Event registry construction from the format index page
//!
//! Each populated table row describes one event, but its cells carry no
//! labels. A row is read left to right:
//!
//! | Element | Before identity | After identity |
//! |---------|-----------------|----------------|
//! | link starting with the event prefix | defines id, format, title | location |
//! | any other link | ignored | location (last one wins) |
//! | date cell | read for links and stars | date |
//! | star image | level + 1 | level + 1 |
//!
//! The event-defining link itself never sets the location, so a row with a
//! single link has an empty location rather than repeating the title.

use crate::extract::markup::{
    DATE_CELL_CLASS, EVENT_ID_PARAM, EVENT_ROW_CLASS, FORMAT_PARAM, STAR_ICON_SRC,
};
use crate::extract::{query_param, resolve_href, selector, text_of, ParseWarning};
use crate::model::{Event, EventRegistry};
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Outcome of scanning one index page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexScan {
    /// Rows carrying the populated-row class
    pub rows_seen: usize,

    /// Events that were not in the registry before this scan
    pub events_added: usize,

    pub warnings: Vec<ParseWarning>,
}

/// Compiled selectors used while walking a row
struct RowSelectors {
    cell: Selector,
    link: Selector,
    image: Selector,
}

/// Per-row scan state
///
/// `identity_resolved` flips once, on the event-defining link; the date cell
/// and location links only count after that point.
struct RowScan<'a> {
    page_url: &'a Url,
    event_prefix: &'a str,
    event: Event,
    identity_resolved: bool,
}

impl<'a> RowScan<'a> {
    fn new(page_url: &'a Url, event_prefix: &'a str) -> Self {
        Self {
            page_url,
            event_prefix,
            event: Event::default(),
            identity_resolved: false,
        }
    }

    fn scan_cell(
        &mut self,
        cell: ElementRef<'_>,
        selectors: &RowSelectors,
        warnings: &mut Vec<ParseWarning>,
    ) {
        if self.identity_resolved && cell.value().attr("class") == Some(DATE_CELL_CLASS) {
            self.event.date = text_of(cell);
            return;
        }

        for link in cell.select(&selectors.link) {
            let href = link.value().attr("href").unwrap_or_default();

            if !self.identity_resolved && href.starts_with(self.event_prefix) {
                if let Err(warning) = self.resolve_identity(href, link) {
                    warnings.push(warning);
                }
                continue;
            }

            if self.identity_resolved {
                self.event.location = text_of(link);
            }
        }

        for image in cell.select(&selectors.image) {
            if image.value().attr("src") == Some(STAR_ICON_SRC) {
                self.event.level += 1;
            }
        }
    }

    fn resolve_identity(&mut self, href: &str, link: ElementRef<'_>) -> Result<(), ParseWarning> {
        let url = resolve_href(self.page_url, href)?;
        let id = query_param(&url, EVENT_ID_PARAM).ok_or_else(|| ParseWarning::MissingEventId {
            href: href.to_string(),
        })?;
        if !is_safe_event_id(&id) {
            return Err(ParseWarning::UnsafeEventId { event_id: id });
        }

        self.event.id = id;
        self.event.link = href.to_string();
        self.event.format = query_param(&url, FORMAT_PARAM).unwrap_or_default();
        self.event.title = text_of(link);
        self.event.results = Vec::new();
        self.identity_resolved = true;
        Ok(())
    }

    fn finish(self) -> Option<Event> {
        self.identity_resolved.then_some(self.event)
    }
}

/// Event ids name a directory on disk, so they may not walk out of it
fn is_safe_event_id(id: &str) -> bool {
    !id.contains(['/', '\\']) && !id.contains("..")
}

/// Scans the format index page and registers every event it lists
///
/// Rows without an event-defining link never reach the registry, so the
/// registry grows by at most one entry per row.
///
/// # Arguments
///
/// * `html` - The index page content
/// * `page_url` - URL the page was fetched from, for resolving relative links
/// * `event_prefix` - Href prefix of event-defining links (e.g. "event")
/// * `registry` - The run's event registry
///
/// # Returns
///
/// * `Ok(IndexScan)` - Counts and warnings for the page
/// * `Err(ExtractError)` - A built-in selector failed to compile
pub fn build_event_index(
    html: &str,
    page_url: &Url,
    event_prefix: &str,
    registry: &mut EventRegistry,
) -> Result<IndexScan, ExtractError> {
    let document = Html::parse_document(html);
    let row_selector = selector("tr")?;
    let selectors = RowSelectors {
        cell: selector("td")?,
        link: selector("a[href]")?,
        image: selector("img[src]")?,
    };

    let mut scan = IndexScan::default();

    for row in document.select(&row_selector) {
        if row.value().attr("class") != Some(EVENT_ROW_CLASS) {
            continue;
        }
        scan.rows_seen += 1;

        let mut row_scan = RowScan::new(page_url, event_prefix);
        for cell in row.select(&selectors.cell) {
            row_scan.scan_cell(cell, &selectors, &mut scan.warnings);
        }

        match row_scan.finish() {
            Some(event) => {
                tracing::trace!("Index row defines event {} ({})", event.id, event.title);
                if registry.upsert(event) {
                    scan.events_added += 1;
                }
            }
            None => tracing::trace!("Index row without an event link skipped"),
        }
    }

    Ok(scan)
}
