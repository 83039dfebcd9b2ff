//! Result collection from an event page
//!
//! Result rows come in two container variants (the currently selected deck
//! and the others). Both share a layout: a run of text blocks whose first
//! entry is the rank and whose second is the deck title, with the decklist
//! link inside, plus a separate player-name element. Decorative rows reuse
//! the same containers but carry no decklist link, which is how they are
//! told apart.

use crate::extract::markup::{
    CHOSEN_RESULT_ROW, DECK_ID_PARAM, EVENT_ID_PARAM, HOVER_RESULT_ROW, PLAYER_NAME,
    RESULT_TEXT_BLOCK,
};
use crate::extract::{query_param, resolve_href, selector, text_of, ParseWarning};
use crate::model::{EventRegistry, EventResult};
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Outcome of scanning one event page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultScan {
    /// Event id taken from the page URL, when present
    pub event_id: Option<String>,

    /// Results appended to the event
    pub appended: usize,

    /// Containers dropped for lack of a decklist id
    pub discarded: usize,

    pub warnings: Vec<ParseWarning>,
}

struct ContainerSelectors {
    text_block: Selector,
    link: Selector,
    player: Selector,
}

/// Scans an event page and appends its results to the matching event
///
/// The event is found through the `e` query parameter of `page_url`. A page
/// whose event is not in the registry is reported and left untouched.
/// Selected-row containers are read before plain ones.
///
/// # Arguments
///
/// * `html` - The event page content
/// * `page_url` - URL the page was fetched from
/// * `registry` - The run's event registry
///
/// # Returns
///
/// * `Ok(ResultScan)` - Counts and warnings for the page
/// * `Err(ExtractError)` - A built-in selector failed to compile
pub fn collect_results(
    html: &str,
    page_url: &Url,
    registry: &mut EventRegistry,
) -> Result<ResultScan, ExtractError> {
    let mut scan = ResultScan {
        event_id: query_param(page_url, EVENT_ID_PARAM),
        ..ResultScan::default()
    };

    let event_id = scan.event_id.clone().unwrap_or_default();
    let Some(event) = registry.get_mut(&event_id) else {
        scan.warnings.push(ParseWarning::UnknownEvent { event_id });
        return Ok(scan);
    };

    let document = Html::parse_document(html);
    let selectors = ContainerSelectors {
        text_block: selector(RESULT_TEXT_BLOCK)?,
        link: selector("a[href]")?,
        player: selector(PLAYER_NAME)?,
    };

    for container_css in [CHOSEN_RESULT_ROW, HOVER_RESULT_ROW] {
        let container_selector = selector(container_css)?;
        for container in document.select(&container_selector) {
            match extract_result(container, page_url, &selectors, &mut scan.warnings) {
                Some(result) => {
                    tracing::trace!(
                        "Result {} ({}, {}) for event {}",
                        result.id,
                        result.rank,
                        result.player,
                        event.id
                    );
                    event.results.push(result);
                    scan.appended += 1;
                }
                None => scan.discarded += 1,
            }
        }
    }

    Ok(scan)
}

/// Reads one result container; `None` when it carries no decklist id
fn extract_result(
    container: ElementRef<'_>,
    page_url: &Url,
    selectors: &ContainerSelectors,
    warnings: &mut Vec<ParseWarning>,
) -> Option<EventResult> {
    let mut result = EventResult::default();

    for block in container.select(&selectors.text_block) {
        if result.rank.is_empty() {
            result.rank = text_of(block);
            continue;
        }

        if result.title.is_empty() {
            result.title = text_of(block);
        }

        for link in block.select(&selectors.link) {
            let href = link.value().attr("href").unwrap_or_default();
            match resolve_href(page_url, href) {
                Ok(url) => {
                    if let Some(id) = query_param(&url, DECK_ID_PARAM) {
                        result.id = id;
                    }
                }
                Err(warning) => warnings.push(warning),
            }
        }
    }

    result.player = container
        .select(&selectors.player)
        .next()
        .map(text_of)
        .unwrap_or_default();

    (!result.id.is_empty()).then_some(result)
}
