//! Extraction of events, results and decklists from fetched pages
//!
//! This module holds the pure part of the harvester: nothing here performs
//! I/O. It includes:
//! - Building the event registry from the format index page
//! - Collecting result stubs from an event page
//! - Parsing plain-text decklist exports
//!
//! None of the source pages are self-describing, so every extractor relies
//! on element order and class names. Anything that cannot be read is reported
//! as a `ParseWarning` next to the data instead of failing the run.

mod decklist;
mod index;
mod results;

pub use decklist::{parse_decklist, DecklistParser, ParsedDeck, SIDEBOARD_MARKER};
pub use index::{build_event_index, IndexScan};
pub use results::{collect_results, ResultScan};

use crate::ExtractError;
use scraper::{ElementRef, Selector};
use thiserror::Error;
use url::Url;

/// Class and attribute values the site's markup is read by
pub mod markup {
    /// Class of a populated row in the event table of the index page
    pub const EVENT_ROW_CLASS: &str = "hover_tr";

    /// Class of the cell holding an event's date
    pub const DATE_CELL_CLASS: &str = "S12";

    /// Image source of one star in the event level column
    pub const STAR_ICON_SRC: &str = "/graph/star.png";

    /// Result rows of an event page, currently selected variant
    pub const CHOSEN_RESULT_ROW: &str = "div.chosen_tr";

    /// Result rows of an event page, plain variant
    pub const HOVER_RESULT_ROW: &str = "div.hover_tr";

    /// Text blocks of a result row: rank first, then deck title
    pub const RESULT_TEXT_BLOCK: &str = "div.S14";

    /// Player name of a result row
    pub const PLAYER_NAME: &str = "div.G11";

    /// Query parameter carrying the event id
    pub const EVENT_ID_PARAM: &str = "e";

    /// Query parameter carrying the format code
    pub const FORMAT_PARAM: &str = "f";

    /// Query parameter carrying the decklist id
    pub const DECK_ID_PARAM: &str = "d";
}

/// A recoverable problem met while extracting data
///
/// Warnings never stop extraction; the affected link, row or line is either
/// skipped or recorded with a fallback value, as each variant describes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// A link's href could not be resolved to a URL; the link was skipped
    #[error("Unparseable link '{href}': {reason}")]
    InvalidLink { href: String, reason: String },

    /// An event-defining link carried no event id; the link was skipped
    #[error("Event link without an event id: '{href}'")]
    MissingEventId { href: String },

    /// An event id could not be used as a directory name; the link was skipped
    #[error("Event id '{event_id}' contains a path separator or '..'")]
    UnsafeEventId { event_id: String },

    /// An event page was not registered from the index; its results were skipped
    #[error("Event page for unknown event id '{event_id}'")]
    UnknownEvent { event_id: String },

    /// A decklist line had a non-numeric quantity; the card was kept with quantity 0
    #[error("Invalid quantity '{token}' in decklist line '{line}'")]
    InvalidQuantity { line: String, token: String },

    /// A decklist line had no space between quantity and name; the line was skipped
    #[error("Decklist line without a separator: '{line}'")]
    MissingSeparator { line: String },
}

/// Compiles a CSS selector, turning the parser's borrowed error into an owned one
pub(crate) fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// All descendant text of an element, trimmed
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves `href` against the page it was found on
pub(crate) fn resolve_href(page_url: &Url, href: &str) -> Result<Url, ParseWarning> {
    page_url
        .join(href.trim())
        .map_err(|e| ParseWarning::InvalidLink {
            href: href.to_string(),
            reason: e.to_string(),
        })
}

/// Value of a query parameter, or `None` when it is missing or empty
pub fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
