//! Plain-text decklist parser
//!
//! The export is one card per CRLF-terminated line, `<quantity> <name>`.
//! A bare "Sideboard" line opens the second zone, which for commander decks
//! holds the commanders rather than reserve cards. Cards after the marker
//! stay in the main list (flagged) and are also listed as commanders.

use crate::extract::ParseWarning;
use crate::model::{Deck, DeckElement};

/// Line that separates the main deck from the commander zone
pub const SIDEBOARD_MARKER: &str = "Sideboard";

/// Which part of the export the parser is in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Zone {
    #[default]
    BeforeMarker,
    AfterMarker,
}

/// A parsed deck together with the lines that could not be read cleanly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDeck {
    pub deck: Deck,
    pub warnings: Vec<ParseWarning>,
}

/// Line-by-line decklist parser
///
/// The zone only ever moves forward: once the marker is seen every later
/// card is a commander.
#[derive(Debug, Default)]
pub struct DecklistParser {
    zone: Zone,
    deck: Deck,
    warnings: Vec<ParseWarning>,
}

impl DecklistParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line, without its terminator
    pub fn feed_line(&mut self, line: &[u8]) {
        if line == SIDEBOARD_MARKER.as_bytes() {
            self.zone = Zone::AfterMarker;
            return;
        }

        let Some(split) = line.iter().position(|&b| b == b' ') else {
            if !line.is_empty() {
                self.warnings.push(ParseWarning::MissingSeparator {
                    line: String::from_utf8_lossy(line).into_owned(),
                });
            }
            return;
        };

        let (token, name) = (&line[..split], &line[split + 1..]);
        let name = String::from_utf8_lossy(name).into_owned();

        let quantity = match std::str::from_utf8(token)
            .ok()
            .and_then(|token| token.parse::<u32>().ok())
        {
            Some(quantity) => quantity,
            None => {
                self.warnings.push(ParseWarning::InvalidQuantity {
                    line: String::from_utf8_lossy(line).into_owned(),
                    token: String::from_utf8_lossy(token).into_owned(),
                });
                0
            }
        };

        let is_commander = self.zone == Zone::AfterMarker;
        if is_commander {
            self.deck.commanders.push(name.clone());
        }

        self.deck.list.push(DeckElement {
            quantity,
            name,
            is_commander,
        });
    }

    pub fn finish(self) -> ParsedDeck {
        ParsedDeck {
            deck: self.deck,
            warnings: self.warnings,
        }
    }
}

/// Parses a raw decklist export
///
/// # Example
///
/// ```
/// use decklist_harvest::parse_decklist;
///
/// let parsed = parse_decklist(b"1 Sol Ring\r\nSideboard\r\n1 Kenrith, the Returned King");
/// assert_eq!(parsed.deck.list.len(), 2);
/// assert_eq!(parsed.deck.commanders, vec!["Kenrith, the Returned King"]);
/// ```
pub fn parse_decklist(raw: &[u8]) -> ParsedDeck {
    let mut parser = DecklistParser::new();
    for line in crlf_lines(raw) {
        parser.feed_line(line);
    }
    parser.finish()
}

/// Splits on the CR-LF byte pair only; a lone CR or LF stays in the line
fn crlf_lines(raw: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i + 1 < raw.len() {
        if raw[i] == b'\r' && raw[i + 1] == b'\n' {
            lines.push(&raw[start..i]);
            i += 2;
            start = i;
        } else {
            i += 1;
        }
    }
    lines.push(&raw[start..]);

    lines
}
