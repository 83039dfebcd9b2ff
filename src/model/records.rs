use crate::model::EventStage;
use crate::HarvestError;
use serde::Serialize;

/// One tournament, as listed on the format index page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Event {
    /// Value of the `e` query parameter of the event-defining link
    pub id: String,

    /// Raw href of the event-defining link, relative to the index page
    #[serde(skip)]
    pub link: String,

    /// Value of the `f` query parameter of the event-defining link
    pub format: String,

    /// Reserved: no page currently exposes this, always `false`
    pub is_online: bool,

    pub title: String,
    pub location: String,

    /// Number of star icons shown in the event row
    pub level: u32,

    /// Date exactly as published (e.g. "14/09/24")
    pub date: String,

    pub results: Vec<EventResult>,

    #[serde(skip)]
    pub stage: EventStage,
}

impl Event {
    /// Creates a freshly discovered event with no results
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Moves the event to `next`, refusing anything but the single forward step
    pub fn advance(&mut self, next: EventStage) -> Result<(), HarvestError> {
        if !self.stage.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                event_id: self.id.clone(),
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        Ok(())
    }

    /// Directory name for this event's document: the date, then the id,
    /// with every path separator turned into a hyphen
    ///
    /// The result is always a single path component.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.date.trim(), self.id).replace(['/', '\\'], "-")
    }
}

/// One competitor's placement within an event
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventResult {
    /// Value of the `d` query parameter of the decklist link
    pub id: String,
    pub title: String,
    pub player: String,

    /// Bracket label such as "1", "3-4" or "5-8"
    pub rank: String,

    /// `None` until the decklist export has been fetched and parsed
    pub deck: Option<Deck>,
}

/// A parsed decklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Deck {
    /// Names of the cards listed after the "Sideboard" marker, in order
    pub commanders: Vec<String>,

    /// Every card line of the export, in order, commanders included
    pub list: Vec<DeckElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckElement {
    pub quantity: u32,
    pub name: String,
    pub is_commander: bool,
}

/// Manifest of every event document written by one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventList {
    /// The meta grouping that was harvested
    pub id: String,

    /// Paths of the event documents, in the order they were written
    pub events: Vec<String>,
}

impl EventList {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, path: impl Into<String>) {
        self.events.push(path.into());
    }
}
