//! Data model for harvested tournaments
//!
//! # Components
//!
//! - `Event`, `EventResult`, `Deck`, `DeckElement`: the records written to disk
//! - `EventList`: the manifest of event documents for one run
//! - `EventStage`: how far an event has progressed through the run
//! - `EventRegistry`: the ordered, id-keyed owner of every event in a run

mod records;
mod registry;
mod stage;

pub use records::{Deck, DeckElement, Event, EventList, EventResult};
pub use registry::EventRegistry;
pub use stage::EventStage;
