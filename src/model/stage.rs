//! Stage definitions for tracking an event through one harvest run
//!
//! Each event moves strictly forward through these stages; a failure aborts
//! the run rather than leaving an event to be resumed.

use std::fmt;

/// Represents how far an event has progressed in the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EventStage {
    /// Registered from the format index page
    #[default]
    Discovered,

    /// Event page visited and its results appended
    ResultsCollected,

    /// Every result's decklist fetched and parsed
    DecksAttached,

    /// Event document written to disk
    Persisted,
}

impl EventStage {
    /// Returns the stage that follows this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Discovered => Some(Self::ResultsCollected),
            Self::ResultsCollected => Some(Self::DecksAttached),
            Self::DecksAttached => Some(Self::Persisted),
            Self::Persisted => None,
        }
    }

    /// Only the immediate successor is a legal target
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.next() == Some(target)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::ResultsCollected => "results_collected",
            Self::DecksAttached => "decks_attached",
            Self::Persisted => "persisted",
        }
    }
}

impl fmt::Display for EventStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
