//! Decklist-Harvest: a tournament results and decklist harvester
//!
//! This crate crawls a card-game results site in three stages (format index,
//! event pages, plain-text decklist exports) and writes one JSON document per
//! event plus a manifest listing them.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL outside the allowed domains: {url}")]
    DisallowedDomain { url: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event {event_id} is not in the registry")]
    MissingEvent { event_id: String },

    #[error("Invalid stage transition for event {event_id}: {from} -> {to}")]
    InvalidTransition {
        event_id: String,
        from: model::EventStage,
        to: model::EventStage,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by the extraction layer itself (not by the pages it reads)
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{parse_decklist, ParseWarning};
pub use model::{Deck, DeckElement, Event, EventList, EventRegistry, EventResult, EventStage};
