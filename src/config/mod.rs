//! Configuration module for Decklist-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; the defaults target the EDH meta on mtgtop8.
//!
//! # Example
//!
//! ```no_run
//! use decklist_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting meta {}", config.site.meta);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
pub use validation::validate;
