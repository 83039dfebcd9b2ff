use serde::Deserialize;

/// Main configuration structure for Decklist-Harvest
///
/// Every section falls back to its defaults, so an empty file (or no file
/// at all) targets the EDH meta the harvester was first written for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root URL of the results site; every other path is joined onto it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Format code sent as the `f` query parameter of the index page
    pub format: String,

    /// Meta grouping sent as the `meta` query parameter; doubles as the manifest id
    pub meta: String,

    /// Hosts the harvester is allowed to fetch from
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Href prefix of the link that defines an event on the index page
    #[serde(rename = "event-prefix")]
    pub event_prefix: String,

    /// Path of the plain-text decklist export endpoint
    #[serde(rename = "decklist-path")]
    pub decklist_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.mtgtop8.com/".to_string(),
            format: "EDH".to_string(),
            meta: "209".to_string(),
            allowed_domains: vec!["www.mtgtop8.com".to_string(), "mtgtop8.com".to_string()],
            event_prefix: "event".to_string(),
            decklist_path: "mtgo".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Minimum time between two requests to the site (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay: 1000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "decklist-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/decklist-harvest".to_string(),
            contact_email: "harvest@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for all harvested documents
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Directory name for the game format (e.g. "edh")
    #[serde(rename = "format-code")]
    pub format_code: String,

    /// Directory name for the season (e.g. "2024")
    pub season: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            format_code: "edh".to_string(),
            season: "2024".to_string(),
        }
    }
}
