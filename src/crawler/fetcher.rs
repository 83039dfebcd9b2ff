//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with proper user agent strings
//! - Restricting requests, and the redirects they follow, to the configured hosts
//! - Pacing consecutive requests to the same host
//! - Fetching pages as text and decklist exports as raw bytes
//!
//! Every failure here is fatal to the run; there is no retry.

use crate::config::{Config, UserAgentConfig};
use crate::HarvestError;
use reqwest::header::LOCATION;
use reqwest::redirect::{Attempt, Policy};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// Redirects are only followed to hosts in `allowed_domains`; a redirect
/// anywhere else is handed back unfollowed. No request timeout is set: a hung
/// request holds the run until the server gives up.
///
/// # Example
///
/// ```no_run
/// use decklist_harvest::config::UserAgentConfig;
/// use decklist_harvest::crawler::build_http_client;
///
/// let allowed = vec!["www.mtgtop8.com".to_string()];
/// let client = build_http_client(&UserAgentConfig::default(), &allowed).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    allowed_domains: &[String],
) -> Result<Client, reqwest::Error> {
    let allowed_domains = allowed_domains.to_vec();
    let redirect_policy = Policy::custom(move |attempt: Attempt<'_>| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if is_allowed_host(&allowed_domains, attempt.url()) {
            attempt.follow()
        } else {
            attempt.stop()
        }
    });

    Client::builder()
        .user_agent(user_agent_string(config))
        .connect_timeout(Duration::from_secs(10))
        .redirect(redirect_policy)
        .gzip(true)
        .brotli(true)
        .build()
}

const MAX_REDIRECTS: usize = 10;

fn is_allowed_host(allowed_domains: &[String], url: &Url) -> bool {
    url.host_str()
        .map(|host| allowed_domains.iter().any(|allowed| allowed == host))
        .unwrap_or(false)
}

/// Format: CrawlerName/Version (+ContactURL; ContactEmail)
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Enforces a fixed minimum delay between requests to the same host
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    last_request: HashMap<String, Instant>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: HashMap::new(),
        }
    }

    /// Returns None if a request can be made now, or the duration to wait otherwise
    pub fn time_until_next_request(&self, host: &str, now: Instant) -> Option<Duration> {
        let last = self.last_request.get(host)?;
        let elapsed = now.saturating_duration_since(*last);
        (elapsed < self.delay).then(|| self.delay - elapsed)
    }

    /// Records that a request was made to `host`
    pub fn record_request(&mut self, host: &str, now: Instant) {
        self.last_request.insert(host.to_string(), now);
    }

    /// Sleeps until `host` may be requested again, then records the request
    pub async fn wait_turn(&mut self, host: &str) {
        if let Some(wait) = self.time_until_next_request(host, Instant::now()) {
            tracing::trace!("Pacing {} for {:?}", host, wait);
            tokio::time::sleep(wait).await;
        }
        self.record_request(host, Instant::now());
    }
}

/// Sequential, paced HTTP access to the results site
pub struct Fetcher {
    client: Client,
    allowed_domains: Vec<String>,
    pacer: Pacer,
}

impl Fetcher {
    /// Creates a fetcher from the harvest configuration
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent, &config.site.allowed_domains)
            .map_err(|source| HarvestError::Http {
                url: config.site.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            allowed_domains: config.site.allowed_domains.clone(),
            pacer: Pacer::new(Duration::from_millis(config.crawler.request_delay)),
        })
    }

    /// Fetches an HTML page as text
    pub async fn fetch_page(&mut self, url: &Url) -> Result<String, HarvestError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches a plain-text export as raw bytes
    pub async fn fetch_bytes(&mut self, url: &Url) -> Result<Vec<u8>, HarvestError> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    fn is_allowed(&self, url: &Url) -> bool {
        is_allowed_host(&self.allowed_domains, url)
    }

    /// Target of a redirect the client refused to follow, if it left the allowed hosts
    fn disallowed_redirect(&self, response: &Response) -> Option<Url> {
        if !response.status().is_redirection() {
            return None;
        }
        let location = response.headers().get(LOCATION)?.to_str().ok()?;
        let target = response.url().join(location).ok()?;
        (!self.is_allowed(&target)).then_some(target)
    }

    async fn get(&mut self, url: &Url) -> Result<Response, HarvestError> {
        if !self.is_allowed(url) {
            return Err(HarvestError::DisallowedDomain {
                url: url.to_string(),
            });
        }

        let host = url.host_str().unwrap_or_default().to_string();
        self.pacer.wait_turn(&host).await;

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        if let Some(target) = self.disallowed_redirect(&response) {
            tracing::warn!("{} redirects off the allowed hosts to {}", url, target);
            return Err(HarvestError::DisallowedDomain {
                url: target.to_string(),
            });
        }
        if !self.is_allowed(response.url()) {
            return Err(HarvestError::DisallowedDomain {
                url: response.url().to_string(),
            });
        }

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}
