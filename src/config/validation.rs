use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    for (name, value) in [
        ("format", &config.format),
        ("meta", &config.meta),
        ("event-prefix", &config.event_prefix),
        ("decklist-path", &config.decklist_path),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed-domains must list at least one host".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_delay < 100 {
        return Err(ConfigError::Validation(format!(
            "request-delay must be >= 100ms, got {}ms",
            config.request_delay
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)
}

/// Basic email shape check: exactly one '@' with text on both sides
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "contact-email is not a valid address: '{}'",
            email
        ))),
    }
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("format-code", &config.format_code),
        ("season", &config.season),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
        if value.contains('/') || value.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "{} must be a single path segment, got '{}'",
                name, value
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_base_url() {
        let mut config = Config::default();
        config.site.base_url = "ftp://www.mtgtop8.com/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_format() {
        let mut config = Config::default();
        config.site.format = "  ".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_no_allowed_domains() {
        let mut config = Config::default();
        config.site.allowed_domains.clear();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_request_delay_too_small() {
        let mut config = Config::default();
        config.crawler.request_delay = 99;
        assert!(validate(&config).is_err());

        config.crawler.request_delay = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_crawler_name() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "Bad Name!".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_email() {
        for email in ["nobody", "@example.com", "a@", "a@b@c"] {
            let mut config = Config::default();
            config.user_agent.contact_email = email.to_string();
            assert!(validate(&config).is_err(), "accepted '{}'", email);
        }
    }

    #[test]
    fn test_season_must_be_single_segment() {
        let mut config = Config::default();
        config.output.season = "2024/25".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }
}
