use crate::config::types::{Config, CrawlerConfig, TargetConfig, UserAgentConfig};
use crate::url::{extract_domain, AllowedDomains};
use crate::ConfigError;
use url::Url;

/// Upper bound on simultaneous fetches
pub const MAX_CONCURRENCY: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_target_config(&config.target)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_limits(config.concurrency, config.max_pages_to_visit)
}

/// Checks the concurrency and page budget of a run
pub(crate) fn validate_limits(concurrency: usize, max_pages_to_visit: usize) -> Result<(), ConfigError> {
    if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, concurrency
        )));
    }

    if max_pages_to_visit < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_to_visit must be >= 1, got {}",
            max_pages_to_visit
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the crawl target
///
/// The root must be an HTTP(S) URL whose host is itself allowed, otherwise the
/// run could not fetch anything.
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    let root = parse_root_url(&config.root_url)?;
    let allowed = parse_valid_domains(&config.valid_domains)?;

    if !allowed.allows(&root) {
        return Err(ConfigError::Validation(format!(
            "root_url host '{}' is not covered by valid_domains",
            extract_domain(&root).unwrap_or_default()
        )));
    }

    Ok(())
}

/// Parses a crawl root, which must be an absolute HTTP(S) URL with a host
pub(crate) fn parse_root_url(root_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(root_url.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root_url '{}': {}", root_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "root_url '{}' must use HTTP or HTTPS",
            root_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "root_url '{}' has no host",
            root_url
        )));
    }

    Ok(url)
}

/// Parses the allow-list, which must not be empty
pub(crate) fn parse_valid_domains(domains: &[String]) -> Result<AllowedDomains, ConfigError> {
    if domains.is_empty() {
        return Err(ConfigError::Validation(
            "valid_domains must list at least one domain".to_string(),
        ));
    }

    AllowedDomains::new(domains)
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
