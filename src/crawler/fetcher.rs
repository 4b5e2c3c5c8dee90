//! HTTP fetcher implementation
//!
//! The crawler depends only on the [`Fetcher`] trait; [`HttpFetcher`] is the
//! reqwest-backed implementation used by the binary.
//!
//! Each fetch is bounded by fixed per-request timeouts that are independent of
//! how long the crawl as a whole runs.

use crate::config::UserAgentConfig;
use crate::url::AllowedDomains;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, ClientBuilder};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Timeout applied to connection setup and to the whole request
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum redirect hops the transport follows before giving up
pub const MAX_REDIRECTS: usize = 10;

/// A response as seen by the crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL of the final response after any redirects the transport followed
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Raw `Location` header of the final response
    pub location: Option<String>,
    /// Raw `Content-Type` header of the final response
    pub content_type: Option<String>,
    /// Decoded response body
    pub body: String,
}

impl FetchedPage {
    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network, timeout and HTTP-level failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("{url} redirected to {target}, outside the allowed domains")]
    OffDomainRedirect { url: String, target: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    /// Classifies a reqwest error for the given URL
    pub fn from_reqwest(url: &Url, error: &reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// The fetch collaborator the crawler depends on
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs a GET request
    ///
    /// Non-2xx responses are returned as pages; only transport-level problems
    /// are errors.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Formats the crawler's user agent: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with the crawler's timeouts and user agent
///
/// # Example
///
/// ```no_run
/// use sumi_harvest::config::UserAgentConfig;
/// use sumi_harvest::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SumiHarvest".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    client_builder(config)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Builds an HTTP client that only follows redirects into `allowed`
///
/// A redirect to any other host is not followed; the 3xx response comes back
/// as is, with its `Location` header.
pub fn build_scoped_http_client(
    config: &UserAgentConfig,
    allowed: AllowedDomains,
) -> Result<Client, reqwest::Error> {
    let policy = Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if allowed.allows(attempt.url()) {
            attempt.follow()
        } else {
            tracing::debug!("Not following redirect to {}", attempt.url());
            attempt.stop()
        }
    });

    client_builder(config).redirect(policy).build()
}

fn client_builder(config: &UserAgentConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(FETCH_TIMEOUT)
        .connect_timeout(FETCH_TIMEOUT)
        .pool_idle_timeout(FETCH_TIMEOUT)
        .gzip(true)
        .brotli(true)
}

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client from [`build_http_client`]
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Builds a fetcher whose redirects stay inside `allowed`
    pub fn scoped(config: &UserAgentConfig, allowed: AllowedDomains) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_scoped_http_client(config, allowed)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let location = header_value(response.headers(), LOCATION);
        let content_type = header_value(response.headers(), CONTENT_TYPE);

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        tracing::trace!("Fetched {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchedPage {
            final_url,
            status,
            location,
            content_type,
            body,
        })
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
