//! Sumi-Harvest: a bounded, polite site harvester
//!
//! This crate crawls a web property inside a set of allowed domains. Seeds come
//! from the site's sitemaps (discovered through robots.txt) or from a root URL,
//! the frontier grows through in-page links, and every visited page is reported
//! either as sanitized content or as a classified failure.

pub mod config;
pub mod content;
pub mod crawler;
pub mod output;
pub mod request;
pub mod robots;
pub mod sitemap;
pub mod state;
pub mod url;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

/// Main error type for Sumi-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Invalid crawl request: {0}")]
    Request(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Missing domain in URL: {0}")]
    MissingDomain(String),
}

/// Result type alias for Sumi-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::content::sanitize;
pub use crate::crawler::{
    crawl, crawl_streaming, crawl_with_statistics, CrawlOptions, CrawlResult, PageOutcome,
};
pub use crate::request::CrawlRequest;
pub use crate::sitemap::{resolve_seeds, seeds_or_root};
pub use crate::state::{PageState, VisitedSet};
pub use crate::url::{canonicalize, extract_domain, AllowedDomains};
