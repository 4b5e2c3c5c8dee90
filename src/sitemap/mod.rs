//! Sitemap Resolver
//!
//! Turns a site root into seed URLs by following the sitemaps its robots.txt
//! declares. See [`SitemapResolver::resolve_seeds`].

mod parser;
mod resolver;

pub use parser::{parse_sitemap, SitemapDocument};
pub use resolver::{resolve_seeds, seeds_or_root, SitemapResolver};

use crate::crawler::FetchError;
use crate::UrlError;
use thiserror::Error;

/// Errors raised while resolving seeds from sitemaps
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SitemapError {
    #[error("robots.txt unavailable at {url}: {reason}")]
    RobotsUnavailable { url: String, reason: String },

    #[error("Failed to fetch sitemap: {0}")]
    Fetch(#[from] FetchError),

    #[error("Unrecognized sitemap document at {url}")]
    Parse { url: String },

    #[error("Invalid site root: {0}")]
    InvalidUrl(#[from] UrlError),
}
