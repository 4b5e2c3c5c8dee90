//! Crawl request surface
//!
//! A crawl request is the JSON document a caller submits to start a run:
//!
//! ```json
//! {
//!   "rootUrl": "https://example.com/",
//!   "validDomains": ["example.com"],
//!   "concurrency": 4,
//!   "maxDepth": 0,
//!   "minTimeBetween": 250,
//!   "maxPagesToVisit": 100
//! }
//! ```
//!
//! `minTimeBetween` is in milliseconds. `maxDepth` of zero, a negative value,
//! or no value at all means the link depth is unbounded.

use crate::config::{parse_root_url, parse_valid_domains, validate_limits, Config};
use crate::crawler::CrawlOptions;
use crate::HarvestError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One crawl request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    pub root_url: String,
    pub valid_domains: Vec<String>,
    pub concurrency: usize,
    #[serde(default)]
    pub max_depth: Option<i64>,
    /// Milliseconds between request starts to one domain
    #[serde(default)]
    pub min_time_between: u64,
    pub max_pages_to_visit: usize,
}

impl CrawlRequest {
    /// Parses a request from JSON
    pub fn from_json(json: &str) -> Result<Self, HarvestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the request a configuration file describes
    pub fn from_config(config: &Config) -> Self {
        Self {
            root_url: config.target.root_url.clone(),
            valid_domains: config.target.valid_domains.clone(),
            concurrency: config.crawler.concurrency,
            max_depth: config.crawler.max_depth,
            min_time_between: config.crawler.min_time_between,
            max_pages_to_visit: config.crawler.max_pages_to_visit,
        }
    }

    /// Checks the root URL, the domain allow-list and the run limits
    pub fn validate(&self) -> Result<(), HarvestError> {
        parse_root_url(&self.root_url)?;
        parse_valid_domains(&self.valid_domains)?;
        validate_limits(self.concurrency, self.max_pages_to_visit)?;
        Ok(())
    }

    /// Maximum link depth; `None` is unbounded
    pub fn depth_limit(&self) -> Option<u32> {
        depth_limit(self.max_depth)
    }

    pub fn min_time_between(&self) -> Duration {
        Duration::from_millis(self.min_time_between)
    }

    /// Validates the request and turns it into options for a run over `seeds`
    pub fn into_options(self, seeds: Vec<String>) -> Result<CrawlOptions, HarvestError> {
        self.validate()?;

        let allowed_domains = parse_valid_domains(&self.valid_domains)?;

        Ok(CrawlOptions::new(seeds, allowed_domains)
            .with_concurrency(self.concurrency)
            .with_max_depth(self.depth_limit())
            .with_min_time_between(self.min_time_between())
            .with_max_pages_to_visit(self.max_pages_to_visit))
    }
}

/// Interprets a raw depth setting: absent or non-positive is unbounded
pub fn depth_limit(raw: Option<i64>) -> Option<u32> {
    raw.filter(|depth| *depth > 0)
        .map(|depth| u32::try_from(depth).unwrap_or(u32::MAX))
}
