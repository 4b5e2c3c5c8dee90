use crate::url::AllowedDomains;
use std::time::Duration;

/// Default number of simultaneous fetches
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default page budget
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Immutable input of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Seed URLs, in order
    pub seeds: Vec<String>,

    /// Domains fetches may target
    pub allowed_domains: AllowedDomains,

    /// Maximum simultaneous fetches
    pub concurrency: usize,

    /// Maximum link distance from a seed; `None` is unbounded
    pub max_depth: Option<u32>,

    /// Minimum time between the starts of two fetches to one domain
    pub min_time_between: Duration,

    /// Page budget: completed fetches, successful or not
    pub max_pages_to_visit: usize,
}

impl CrawlOptions {
    /// Options with default limits and no politeness delay
    pub fn new<I, S>(seeds: I, allowed_domains: AllowedDomains) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
            allowed_domains,
            concurrency: DEFAULT_CONCURRENCY,
            max_depth: None,
            min_time_between: Duration::ZERO,
            max_pages_to_visit: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_time_between(mut self, min_time_between: Duration) -> Self {
        self.min_time_between = min_time_between;
        self
    }

    pub fn with_max_pages_to_visit(mut self, max_pages_to_visit: usize) -> Self {
        self.max_pages_to_visit = max_pages_to_visit;
        self
    }

    /// Returns true if a page at `depth` may still have its links followed
    pub fn follows_links_at(&self, depth: u32) -> bool {
        self.max_depth.map_or(true, |max| depth < max)
    }
}
