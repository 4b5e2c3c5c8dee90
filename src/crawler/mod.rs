//! Crawler module: the Crawl Orchestrator and its collaborators
//!
//! This module contains the core crawling logic, including:
//! - The fetch collaborator and its HTTP implementation
//! - Link extraction from fetched pages
//! - Frontier ordering, concurrency and per-domain politeness
//! - Overall crawl coordination and outcome delivery (batch or streaming)

mod coordinator;
mod fetcher;
mod options;
mod outcome;
mod parser;
mod scheduler;

pub use coordinator::{
    crawl, crawl_streaming, crawl_with_statistics, Coordinator, CrawlStream, CHANNEL_CAPACITY,
};
pub use fetcher::{
    build_http_client, build_scoped_http_client, user_agent_string, FetchError, FetchedPage,
    Fetcher, HttpFetcher, FETCH_TIMEOUT, MAX_REDIRECTS,
};
pub use options::{CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_MAX_PAGES};
pub use outcome::{CrawlResult, FailureKind, PageFailure, PageOutcome, PageSuccess};
pub use parser::extract_links;
pub use scheduler::{QueuedUrl, ScheduledFetch, Scheduler};
