//! Per-page results of a crawl run

use serde::Serialize;
use std::fmt;

/// A page that was fetched and sanitized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSuccess {
    /// Canonical effective URL of the page
    pub url: String,

    /// Sanitized content
    pub content: String,

    /// Length in bytes of the body before sanitizing
    #[serde(skip)]
    pub raw_length: usize,
}

/// Classification of a page failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The URL could not be parsed
    InvalidUrl,
    /// Network, timeout or non-success HTTP status
    Fetch,
    /// The response could not be read as an HTML document
    MalformedDocument,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::Fetch => "fetch",
            Self::MalformedDocument => "malformed_document",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page that could not be harvested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    /// The requested URL, or the effective URL when the failure happened
    /// after the response was received
    pub url: String,

    #[serde(skip)]
    pub kind: FailureKind,

    /// Underlying error detail
    pub error: String,
}

/// Terminal outcome of one page
///
/// Serializes as `{url, content}` or `{url, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageOutcome {
    Success(PageSuccess),
    Failure(PageFailure),
}

impl PageOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Success(success) => &success.url,
            Self::Failure(failure) => &failure.url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<PageSuccess> for PageOutcome {
    fn from(success: PageSuccess) -> Self {
        Self::Success(success)
    }
}

impl From<PageFailure> for PageOutcome {
    fn from(failure: PageFailure) -> Self {
        Self::Failure(failure)
    }
}

/// Aggregated outcomes of a finished run
///
/// The order inside each list carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    pub successful: Vec<PageSuccess>,
    pub failed: Vec<PageFailure>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Success(success) => self.successful.push(success),
            PageOutcome::Failure(failure) => self.failed.push(failure),
        }
    }

    /// Total number of outcomes
    pub fn len(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// URLs of every outcome, successes first
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.successful
            .iter()
            .map(|s| s.url.as_str())
            .chain(self.failed.iter().map(|f| f.url.as_str()))
    }

    /// Sorts both lists by URL
    pub fn sort(&mut self) {
        self.successful.sort_by(|a, b| a.url.cmp(&b.url));
        self.failed.sort_by(|a, b| a.url.cmp(&b.url));
    }
}
