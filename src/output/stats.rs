//! Run statistics
//!
//! Collected by the coordinator while a crawl runs and printed by the binary
//! once it finishes.

use crate::crawler::FailureKind;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished, once it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Completed fetches, i.e. consumed page budget
    pub pages_fetched: u64,

    /// Success outcomes emitted
    pub successes: u64,

    /// Failure outcomes emitted, by classification
    pub failures_by_kind: HashMap<FailureKind, u64>,

    /// Responses dropped because their effective URL was already reported
    pub duplicates_discarded: u64,

    /// Queued URLs dropped once the page budget was reached
    pub skipped_by_budget: u64,

    /// Links found on successfully fetched pages
    pub links_discovered: u64,

    /// Distinct domains a fetch started against
    pub unique_domains: u64,
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStatistics {
    /// Starts a statistics record at the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            successes: 0,
            failures_by_kind: HashMap::new(),
            duplicates_discarded: 0,
            skipped_by_budget: 0,
            links_discovered: 0,
            unique_domains: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.successes += 1;
    }

    pub fn record_failure(&mut self, kind: FailureKind) {
        *self.failures_by_kind.entry(kind).or_insert(0) += 1;
    }

    /// Total failure outcomes
    pub fn failures(&self) -> u64 {
        self.failures_by_kind.values().sum()
    }

    /// Total outcomes emitted
    pub fn outcomes(&self) -> u64 {
        self.successes + self.failures()
    }

    /// Marks the run finished at the current time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of a finished run
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for crawl results.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        eprintln!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(elapsed) = stats.elapsed() {
        eprintln!("  Duration: {:.3}s", elapsed.num_milliseconds() as f64 / 1000.0);
    }
    eprintln!("  Pages fetched: {}", stats.pages_fetched);
    eprintln!("  Unique domains: {}", stats.unique_domains);
    eprintln!("  Links discovered: {}", stats.links_discovered);
    eprintln!();

    eprintln!("Outcomes:");
    eprintln!("  Successful: {}", stats.successes);
    eprintln!("  Failed: {}", stats.failures());

    let mut failure_counts: Vec<_> = stats.failures_by_kind.iter().collect();
    failure_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    for (kind, count) in failure_counts {
        eprintln!("    {}: {}", kind, count);
    }
    eprintln!();

    if stats.duplicates_discarded > 0 || stats.skipped_by_budget > 0 {
        eprintln!("Not reported:");
        eprintln!("  Duplicate pages discarded: {}", stats.duplicates_discarded);
        eprintln!("  Dropped by page budget: {}", stats.skipped_by_budget);
        eprintln!();
    }

    let success_rate = if stats.outcomes() > 0 {
        (stats.successes as f64 / stats.outcomes() as f64) * 100.0
    } else {
        0.0
    };

    eprintln!(
        "Success Rate: {:.1}% ({} / {} pages successfully harvested)",
        success_rate,
        stats.successes,
        stats.outcomes()
    );
}
