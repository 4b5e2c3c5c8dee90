//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns one run: the frontier, the per-URL lifecycle, the
//! shared visited set and page budget, and the pool of worker tasks. Workers
//! fetch, sanitize and emit outcomes on their own; the coordinator only sees a
//! short report per visit and decides what to queue and dispatch next.
//!
//! Outcomes travel over two bounded channels, one for successes and one for
//! failures. Both close when the run ends. Batch mode is the same run with
//! both channels drained into a [`CrawlResult`].

use super::fetcher::{FetchError, FetchedPage, Fetcher};
use super::options::CrawlOptions;
use super::outcome::{CrawlResult, FailureKind, PageFailure, PageOutcome, PageSuccess};
use super::parser::extract_links;
use super::scheduler::{ScheduledFetch, Scheduler};
use crate::content::sanitize_body;
use crate::output::CrawlStatistics;
use crate::state::{PageBudget, PageState, VisitedSet};
use crate::url::{canonical_url, canonicalize_relative, extract_domain, AllowedDomains};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use url::Url;

/// Capacity of each outcome channel
pub const CHANNEL_CAPACITY: usize = 64;

/// How a single visit ended, as seen by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Succeeded,
    Failed(FailureKind),
    /// The effective URL had already been reported
    Duplicate,
    /// The budget was used up before any network I/O
    BudgetExhausted,
}

/// Why [`Coordinator::dispatch_ready`] stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchStop {
    /// The frontier is empty
    Idle,
    /// In-flight fetches already cover the rest of the budget
    Budget,
    /// Every concurrency slot is taken
    Capacity,
    /// Every queued domain is inside its politeness window
    Politeness,
}

#[derive(Debug)]
struct VisitReport {
    requested: String,
    depth: u32,
    disposition: Disposition,
    links: Vec<Url>,
}

/// State shared by every worker task of one run
struct Worker<F: ?Sized> {
    fetcher: Arc<F>,
    /// Redirects may not leave these domains
    allowed_domains: AllowedDomains,
    visited: VisitedSet,
    budget: PageBudget,
    successes: mpsc::Sender<PageSuccess>,
    failures: mpsc::Sender<PageFailure>,
}

impl<F> Worker<F>
where
    F: Fetcher + ?Sized,
{
    /// Fetches one URL and emits its outcome
    async fn visit(&self, url: Url, depth: u32, follow_links: bool) -> VisitReport {
        let requested = url.to_string();
        let report = |disposition, links| VisitReport {
            requested: requested.clone(),
            depth,
            disposition,
            links,
        };

        if self.budget.is_exhausted() {
            tracing::debug!("Page budget exhausted, not fetching {}", url);
            return report(Disposition::BudgetExhausted, Vec::new());
        }

        let fetched = self.fetcher.fetch(&url).await;
        self.budget.record_visit();
        tracing::trace!("{} page(s) left in budget after {}", self.budget.remaining(), url);

        let page = match fetched {
            Ok(page) => page,
            Err(error) => {
                let kind = self
                    .emit_failure(requested.clone(), FailureKind::Fetch, error.to_string())
                    .await;
                return report(Disposition::Failed(kind), Vec::new());
            }
        };

        let effective = effective_url(&url, &page);
        let effective_str = effective.to_string();

        if !self.allowed_domains.allows(&effective) {
            let error = FetchError::OffDomainRedirect {
                url: requested.clone(),
                target: effective_str,
            };
            let kind = self
                .emit_failure(requested.clone(), FailureKind::Fetch, error.to_string())
                .await;
            return report(Disposition::Failed(kind), Vec::new());
        }

        if !page.is_success() {
            let error = FetchError::HttpStatus {
                url: requested.clone(),
                status: page.status,
            };
            let kind = self
                .emit_failure(requested.clone(), FailureKind::Fetch, error.to_string())
                .await;
            return report(Disposition::Failed(kind), Vec::new());
        }

        if !self.visited.insert(&effective_str) {
            tracing::debug!(
                "{} resolved to already reported {}, discarding",
                requested,
                effective_str
            );
            return report(Disposition::Duplicate, Vec::new());
        }

        if effective_str != requested {
            tracing::debug!("{} resolved to {}", requested, effective_str);
        }

        match sanitize_body(&page.body, page.content_type.as_deref()) {
            Ok(content) => {
                let links = if follow_links {
                    extract_links(&page.body, &effective)
                } else {
                    Vec::new()
                };

                let success = PageSuccess {
                    url: effective_str,
                    content,
                    raw_length: page.body.len(),
                };
                tracing::info!("Harvested {} ({} bytes)", success.url, success.raw_length);
                if self.successes.send(success).await.is_err() {
                    tracing::debug!("Success receiver dropped for {}", requested);
                }

                report(Disposition::Succeeded, links)
            }
            Err(error) => {
                let kind = self
                    .emit_failure(effective_str, FailureKind::MalformedDocument, error.to_string())
                    .await;
                report(Disposition::Failed(kind), Vec::new())
            }
        }
    }

    async fn emit_failure(&self, url: String, kind: FailureKind, error: String) -> FailureKind {
        tracing::warn!("Failed {}: {}", url, error);

        let failure = PageFailure { url, kind, error };
        if let Err(mpsc::error::SendError(failure)) = self.failures.send(failure).await {
            tracing::debug!("Failure receiver dropped for {}", failure.url);
        }

        kind
    }
}

/// The URL a response stands for
///
/// A `Location` header pointing somewhere other than the requested URL wins;
/// otherwise the URL the transport ended on after following redirects. The
/// result is canonical.
fn effective_url(requested: &Url, page: &FetchedPage) -> Url {
    let redirect = page
        .location
        .as_deref()
        .and_then(|location| canonicalize_relative(&page.final_url, location).ok())
        .filter(|target| target != requested);

    redirect.unwrap_or_else(|| {
        let mut url = page.final_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url
    })
}

/// Main crawler coordinator structure
pub struct Coordinator<F: ?Sized> {
    options: CrawlOptions,
    fetcher: Arc<F>,
    scheduler: Scheduler,
    visited: VisitedSet,
    budget: PageBudget,
    /// Request gate: every canonical URL that entered the frontier
    states: HashMap<String, PageState>,
    stats: CrawlStatistics,
}

impl<F> Coordinator<F>
where
    F: Fetcher + ?Sized + 'static,
{
    /// Creates a coordinator for one run
    pub fn new(options: CrawlOptions, fetcher: Arc<F>) -> Self {
        let scheduler = Scheduler::new(options.concurrency, options.min_time_between);
        let budget = PageBudget::new(options.max_pages_to_visit);

        Self {
            options,
            fetcher,
            scheduler,
            visited: VisitedSet::new(),
            budget,
            states: HashMap::new(),
            stats: CrawlStatistics::new(),
        }
    }

    /// A handle to this run's visited set
    pub fn visited(&self) -> VisitedSet {
        self.visited.clone()
    }

    /// Runs the crawl to completion
    ///
    /// Outcomes are sent as they are produced. Both senders are dropped when
    /// this returns, which closes the channels.
    pub async fn run(
        mut self,
        successes: mpsc::Sender<PageSuccess>,
        failures: mpsc::Sender<PageFailure>,
    ) -> CrawlStatistics {
        tracing::info!(
            "Starting crawl: {} seed(s), concurrency {}, page budget {}, max depth {}",
            self.options.seeds.len(),
            self.options.concurrency,
            self.options.max_pages_to_visit,
            self.options
                .max_depth
                .map_or_else(|| "unbounded".to_string(), |d| d.to_string())
        );
        let start = Instant::now();

        let worker = Arc::new(Worker {
            fetcher: Arc::clone(&self.fetcher),
            allowed_domains: self.options.allowed_domains.clone(),
            visited: self.visited.clone(),
            budget: self.budget.clone(),
            successes,
            failures,
        });

        self.seed(&worker).await;

        let mut tasks: JoinSet<VisitReport> = JoinSet::new();

        loop {
            let stop = self.dispatch_ready(&worker, &mut tasks);

            if tasks.is_empty() && self.scheduler.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            // Otherwise only a finished task can unblock dispatch
            let wait = match stop {
                DispatchStop::Politeness => self.scheduler.time_until_ready(Instant::now()),
                DispatchStop::Idle | DispatchStop::Budget | DispatchStop::Capacity => None,
            };

            tokio::select! {
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => match joined {
                    Ok(report) => self.handle_report(report),
                    Err(e) => tracing::error!("Crawl worker failed: {}", e),
                },
                _ = tokio::time::sleep(wait.unwrap_or_default()), if wait.is_some() => {}
                else => break,
            }
        }

        drop(worker);

        self.stats.pages_fetched = self.budget.used() as u64;
        self.stats.unique_domains = self.scheduler.domain_count() as u64;
        self.stats.finish();

        tracing::info!(
            "Crawl finished in {:?}: {} successful, {} failed, {} page(s) fetched",
            start.elapsed(),
            self.stats.successes,
            self.stats.failures(),
            self.stats.pages_fetched
        );

        self.stats
    }

    /// Queues the seeds at depth 0
    ///
    /// A seed that is not a URL is reported as a failure right away.
    async fn seed(&mut self, worker: &Worker<F>) {
        let seeds = self.options.seeds.clone();

        for raw in seeds {
            match canonical_url(&raw) {
                Ok(url) => {
                    if !self.enqueue(url, 0) {
                        tracing::debug!("Seed {} not queued", raw);
                    }
                }
                Err(e) => {
                    let key = raw.trim().to_string();
                    if self.states.contains_key(&key) {
                        continue;
                    }
                    self.states.insert(key.clone(), PageState::Failed);

                    let kind = worker
                        .emit_failure(key, FailureKind::InvalidUrl, e.to_string())
                        .await;
                    self.stats.record_failure(kind);
                }
            }
        }

        tracing::debug!("Seeded frontier with {} URL(s)", self.scheduler.frontier_size());
    }

    /// Adds a URL to the frontier if it may still be fetched
    ///
    /// Returns true if the URL was queued.
    fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        if self.budget.is_exhausted() {
            tracing::trace!("Page budget exhausted, not queueing {}", url);
            return false;
        }

        if self.options.max_depth.is_some_and(|max| depth > max) {
            tracing::trace!("Depth {} exceeds limit, not queueing {}", depth, url);
            return false;
        }

        let Some(domain) = extract_domain(&url) else {
            tracing::debug!("Skipping {}: no host", url);
            return false;
        };

        if !self.options.allowed_domains.allows_domain(&domain) {
            tracing::debug!("Skipping {}: {} is not an allowed domain", url, domain);
            return false;
        }

        let key = url.to_string();
        if self.states.contains_key(&key) || self.visited.contains(&key) {
            return false;
        }

        self.transition(&key, PageState::Queued);
        self.scheduler.push(url, domain, depth);
        true
    }

    /// Dispatches every frontier URL that is allowed to start now
    ///
    /// Returns what stopped dispatching.
    fn dispatch_ready(
        &mut self,
        worker: &Arc<Worker<F>>,
        tasks: &mut JoinSet<VisitReport>,
    ) -> DispatchStop {
        while !self.scheduler.is_empty() {
            if self.budget.is_exhausted() {
                let dropped = self.scheduler.drain();
                tracing::info!(
                    "Page budget of {} reached, dropping {} queued URL(s)",
                    self.budget.limit(),
                    dropped.len()
                );
                for queued in dropped {
                    self.transition(queued.url.as_str(), PageState::Skipped);
                    self.stats.skipped_by_budget += 1;
                }
                return DispatchStop::Idle;
            }

            // Every in-flight fetch will consume budget when it completes
            if self.budget.used() + tasks.len() >= self.budget.limit() {
                return DispatchStop::Budget;
            }

            if !self.scheduler.has_capacity() {
                return DispatchStop::Capacity;
            }

            let Some(ScheduledFetch { url: queued, permit }) = self.scheduler.try_next(Instant::now())
            else {
                return DispatchStop::Politeness;
            };

            self.transition(queued.url.as_str(), PageState::InFlight);
            let follow_links = self.options.follows_links_at(queued.depth);

            tracing::debug!("Dispatching {} (depth {})", queued.url, queued.depth);

            let worker = Arc::clone(worker);
            tasks.spawn(async move {
                let _permit = permit;
                worker.visit(queued.url, queued.depth, follow_links).await
            });
        }

        DispatchStop::Idle
    }

    fn handle_report(&mut self, report: VisitReport) {
        let next = match report.disposition {
            Disposition::Succeeded => {
                self.stats.record_success();
                PageState::Succeeded
            }
            Disposition::Failed(kind) => {
                self.stats.record_failure(kind);
                PageState::Failed
            }
            Disposition::Duplicate => {
                self.stats.duplicates_discarded += 1;
                PageState::Skipped
            }
            Disposition::BudgetExhausted => {
                self.stats.skipped_by_budget += 1;
                PageState::Skipped
            }
        };
        self.transition(&report.requested, next);

        let discovered = report.links.len();
        let depth = report.depth + 1;
        let mut queued = 0;
        for link in report.links {
            if self.enqueue(link, depth) {
                queued += 1;
            }
        }

        self.stats.links_discovered += discovered as u64;
        if discovered > 0 {
            tracing::debug!(
                "{}: {} link(s) found, {} queued",
                report.requested,
                discovered,
                queued
            );
        }
    }

    fn transition(&mut self, url: &str, next: PageState) {
        let state = self
            .states
            .entry(url.to_string())
            .or_insert(PageState::Unseen);

        if !state.can_transition_to(next) {
            tracing::warn!("Unexpected state change for {}: {} -> {}", url, state, next);
        }
        tracing::trace!("{}: {} -> {}", url, state, next);

        *state = next;
    }
}

/// A running crawl whose outcomes are delivered as they are produced
pub struct CrawlStream {
    pub successes: mpsc::Receiver<PageSuccess>,
    pub failures: mpsc::Receiver<PageFailure>,
    /// Resolves to the run statistics once the crawl has ended
    pub handle: JoinHandle<CrawlStatistics>,
}

impl CrawlStream {
    /// Waits for the next outcome from either channel
    ///
    /// Returns `None` once both channels are closed, i.e. the run is over.
    pub async fn next_outcome(&mut self) -> Option<PageOutcome> {
        tokio::select! {
            Some(success) = self.successes.recv() => Some(success.into()),
            Some(failure) = self.failures.recv() => Some(failure.into()),
            else => None,
        }
    }
}

/// Starts a crawl in the background and returns its outcome channels
///
/// Must be called within a Tokio runtime.
pub fn crawl_streaming<F>(options: CrawlOptions, fetcher: Arc<F>) -> CrawlStream
where
    F: Fetcher + ?Sized + 'static,
{
    let (success_tx, successes) = mpsc::channel(CHANNEL_CAPACITY);
    let (failure_tx, failures) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = tokio::spawn(Coordinator::new(options, fetcher).run(success_tx, failure_tx));

    CrawlStream {
        successes,
        failures,
        handle,
    }
}

/// Runs a crawl to completion and returns every outcome plus run statistics
pub async fn crawl_with_statistics<F>(
    options: CrawlOptions,
    fetcher: Arc<F>,
) -> (CrawlResult, CrawlStatistics)
where
    F: Fetcher + ?Sized + 'static,
{
    let (success_tx, mut success_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (failure_tx, mut failure_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let run = Coordinator::new(options, fetcher).run(success_tx, failure_tx);

    let successes = async {
        let mut collected = Vec::new();
        while let Some(success) = success_rx.recv().await {
            collected.push(success);
        }
        collected
    };

    let failures = async {
        let mut collected = Vec::new();
        while let Some(failure) = failure_rx.recv().await {
            collected.push(failure);
        }
        collected
    };

    let (stats, successful, failed) = tokio::join!(run, successes, failures);

    (CrawlResult { successful, failed }, stats)
}

/// Runs a crawl to completion and returns every outcome
pub async fn crawl<F>(options: CrawlOptions, fetcher: Arc<F>) -> CrawlResult
where
    F: Fetcher + ?Sized + 'static,
{
    crawl_with_statistics(options, fetcher).await.0
}
