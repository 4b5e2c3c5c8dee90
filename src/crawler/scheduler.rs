//! Scheduler for managing the crawl frontier and politeness
//!
//! This module handles:
//! - Breadth-first frontier ordering (lowest depth first, FIFO within a depth)
//! - Global concurrency limiting via a semaphore
//! - Per-domain minimum delay between request starts
//!
//! The scheduler never sleeps itself. The coordinator asks it for the next
//! ready fetch and, when nothing is ready, how long to wait.

use crate::state::DomainState;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// A URL waiting in the frontier
#[derive(Debug, Clone)]
pub struct QueuedUrl {
    /// Canonical URL to fetch
    pub url: Url,

    /// Host the politeness window applies to
    pub domain: String,

    /// Link distance from the seeds (seeds are 0)
    pub depth: u32,

    /// Insertion order, used to keep FIFO order within one depth
    sequence: u64,
}

// BinaryHeap pops the greatest element, so the comparison is reversed:
// lower depth first, then earlier insertion.
impl Ord for QueuedUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .depth
            .cmp(&self.depth)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueuedUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedUrl {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl Eq for QueuedUrl {}

/// A fetch cleared for dispatch
///
/// The permit holds one concurrency slot until it is dropped.
#[derive(Debug)]
pub struct ScheduledFetch {
    pub url: QueuedUrl,
    pub permit: OwnedSemaphorePermit,
}

/// Frontier plus the limits that gate dispatch from it
#[derive(Debug)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Per-domain politeness state
    domain_states: HashMap<String, DomainState>,

    /// URLs waiting for dispatch
    frontier: BinaryHeap<QueuedUrl>,

    /// Minimum time between request starts to one domain
    min_delay: Duration,

    next_sequence: u64,
}

impl Scheduler {
    /// Creates a scheduler allowing `concurrency` simultaneous fetches
    ///
    /// A concurrency of zero is raised to one.
    pub fn new(concurrency: usize, min_delay: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            domain_states: HashMap::new(),
            frontier: BinaryHeap::new(),
            min_delay,
            next_sequence: 0,
        }
    }

    /// Adds a URL to the frontier
    pub fn push(&mut self, url: Url, domain: String, depth: u32) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.frontier.push(QueuedUrl {
            url,
            domain,
            depth,
            sequence,
        });
    }

    /// Takes the next URL that may be fetched right now
    ///
    /// Returns `None` if the frontier is empty, every concurrency slot is
    /// taken, or every queued domain is still inside its politeness window.
    /// On success the domain's window restarts at `now`.
    pub fn try_next(&mut self, now: Instant) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = self.semaphore.clone().try_acquire_owned().ok()?;

        let mut not_ready = Vec::new();
        let mut found = None;

        // Popped in priority order, so the first ready URL is the best one
        while let Some(queued) = self.frontier.pop() {
            let ready = self
                .domain_states
                .get(&queued.domain)
                .map_or(true, |state| state.can_request(self.min_delay, now));

            tracing::trace!(
                "Checking domain {} for URL {}: ready={}",
                queued.domain,
                queued.url,
                ready
            );

            if ready {
                found = Some(queued);
                break;
            }
            not_ready.push(queued);
        }

        self.frontier.extend(not_ready);

        let url = found?;
        self.domain_states
            .entry(url.domain.clone())
            .or_insert_with(DomainState::new)
            .record_request(now);

        Some(ScheduledFetch { url, permit })
    }

    /// Time until some queued domain leaves its politeness window
    ///
    /// `None` when the frontier is empty; zero when a URL is ready now.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.frontier
            .iter()
            .map(|queued| {
                self.domain_states
                    .get(&queued.domain)
                    .and_then(|state| state.time_until_next_request(self.min_delay, now))
                    .unwrap_or(Duration::ZERO)
            })
            .min()
    }

    /// Returns true while a concurrency slot is free
    pub fn has_capacity(&self) -> bool {
        self.semaphore.available_permits() > 0
    }

    /// Removes and returns every queued URL
    pub fn drain(&mut self) -> Vec<QueuedUrl> {
        self.frontier.drain().collect()
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Gets the politeness state of a domain
    pub fn domain_state(&self, domain: &str) -> Option<&DomainState> {
        self.domain_states.get(domain)
    }

    /// Number of distinct domains a fetch has started against
    pub fn domain_count(&self) -> usize {
        self.domain_states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    fn push(scheduler: &mut Scheduler, domain: &str, path: &str, depth: u32) {
        let url = Url::parse(&format!("https://{}{}", domain, path)).unwrap();
        scheduler.push(url, domain.to_string(), depth);
    }

    #[test]
    fn test_new_scheduler() {
        let scheduler = Scheduler::new(10, DELAY);

        assert_eq!(scheduler.frontier_size(), 0);
        assert!(scheduler.is_empty());
        assert!(scheduler.has_capacity());
        assert_eq!(scheduler.time_until_ready(Instant::now()), None);
    }

    #[test]
    fn test_try_next_empty_frontier() {
        let mut scheduler = Scheduler::new(1, DELAY);
        assert!(scheduler.try_next(Instant::now()).is_none());
    }

    #[test]
    fn test_lower_depth_first_then_fifo() {
        let mut scheduler = Scheduler::new(10, Duration::ZERO);
        push(&mut scheduler, "a.example", "/deep", 2);
        push(&mut scheduler, "a.example", "/first", 1);
        push(&mut scheduler, "a.example", "/second", 1);
        push(&mut scheduler, "a.example", "/", 0);

        let now = Instant::now();
        let order: Vec<String> = std::iter::from_fn(|| scheduler.try_next(now))
            .map(|s| s.url.url.path().to_string())
            .collect();

        assert_eq!(order, vec!["/", "/first", "/second", "/deep"]);
    }

    #[test]
    fn test_domain_waits_for_politeness_window() {
        let mut scheduler = Scheduler::new(10, DELAY);
        push(&mut scheduler, "a.example", "/1", 0);
        push(&mut scheduler, "a.example", "/2", 0);

        let now = Instant::now();
        let first = scheduler.try_next(now).unwrap();
        assert_eq!(first.url.url.path(), "/1");

        assert!(scheduler.try_next(now).is_none());
        assert_eq!(scheduler.frontier_size(), 1);
        assert_eq!(scheduler.time_until_ready(now), Some(DELAY));

        let later = now + DELAY;
        assert_eq!(scheduler.time_until_ready(later), Some(Duration::ZERO));
        assert_eq!(scheduler.try_next(later).unwrap().url.url.path(), "/2");
    }

    #[test]
    fn test_other_domain_not_blocked() {
        let mut scheduler = Scheduler::new(10, DELAY);
        push(&mut scheduler, "a.example", "/1", 0);
        push(&mut scheduler, "a.example", "/2", 0);
        push(&mut scheduler, "b.example", "/1", 1);

        let now = Instant::now();
        assert_eq!(scheduler.try_next(now).unwrap().url.domain, "a.example");
        // a.example is waiting, so the deeper b.example URL goes next
        assert_eq!(scheduler.try_next(now).unwrap().url.domain, "b.example");
        assert!(scheduler.try_next(now).is_none());
        assert_eq!(scheduler.domain_count(), 2);
        assert_eq!(scheduler.domain_state("a.example").unwrap().request_count, 1);
    }

    #[test]
    fn test_concurrency_limit() {
        let mut scheduler = Scheduler::new(2, Duration::ZERO);
        for i in 0..3 {
            push(&mut scheduler, "a.example", &format!("/{}", i), 0);
        }

        let now = Instant::now();
        let first = scheduler.try_next(now).unwrap();
        let _second = scheduler.try_next(now).unwrap();
        assert!(!scheduler.has_capacity());
        assert!(scheduler.try_next(now).is_none());

        drop(first);
        assert!(scheduler.has_capacity());
        assert!(scheduler.try_next(now).is_some());
    }

    #[test]
    fn test_zero_concurrency_is_raised() {
        let mut scheduler = Scheduler::new(0, Duration::ZERO);
        push(&mut scheduler, "a.example", "/", 0);
        assert!(scheduler.try_next(Instant::now()).is_some());
    }

    #[test]
    fn test_drain() {
        let mut scheduler = Scheduler::new(1, DELAY);
        push(&mut scheduler, "a.example", "/1", 0);
        push(&mut scheduler, "b.example", "/1", 0);

        assert_eq!(scheduler.drain().len(), 2);
        assert!(scheduler.is_empty());
    }
}
