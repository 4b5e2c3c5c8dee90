use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Page-visit counter for one crawl run
///
/// Every completed fetch, successful or failed, consumes one unit. Once the
/// counter reaches the limit no new fetch is dispatched; fetches already in
/// flight still complete and are still counted, so the final count can exceed
/// the limit by at most the number of in-flight workers.
#[derive(Debug, Clone)]
pub struct PageBudget {
    used: Arc<AtomicUsize>,
    limit: usize,
}

impl PageBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            used: Arc::new(AtomicUsize::new(0)),
            limit,
        }
    }

    /// Records one completed fetch and returns the new count
    pub fn record_visit(&self) -> usize {
        self.used.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns true once the counter has reached the limit
    pub fn is_exhausted(&self) -> bool {
        self.used() >= self.limit
    }

    pub fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used())
    }
}
