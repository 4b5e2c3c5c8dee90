use std::time::{Duration, Instant};

/// Tracks the politeness window of one domain during crawling
///
/// The window is measured between the *starts* of consecutive fetches to the
/// same domain.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of fetches started against this domain in the current run
    pub request_count: u32,

    /// When the most recent fetch to this domain started
    pub last_request_time: Option<Instant>,
}

impl DomainState {
    /// Creates a new DomainState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if a fetch can start now given the minimum delay
    pub fn can_request(&self, min_delay: Duration, now: Instant) -> bool {
        self.time_until_next_request(min_delay, now).is_none()
    }

    /// Records that a fetch to this domain started
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Calculates the time until the next fetch can start
    ///
    /// Returns None if a fetch can start now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, min_delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_delay {
            Some(min_delay - elapsed)
        } else {
            None
        }
    }
}
