/// Per-URL lifecycle within one crawl run
///
/// `Unseen → Queued → InFlight → {Succeeded | Failed}`. A queued or in-flight
/// URL may also end as `Skipped` when the page budget aborts it before any
/// network I/O, or when its response resolves to an already reported page.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Not yet discovered by this run
    Unseen,

    /// Accepted into the frontier, waiting for dispatch
    Queued,

    /// A worker is fetching this URL
    InFlight,

    // ===== Terminal States =====
    /// Fetched, sanitized and reported as a success
    Succeeded,

    /// Reported as a failure
    Failed,

    /// Ended without an outcome (budget abort or duplicate after redirect)
    Skipped,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Skipped)
    }

    /// Returns true if this is an active state (the URL may still be processed)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::InFlight)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Queued)
                | (Self::Queued, Self::InFlight)
                | (Self::Queued, Self::Skipped)
                | (Self::InFlight, Self::Succeeded)
                | (Self::InFlight, Self::Failed)
                | (Self::InFlight, Self::Skipped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Queued => "queued",
            Self::InFlight => "in_flight",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
