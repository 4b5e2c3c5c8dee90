//! Output handler trait and its error type

use crate::crawler::PageOutcome;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the outcomes of a run
///
/// Outcomes arrive in completion order, which carries no meaning.
pub trait OutputHandler {
    /// Records one outcome
    fn record_outcome(&mut self, outcome: &PageOutcome) -> OutputResult<()>;

    /// Completes the output once the run is over
    fn finalize(&mut self) -> OutputResult<()>;

    /// Number of outcomes recorded so far
    fn recorded(&self) -> usize;
}
