//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: per-URL lifecycle (unseen, queued, in flight, terminal)
//! - `DomainState`: per-domain politeness window
//! - `VisitedSet`: the run-wide dedup gate for reported pages
//! - `PageBudget`: the run-wide page-visit counter

mod budget;
mod domain_state;
mod page_state;
mod visited;

// Re-export main types
pub use budget::PageBudget;
pub use domain_state::DomainState;
pub use page_state::PageState;
pub use visited::VisitedSet;
