//! Output module for delivering crawl results
//!
//! This module handles:
//! - Writing outcomes as one aggregated JSON document or as NDJSON
//! - Recording and printing run statistics

mod json;
pub mod stats;
mod traits;

pub use json::{JsonOutput, NdjsonOutput};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult};
