//! Content module: turns fetched markup into clean, comparable content

mod sanitizer;
mod tree;

pub use sanitizer::{sanitize, sanitize_body};

use thiserror::Error;

/// Errors raised while sanitizing a page
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}
