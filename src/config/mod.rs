//! Configuration module for Sumi-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, OutputMode, TargetConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, hash_config, load_config, load_config_with_hash, parse_config};

pub use validation::MAX_CONCURRENCY;

pub(crate) use validation::{parse_root_url, parse_valid_domains, validate_limits};
