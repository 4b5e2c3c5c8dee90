//! URL handling module for Sumi-Harvest
//!
//! This module provides URL canonicalization, domain extraction and the
//! allowed-domain check used to bound a crawl.

mod canonicalize;
mod domain;
mod matcher;

use crate::ConfigError;
use url::Url;

// Re-export main functions
pub use canonicalize::{canonical_url, canonicalize, canonicalize_relative};
pub use domain::extract_domain;
pub use matcher::{matches_wildcard, DomainPattern};

/// The set of domains a crawl run may fetch from
///
/// Read-only for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedDomains {
    patterns: Vec<DomainPattern>,
}

impl AllowedDomains {
    /// Builds the allow-list from pattern strings
    ///
    /// # Arguments
    ///
    /// * `patterns` - Exact hosts or `*.`-prefixed wildcards
    ///
    /// # Returns
    ///
    /// * `Ok(AllowedDomains)` - All patterns parsed
    /// * `Err(ConfigError::InvalidPattern)` - The first invalid pattern
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for pattern in patterns {
            let pattern = DomainPattern::parse(pattern.as_ref())?;
            if !parsed.contains(&pattern) {
                parsed.push(pattern);
            }
        }

        Ok(Self { patterns: parsed })
    }

    /// Returns true if the host is covered by any pattern
    pub fn allows_domain(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.patterns.iter().any(|p| p.matches(&domain))
    }

    /// Returns true if the URL's host is allowed
    ///
    /// URLs without a host are never allowed.
    pub fn allows(&self, url: &Url) -> bool {
        extract_domain(url).is_some_and(|domain| self.allows_domain(&domain))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}
