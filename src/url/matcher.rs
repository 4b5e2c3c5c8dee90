use crate::ConfigError;

/// A single allowed-domain entry
///
/// Entries are either an exact host (`example.com`) or a wildcard
/// (`*.example.com`), which matches the bare domain and any subdomain at any
/// depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainPattern {
    Exact(String),
    Wildcard(String),
}

impl DomainPattern {
    /// Parses a pattern string, lowercasing it
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for empty patterns, patterns with
    /// a wildcard anywhere but the leading `*.`, and patterns containing a
    /// scheme, path or whitespace.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = pattern.trim().to_lowercase();

        let (base, wildcard) = match pattern.strip_prefix("*.") {
            Some(base) => (base.to_string(), true),
            None => (pattern.clone(), false),
        };

        if base.is_empty()
            || base.contains('*')
            || base.contains('/')
            || base.contains(char::is_whitespace)
            || base.starts_with('.')
            || base.ends_with('.')
        {
            return Err(ConfigError::InvalidPattern(pattern));
        }

        Ok(if wildcard {
            Self::Wildcard(base)
        } else {
            Self::Exact(base)
        })
    }

    /// Checks a lowercase host against this pattern
    pub fn matches(&self, host: &str) -> bool {
        match self {
            Self::Exact(domain) => host == domain,
            Self::Wildcard(base) => {
                host == base
                    || host
                        .strip_suffix(base.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
        }
    }
}

/// Checks if a domain matches a pattern string without keeping the parsed form
///
/// Invalid patterns never match.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "blog.example.com"));
/// assert!(!matches_wildcard("*.example.com", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    DomainPattern::parse(pattern)
        .map(|p| p.matches(candidate))
        .unwrap_or(false)
}
