use crate::UrlError;
use url::Url;

/// Canonicalizes a raw URL string into its comparison-stable form
///
/// # Canonicalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Parse as an absolute URL; reject if malformed
/// 3. Clear the query component
/// 4. Re-serialize
///
/// Two URLs that differ only by query string or surrounding whitespace
/// canonicalize to the same string. Every dedup comparison in the crawler keys
/// on this output, never on the raw input.
///
/// # Arguments
///
/// * `raw` - The URL string to canonicalize
///
/// # Returns
///
/// * `Ok(String)` - The canonical URL
/// * `Err(UrlError::InvalidUrl)` - The input is not a parseable absolute URL
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::canonicalize;
///
/// let canonical = canonicalize("  https://a.example/x?y=1 ").unwrap();
/// assert_eq!(canonical, "https://a.example/x");
/// ```
pub fn canonicalize(raw: &str) -> Result<String, UrlError> {
    canonical_url(raw).map(String::from)
}

/// Same as [`canonicalize`], but keeps the parsed [`Url`]
pub fn canonical_url(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();

    let mut url = Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    url.set_query(None);

    Ok(url)
}

/// Resolves a possibly relative reference against a base URL and canonicalizes it
///
/// Fragments are dropped as well, since `page#a` and `page#b` fetch the same
/// document.
pub fn canonicalize_relative(base: &Url, href: &str) -> Result<Url, UrlError> {
    let trimmed = href.trim();

    let mut url = base.join(trimmed).map_err(|e| UrlError::InvalidUrl {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_query() {
        let result = canonicalize("https://a.example/x?y=1").unwrap();
        assert_eq!(result, "https://a.example/x");
    }

    #[test]
    fn test_trims_whitespace() {
        let result = canonicalize(" \n\thttps://a.example/page\t ").unwrap();
        assert_eq!(result, "https://a.example/page");
    }

    #[test]
    fn test_query_and_whitespace_variants_collapse() {
        let a = canonicalize("https://a.example/x?y=1").unwrap();
        let b = canonicalize("  https://a.example/x?z=2&y=3  ").unwrap();
        let c = canonicalize("https://a.example/x").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_empty_query_marker_removed() {
        let result = canonicalize("https://a.example/x?").unwrap();
        assert_eq!(result, "https://a.example/x");
    }

    #[test]
    fn test_keeps_fragment_and_path() {
        let result = canonicalize("https://a.example/a/b#frag").unwrap();
        assert_eq!(result, "https://a.example/a/b#frag");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = canonicalize("https://a.example").unwrap();
        assert_eq!(result, "https://a.example/");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://a.example/x?y=1",
            "  http://A.Example:8080/path/?q#f ",
            "https://a.example",
            "https://a.example/%7Euser/",
        ];

        for input in inputs {
            let once = canonicalize(input).unwrap();
            let twice = canonicalize(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_malformed_url() {
        let result = canonicalize("not a url");
        assert!(matches!(result, Err(UrlError::InvalidUrl { .. })));
    }

    #[test]
    fn test_relative_reference_is_invalid() {
        let result = canonicalize("/relative/path");
        assert!(matches!(result, Err(UrlError::InvalidUrl { .. })));
    }

    #[test]
    fn test_empty_input_is_invalid() {
        assert!(canonicalize("   ").is_err());
    }

    #[test]
    fn test_relative_resolution() {
        let base = Url::parse("https://a.example/docs/page").unwrap();

        let sibling = canonicalize_relative(&base, "other?x=1").unwrap();
        assert_eq!(sibling.as_str(), "https://a.example/docs/other");

        let rooted = canonicalize_relative(&base, " /top#section ").unwrap();
        assert_eq!(rooted.as_str(), "https://a.example/top");

        let absolute = canonicalize_relative(&base, "https://b.example/").unwrap();
        assert_eq!(absolute.as_str(), "https://b.example/");
    }
}
