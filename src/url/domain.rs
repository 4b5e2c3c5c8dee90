use url::Url;

/// Extracts the lowercase host from a URL
///
/// The port is not part of the result, so `https://example.com:8080/` and
/// `https://example.com/` share one politeness window and one allow-list entry.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_extract_ignores_port_and_query() {
        let url = Url::parse("http://127.0.0.1:8080/page?x=1").unwrap();
        assert_eq!(extract_domain(&url), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_no_host() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert_eq!(extract_domain(&url), None);
    }
}
