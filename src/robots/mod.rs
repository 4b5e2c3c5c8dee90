//! Robots.txt handling module
//!
//! Locates a site's robots.txt and extracts the sitemap references it declares.

mod parser;

pub use parser::ParsedRobots;

use crate::UrlError;
use url::Url;

/// Locates robots.txt for a site root
///
/// Accepts either a full URL (`https://example.com/some/page`) or a bare host
/// (`example.com`, assumed to be served over HTTPS). The path, query and
/// fragment of the input are ignored.
///
/// # Examples
///
/// ```
/// use sumi_harvest::robots::robots_url;
///
/// let url = robots_url("https://example.com/blog/post?x=1").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/robots.txt");
///
/// let url = robots_url("example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/robots.txt");
/// ```
pub fn robots_url(root: &str) -> Result<Url, UrlError> {
    let root = root.trim();

    let parsed = match Url::parse(root) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", root))
            .map_err(|e| UrlError::InvalidUrl {
                input: root.to_string(),
                reason: e.to_string(),
            })?,
        Err(e) => {
            return Err(UrlError::InvalidUrl {
                input: root.to_string(),
                reason: e.to_string(),
            })
        }
    };

    if parsed.host_str().is_none() {
        return Err(UrlError::MissingDomain(root.to_string()));
    }

    parsed.join("/robots.txt").map_err(|e| UrlError::InvalidUrl {
        input: root.to_string(),
        reason: e.to_string(),
    })
}
