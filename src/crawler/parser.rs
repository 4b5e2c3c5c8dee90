//! Link discovery for fetched pages
//!
//! Only `<a href>` anchors feed the frontier. Every discovered link comes back
//! canonicalized (query and fragment removed) and absolute.

use crate::url::canonicalize_relative;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Extracts the followable links of a page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">`, resolved against `base_url` (including `rel="nofollow"`)
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links (same-page anchors)
/// - Anything that is not HTTP(S) after resolution
///
/// Duplicates within one page are reported once, in document order.
///
/// # Arguments
///
/// * `html` - The raw page markup
/// * `base_url` - The page's effective URL
///
/// # Example
///
/// ```
/// use sumi_harvest::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page?ref=nav">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&anchor_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            if seen.insert(url.as_str().to_string()) {
                links.push(url);
            }
        }
    }

    links
}

/// Resolves an href to a canonical absolute URL, or `None` if it is excluded
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let url = canonicalize_relative(base_url, href).ok()?;

    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}
