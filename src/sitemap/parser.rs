//! Sitemap document parser
//!
//! Sitemaps are read with the same lenient markup parser used for pages, so a
//! sloppy document (unescaped ampersands, a missing XML declaration, stray
//! whitespace inside `<loc>`) still yields its URLs.
//!
//! The markup parser has no notion of XML CDATA sections, so they are turned
//! into escaped text before parsing.

use scraper::{Html, Selector};
use std::borrow::Cow;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// One sitemap document, after its shape has been recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page URLs
    UrlSet(Vec<String>),
    /// `<sitemapindex>`: references to further sitemap documents
    Index(Vec<String>),
}

impl SitemapDocument {
    pub fn locations(&self) -> &[String] {
        match self {
            SitemapDocument::UrlSet(urls) => urls,
            SitemapDocument::Index(sitemaps) => sitemaps,
        }
    }
}

/// Parses a sitemap body
///
/// The URL-set shape is tried first, then the index shape. Returns `None`
/// when the document is neither.
///
/// # Example
///
/// ```
/// use sumi_harvest::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/</loc></url>
/// </urlset>"#;
///
/// assert_eq!(
///     parse_sitemap(xml),
///     Some(SitemapDocument::UrlSet(vec!["https://example.com/".to_string()]))
/// );
/// ```
pub fn parse_sitemap(body: &str) -> Option<SitemapDocument> {
    let document = Html::parse_document(&unwrap_cdata(body));

    if let Some(urls) = select_locations(&document, "urlset", "urlset url > loc") {
        return Some(SitemapDocument::UrlSet(urls));
    }

    select_locations(&document, "sitemapindex", "sitemapindex sitemap > loc")
        .map(SitemapDocument::Index)
}

/// Collects the trimmed, non-empty `<loc>` texts under `root`, or `None` if no
/// `root` element exists
fn select_locations(document: &Html, root: &str, loc: &str) -> Option<Vec<String>> {
    let root_selector = Selector::parse(root).ok()?;
    let loc_selector = Selector::parse(loc).ok()?;

    document.select(&root_selector).next()?;

    let locations = document
        .select(&loc_selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    Some(locations)
}

/// Replaces every CDATA section with its content, escaped as markup text
///
/// An unterminated section runs to the end of the input.
fn unwrap_cdata(body: &str) -> Cow<'_, str> {
    if !body.contains(CDATA_OPEN) {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(start) = rest.find(CDATA_OPEN) {
        out.push_str(&rest[..start]);
        let section = &rest[start + CDATA_OPEN.len()..];
        let (text, after) = match section.find(CDATA_CLOSE) {
            Some(end) => (&section[..end], &section[end + CDATA_CLOSE.len()..]),
            None => (section, ""),
        };

        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                c => out.push(c),
            }
        }
        rest = after;
    }
    out.push_str(rest);

    Cow::Owned(out)
}
