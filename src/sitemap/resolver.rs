//! Recursive seed resolution: robots.txt → sitemaps → canonical page URLs

use super::parser::{parse_sitemap, SitemapDocument};
use super::SitemapError;
use crate::crawler::{FetchError, FetchedPage, Fetcher};
use crate::robots::{robots_url, ParsedRobots};
use crate::url::canonicalize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Expands a site's sitemaps into a flat list of seed URLs
#[derive(Debug)]
pub struct SitemapResolver<F: ?Sized> {
    fetcher: Arc<F>,
}

impl<F> SitemapResolver<F>
where
    F: Fetcher + ?Sized,
{
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }

    /// Resolves the seed URLs declared for `root`
    ///
    /// robots.txt is located for `root` and every `Sitemap:` reference in it is
    /// expanded depth-first, in declaration order. Index documents are followed
    /// recursively; a sitemap already expanded in this call is not fetched
    /// again, so reference cycles terminate.
    ///
    /// Page URLs are canonicalized and deduplicated, first occurrence winning.
    /// A page URL that cannot be parsed is skipped.
    ///
    /// # Errors
    ///
    /// * `SitemapError::InvalidUrl` - `root` has no usable host
    /// * `SitemapError::RobotsUnavailable` - robots.txt could not be fetched or
    ///   answered with a non-success status
    /// * `SitemapError::Fetch` - a referenced sitemap could not be fetched
    /// * `SitemapError::Parse` - a referenced sitemap is neither a URL set nor
    ///   an index
    pub async fn resolve_seeds(&self, root: &str) -> Result<Vec<String>, SitemapError> {
        let start = Instant::now();

        let robots = robots_url(root)?;
        let references = self.fetch_sitemap_references(&robots).await?;

        tracing::debug!(
            "robots.txt at {} declares {} sitemap(s)",
            robots,
            references.len()
        );

        // Stack of sitemap URLs still to expand, top = next
        let mut pending: Vec<Url> = parse_references(&robots, references.iter().rev());
        let mut expanded: HashSet<String> = HashSet::new();

        let mut seen: HashSet<String> = HashSet::new();
        let mut seeds: Vec<String> = Vec::new();

        while let Some(sitemap) = pending.pop() {
            if !expanded.insert(sitemap.to_string()) {
                tracing::debug!("Sitemap {} already expanded, skipping", sitemap);
                continue;
            }

            match self.fetch_sitemap(&sitemap).await? {
                SitemapDocument::UrlSet(urls) => {
                    tracing::debug!("Sitemap {} lists {} URL(s)", sitemap, urls.len());

                    for raw in urls {
                        match canonicalize(&raw) {
                            Ok(canonical) => {
                                if seen.insert(canonical.clone()) {
                                    seeds.push(canonical);
                                }
                            }
                            Err(e) => tracing::debug!("Skipping sitemap entry: {}", e),
                        }
                    }
                }
                SitemapDocument::Index(children) => {
                    tracing::debug!("Sitemap index {} references {} sitemap(s)", sitemap, children.len());
                    pending.extend(parse_references(&sitemap, children.iter().rev()));
                }
            }
        }

        tracing::info!(
            "Resolved {} seed URL(s) from {} sitemap(s) in {:?}",
            seeds.len(),
            expanded.len(),
            start.elapsed()
        );

        Ok(seeds)
    }

    async fn fetch_sitemap_references(&self, robots: &Url) -> Result<Vec<String>, SitemapError> {
        let unavailable = |reason: String| SitemapError::RobotsUnavailable {
            url: robots.to_string(),
            reason,
        };

        let page = self
            .fetcher
            .fetch(robots)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !page.is_success() {
            return Err(unavailable(format!("HTTP {}", page.status)));
        }

        Ok(ParsedRobots::from_content(&page.body).sitemaps().to_vec())
    }

    async fn fetch_sitemap(&self, url: &Url) -> Result<SitemapDocument, SitemapError> {
        let page: FetchedPage = self.fetcher.fetch(url).await?;

        if !page.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: page.status,
            }
            .into());
        }

        parse_sitemap(&page.body).ok_or_else(|| SitemapError::Parse {
            url: url.to_string(),
        })
    }
}

/// Resolves sitemap references against the document that declared them,
/// dropping any that do not form a URL
fn parse_references<'a, I>(base: &Url, references: I) -> Vec<Url>
where
    I: Iterator<Item = &'a String>,
{
    references
        .filter_map(|reference| match base.join(reference.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Ignoring sitemap reference '{}': {}", reference, e);
                None
            }
        })
        .collect()
}

/// Resolves the seed URLs for `root` with a one-off [`SitemapResolver`]
pub async fn resolve_seeds<F>(fetcher: Arc<F>, root: &str) -> Result<Vec<String>, SitemapError>
where
    F: Fetcher + ?Sized,
{
    SitemapResolver::new(fetcher).resolve_seeds(root).await
}

/// Resolves the seeds for `root`, falling back to `root` alone
///
/// The fallback applies when resolution fails for any reason and when the
/// sitemaps list no pages at all.
pub async fn seeds_or_root<F>(fetcher: Arc<F>, root: &str) -> Vec<String>
where
    F: Fetcher + ?Sized,
{
    match resolve_seeds(fetcher, root).await {
        Ok(seeds) if !seeds.is_empty() => seeds,
        Ok(_) => {
            tracing::info!("No sitemap URLs found, seeding with {}", root.trim());
            vec![root.trim().to_string()]
        }
        Err(e) => {
            tracing::warn!("Sitemap seeding failed ({}), seeding with {}", e, root.trim());
            vec![root.trim().to_string()]
        }
    }
}
