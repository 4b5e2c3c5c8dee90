//! Robots.txt parser implementation
//!
//! Only the `Sitemap:` directives are consumed; allow/disallow rules are not
//! enforced by this crawler.

use robotstxt::{parse_robotstxt, RobotsParseHandler};

/// Parsed robots.txt data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRobots {
    /// Sitemap references in declaration order
    sitemaps: Vec<String>,
}

impl ParsedRobots {
    /// Parses raw robots.txt content
    ///
    /// The parser is lenient: unknown or malformed lines are ignored, so any
    /// text yields a (possibly empty) result.
    pub fn from_content(content: &str) -> Self {
        let mut collector = SitemapCollector::default();
        parse_robotstxt(content, &mut collector);

        Self {
            sitemaps: collector.sitemaps,
        }
    }

    /// Returns the sitemap references declared in robots.txt
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

/// Parse callback that keeps non-empty `Sitemap:` values
#[derive(Default)]
struct SitemapCollector {
    sitemaps: Vec<String>,
}

impl RobotsParseHandler for SitemapCollector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, _user_agent: &str) {}

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_disallow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_sitemap(&mut self, line_num: u32, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            tracing::trace!("Ignoring empty Sitemap directive on line {}", line_num);
            return;
        }
        self.sitemaps.push(value.to_string());
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_sitemaps_in_order() {
        let content = "User-agent: *\nDisallow: /admin\n\nSitemap: https://a.example/sitemap.xml\nSitemap: https://a.example/news.xml\n";
        let robots = ParsedRobots::from_content(content);
        assert_eq!(
            robots.sitemaps(),
            &[
                "https://a.example/sitemap.xml".to_string(),
                "https://a.example/news.xml".to_string()
            ]
        );
    }

    #[test]
    fn test_sitemap_directive_case_insensitive() {
        let content = "sitemap: https://a.example/s.xml\nSITEMAP: https://a.example/t.xml";
        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.sitemaps().len(), 2);
    }

    #[test]
    fn test_no_sitemaps() {
        let robots = ParsedRobots::from_content("User-agent: *\nAllow: /");
        assert!(robots.sitemaps().is_empty());
    }

    #[test]
    fn test_empty_and_garbage_content() {
        assert!(ParsedRobots::from_content("").sitemaps().is_empty());
        assert!(ParsedRobots::from_content("This is not valid robots.txt {{{")
            .sitemaps()
            .is_empty());
    }

    #[test]
    fn test_sitemap_outside_groups() {
        let content = "Sitemap: https://a.example/first.xml\nUser-agent: bot\nDisallow: /";
        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.sitemaps(), &["https://a.example/first.xml".to_string()]);
    }
}
