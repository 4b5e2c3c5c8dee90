use serde::Deserialize;

/// Main configuration structure for Sumi-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub target: TargetConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of concurrent page fetches
    pub concurrency: usize,

    /// Maximum link depth from the seeds; absent or <= 0 is unbounded
    #[serde(default)]
    pub max_depth: Option<i64>,

    /// Minimum time between request starts to the same domain (milliseconds)
    #[serde(default)]
    pub min_time_between: u64,

    /// Page budget for one run
    pub max_pages_to_visit: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

/// What to crawl
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetConfig {
    /// Site root; also the fallback seed
    pub root_url: String,

    /// Exact hosts or `*.`-prefixed wildcard patterns
    pub valid_domains: Vec<String>,

    /// Whether to seed from the sitemaps declared in robots.txt
    #[serde(default = "default_use_sitemaps")]
    pub use_sitemaps: bool,
}

fn default_use_sitemaps() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub mode: OutputMode,
}

/// How results are delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One JSON document once the run is over
    #[default]
    Batch,
    /// Newline-delimited JSON, one line per outcome as it arrives
    Stream,
}
