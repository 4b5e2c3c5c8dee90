//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! cycle end-to-end over the real HTTP fetcher: robots.txt, sitemaps, page
//! fetches, link following and result delivery.

use std::sync::Arc;
use sumi_harvest::config::UserAgentConfig;
use sumi_harvest::crawler::{
    crawl, crawl_streaming, crawl_with_statistics, CrawlOptions, FailureKind, HttpFetcher,
};
use sumi_harvest::request::CrawlRequest;
use sumi_harvest::sitemap::{resolve_seeds, seeds_or_root};
use sumi_harvest::url::AllowedDomains;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> Arc<HttpFetcher> {
    let config = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    Arc::new(HttpFetcher::from_config(&config).expect("Failed to build fetcher"))
}

fn scoped_fetcher(allowed: AllowedDomains) -> Arc<HttpFetcher> {
    let config = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    Arc::new(HttpFetcher::scoped(&config, allowed).expect("Failed to build fetcher"))
}

/// The mock server always listens on 127.0.0.1
fn local_only() -> AllowedDomains {
    AllowedDomains::new(["127.0.0.1"]).expect("Failed to build allow-list")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{base}/page1">Page 1</a>
            <a href="/page2?ref=home">Page 2</a>
            <a href="https://elsewhere.example/">Away</a>
            </body></html>"#
        ),
    )
    .await;
    mount_html(
        &server,
        "/page1",
        r#"<html><body><script>track()</script><p class="x">One</p><a href="/">Home</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_html(
        &server,
        "/page2",
        "<html><body><p>Two</p></body></html>".to_string(),
    )
    .await;

    let options = CrawlOptions::new([format!("{base}/")], local_only())
        .with_concurrency(2)
        .with_max_pages_to_visit(10);

    let (result, stats) = crawl_with_statistics(options, test_fetcher()).await;

    let mut urls: Vec<String> = result.successful.iter().map(|s| s.url.clone()).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            format!("{base}/"),
            format!("{base}/page1"),
            format!("{base}/page2"),
        ]
    );
    assert!(result.failed.is_empty());

    let page1 = result
        .successful
        .iter()
        .find(|s| s.url.ends_with("/page1"))
        .expect("page1 missing");
    assert_eq!(
        page1.content,
        "<html><body><p>One</p><a>Home</a></body></html>"
    );

    assert_eq!(stats.successes, 3);
    assert_eq!(stats.failures(), 0);
}

#[tokio::test]
async fn test_redirect_reported_at_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/new",
        "<html><body><p>Moved here</p></body></html>".to_string(),
    )
    .await;

    let options = CrawlOptions::new([format!("{base}/old"), format!("{base}/new")], local_only());

    let result = crawl(options, test_fetcher()).await;

    assert_eq!(result.successful.len(), 1);
    assert_eq!(result.successful[0].url, format!("{base}/new"));
    assert!(result.successful[0].content.contains("Moved here"));
    assert!(result.failed.is_empty());
}

#[tokio::test]
async fn test_redirect_to_other_host_is_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();
    let port = server.address().port();

    // Same server, but reached as "localhost", which is not an allowed host
    Mock::given(method("GET"))
        .and(path("/out"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("http://localhost:{port}/landing").as_str()),
        )
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/landing",
        "<html><body><p>Elsewhere</p></body></html>".to_string(),
    )
    .await;

    let options = CrawlOptions::new([format!("{base}/out")], local_only());

    let result = crawl(options, scoped_fetcher(local_only())).await;

    assert!(result.successful.is_empty());
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].url, format!("{base}/out"));
    assert_eq!(result.failed[0].kind, FailureKind::Fetch);
    assert!(result.failed[0].error.contains("outside the allowed domains"));

    let requests = server
        .received_requests()
        .await
        .expect("Request recording is enabled");
    assert!(requests.iter().all(|r| r.url.path() != "/landing"));
}

#[tokio::test]
async fn test_missing_page_is_a_fetch_failure() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/gone">Gone</a></body></html>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let options = CrawlOptions::new([format!("{base}/")], local_only());

    let result = crawl(options, test_fetcher()).await;

    assert_eq!(result.successful.len(), 1);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].url, format!("{base}/gone"));
    assert_eq!(result.failed[0].kind, FailureKind::Fetch);
    assert!(result.failed[0].error.contains("404"));
}

#[tokio::test]
async fn test_unreachable_host_is_a_fetch_failure() {
    // Nothing listens on port 9 of the loopback interface
    let options = CrawlOptions::new(["http://127.0.0.1:9/"], local_only());

    let result = crawl(options, test_fetcher()).await;

    assert!(result.successful.is_empty());
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].kind, FailureKind::Fetch);
}

#[tokio::test]
async fn test_sitemap_seeds_from_robots() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nAllow: /\nSitemap: {base}/sitemap_index.xml\n"
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <sitemap><loc>{base}/pages.xml</loc></sitemap>
            </sitemapindex>"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>{base}/a</loc></url>
              <url><loc>{base}/b?utm=1</loc></url>
              <url><loc>{base}/a</loc></url>
            </urlset>"#
        )))
        .mount(&server)
        .await;

    let seeds = resolve_seeds(test_fetcher(), &format!("{base}/"))
        .await
        .expect("Failed to resolve seeds");

    assert_eq!(seeds, vec![format!("{base}/a"), format!("{base}/b")]);
}

#[tokio::test]
async fn test_seeds_fall_back_to_root_without_robots() {
    let server = MockServer::start().await;
    let base = server.uri();

    let seeds = seeds_or_root(test_fetcher(), &format!("{base}/")).await;

    assert_eq!(seeds, vec![format!("{base}/")]);
}

#[tokio::test]
async fn test_request_to_streamed_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/one">1</a><a href="/two">2</a></body></html>"#.to_string(),
    )
    .await;
    mount_html(
        &server,
        "/one",
        r#"<html><body><p>One</p><a href="/deeper">deeper</a></body></html>"#.to_string(),
    )
    .await;
    mount_html(
        &server,
        "/two",
        "<html><body><p>Two</p></body></html>".to_string(),
    )
    .await;
    mount_html(
        &server,
        "/deeper",
        "<html><body><p>Too deep</p></body></html>".to_string(),
    )
    .await;

    let request = CrawlRequest::from_json(&format!(
        r#"{{
            "rootUrl": "{base}/",
            "validDomains": ["127.0.0.1"],
            "concurrency": 2,
            "maxDepth": 1,
            "minTimeBetween": 0,
            "maxPagesToVisit": 10
        }}"#
    ))
    .expect("Failed to parse request");

    let options = request
        .into_options(vec![format!("{base}/")])
        .expect("Request should be valid");

    let mut stream = crawl_streaming(options, test_fetcher());
    let mut urls = Vec::new();
    while let Some(outcome) = stream.next_outcome().await {
        assert!(outcome.is_success());
        urls.push(outcome.url().to_string());
    }
    let stats = stream.handle.await.expect("Crawl task panicked");

    urls.sort();
    assert_eq!(
        urls,
        vec![
            format!("{base}/"),
            format!("{base}/one"),
            format!("{base}/two"),
        ]
    );
    assert_eq!(stats.successes, 3);
}

#[tokio::test]
async fn test_page_budget_bounds_the_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{i}">{i}</a>"#))
        .collect();
    mount_html(&server, "/", format!("<html><body>{links}</body></html>")).await;
    for i in 0..10 {
        mount_html(
            &server,
            &format!("/p{i}"),
            format!("<html><body><p>{i}</p></body></html>"),
        )
        .await;
    }

    let options = CrawlOptions::new([format!("{base}/")], local_only())
        .with_concurrency(3)
        .with_max_pages_to_visit(4);

    let result = crawl(options, test_fetcher()).await;

    assert_eq!(result.successful.len() + result.failed.len(), 4);

    let requests = server
        .received_requests()
        .await
        .expect("Request recording is enabled");
    assert_eq!(requests.len(), 4);
}
