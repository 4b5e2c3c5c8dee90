//! In-memory fetch double shared by unit tests

use crate::crawler::{FetchError, FetchedPage, Fetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
enum Canned {
    Page {
        status: u16,
        location: Option<String>,
        final_url: Option<String>,
        content_type: Option<String>,
        body: String,
    },
    Error(FetchError),
}

/// Serves canned responses keyed by the exact requested URL
///
/// Unknown URLs answer 404. Every request is recorded in order.
#[derive(Debug, Default)]
pub(crate) struct StaticFetcher {
    responses: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
    latency: Duration,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned::Page {
                status: 200,
                location: None,
                final_url: None,
                content_type: Some("text/html; charset=utf-8".to_string()),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn text(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned::Page {
                status: 200,
                location: None,
                final_url: None,
                content_type: Some(content_type.to_string()),
                body: body.to_string(),
            },
        );
        self
    }

    /// A 200 response that carries a `Location` header
    pub fn located(mut self, url: &str, location: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned::Page {
                status: 200,
                location: Some(location.to_string()),
                final_url: None,
                content_type: Some("text/html".to_string()),
                body: body.to_string(),
            },
        );
        self
    }

    /// A response the transport reached by following redirects to `final_url`
    pub fn redirected(mut self, url: &str, final_url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned::Page {
                status: 200,
                location: None,
                final_url: Some(final_url.to_string()),
                content_type: Some("text/html".to_string()),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned::Page {
                status,
                location: None,
                final_url: None,
                content_type: Some("text/html".to_string()),
                body: String::new(),
            },
        );
        self
    }

    pub fn timeout(mut self, url: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Canned::Error(FetchError::Timeout {
                url: url.to_string(),
            }),
        );
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.responses.get(url.as_str()) {
            Some(Canned::Page {
                status,
                location,
                final_url,
                content_type,
                body,
            }) => Ok(FetchedPage {
                final_url: final_url
                    .as_deref()
                    .map(|u| Url::parse(u).unwrap())
                    .unwrap_or_else(|| url.clone()),
                status: *status,
                location: location.clone(),
                content_type: content_type.clone(),
                body: body.clone(),
            }),
            Some(Canned::Error(error)) => Err(error.clone()),
            None => Ok(FetchedPage {
                final_url: url.clone(),
                status: 404,
                location: None,
                content_type: Some("text/html".to_string()),
                body: "not found".to_string(),
            }),
        }
    }
}
