use crate::core::SpiderConfig;
use crate::http::{HttpRequest, HttpResponse};
use crate::{ScraperResult, StatsTracker};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::Scraper;

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Serves canned responses keyed by absolute URL. Unknown URLs answer 404.
#[derive(Clone)]
pub struct MockScraper {
    responses: Arc<HashMap<String, MockResponse>>,
    fetched: Arc<RwLock<Vec<String>>>,
    stats: Arc<StatsTracker>,
}

impl MockScraper {
    pub fn new(responses: Vec<(&str, MockResponse)>) -> Self {
        Self {
            responses: Arc::new(
                responses
                    .into_iter()
                    .map(|(url, response)| (url.to_string(), response))
                    .collect(),
            ),
            fetched: Arc::new(RwLock::new(Vec::new())),
            stats: Arc::new(StatsTracker::new()),
        }
    }

    /// URLs requested so far, in fetch order. Shared between clones.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.read().clone()
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn fetch_single(
        &self,
        request: HttpRequest,
        _config: &SpiderConfig,
    ) -> ScraperResult<HttpResponse> {
        let key = request.url.to_string();
        self.fetched.write().push(key.clone());

        let response = self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| MockResponse::status(404));

        if let Some(delay) = response.delay {
            sleep(delay).await;
        }

        Ok(HttpResponse {
            url: request.url.clone(),
            status: response.status,
            headers: HashMap::new(),
            decoded_body: response.body,
            timestamp: Utc::now(),
            from_request: Box::new(request),
        })
    }

    fn box_clone(&self) -> Box<dyn Scraper> {
        Box::new(self.clone())
    }

    fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    fn set_stats(&mut self, stats: Arc<StatsTracker>) {
        self.stats = stats;
    }
}
