use crate::http::{HttpRequest, HttpResponse};
use crate::ScraperResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpiderCallback {
    Bootstrap,
    ParseHub,
    ParsePost,
}

#[derive(Debug, Clone)]
pub struct SpiderResponse {
    pub response: HttpResponse,
    pub callback: SpiderCallback,
}

#[derive(Debug)]
pub enum ParseResult {
    Continue(Vec<HttpRequest>),
    Skip,
}

#[derive(Debug, Clone)]
pub struct SpiderConfig {
    pub max_depth: usize,
    pub max_concurrency: usize,
    pub headers: Vec<(String, String)>,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_concurrency: 10,
            headers: Vec::new(),
        }
    }
}

impl SpiderConfig {
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.max_concurrency = concurrency.max(1);
        self
    }

    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Self {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }
}

#[async_trait]
pub trait Spider {
    fn name(&self) -> String;
    fn start_urls(&self) -> Vec<Url>;
    fn config(&self) -> &SpiderConfig;
    fn set_config(&mut self, config: SpiderConfig);

    fn with_config(mut self, config: SpiderConfig) -> Self
    where
        Self: Sized,
    {
        self.set_config(config);
        self
    }

    fn allowed_domains(&self) -> Option<Vec<String>> {
        None
    }

    /// Whether `url` falls inside `allowed_domains` (exact host or a subdomain of it).
    fn is_allowed(&self, url: &Url) -> bool {
        let Some(domains) = self.allowed_domains() else {
            return true;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)))
    }

    fn start_requests(&self) -> Vec<HttpRequest> {
        self.start_urls()
            .into_iter()
            .map(|url| HttpRequest::new(url, SpiderCallback::Bootstrap, 0))
            .collect()
    }

    async fn parse(&self, response: SpiderResponse) -> ScraperResult<ParseResult>;
}
