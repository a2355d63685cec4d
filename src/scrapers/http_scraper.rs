use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, ClientBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::Scraper;
use crate::core::SpiderConfig;
use crate::http::{HttpRequest, HttpResponse};
use crate::{ScraperResult, StatsTracker};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum HttpScraperError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] header::InvalidHeaderName),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}

#[derive(Clone)]
pub struct HttpScraper {
    client: Client,
    headers: header::HeaderMap,
    timeout: Duration,
    stats: Arc<StatsTracker>,
}

impl HttpScraper {
    pub fn new() -> Result<Self, HttpScraperError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(DEFAULT_USER_AGENT),
        );
        let client = Self::build_client(&headers, DEFAULT_TIMEOUT)?;

        Ok(Self {
            client,
            headers,
            timeout: DEFAULT_TIMEOUT,
            stats: Arc::new(StatsTracker::new()),
        })
    }

    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Result<Self, HttpScraperError> {
        for (key, value) in headers {
            let name = header::HeaderName::from_bytes(key.as_bytes())?;
            let value = header::HeaderValue::from_str(value)?;
            self.headers.insert(name, value);
        }

        self.client = Self::build_client(&self.headers, self.timeout)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, HttpScraperError> {
        self.timeout = timeout;
        self.client = Self::build_client(&self.headers, self.timeout)?;
        Ok(self)
    }

    fn build_client(
        headers: &header::HeaderMap,
        timeout: Duration,
    ) -> Result<Client, HttpScraperError> {
        Ok(ClientBuilder::new()
            .default_headers(headers.clone())
            .timeout(timeout)
            .build()?)
    }

    fn extract_headers(response: &reqwest::Response) -> HashMap<String, String> {
        response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.to_string(), val.to_string())))
            .collect()
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn fetch_single(
        &self,
        request: HttpRequest,
        config: &SpiderConfig,
    ) -> ScraperResult<HttpResponse> {
        let mut req = self.client.get(request.url.clone());

        // Apply spider config headers
        for (key, value) in &config.headers {
            req = req.header(key, value);
        }

        // Apply request-specific headers
        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        let timestamp = Utc::now();
        let response = req.send().await?;

        let url = response.url().clone();
        let status = response.status().as_u16();
        let headers = Self::extract_headers(&response);
        let decoded_body = response.text().await?;

        Ok(HttpResponse {
            url,
            status,
            headers,
            decoded_body,
            timestamp,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SpiderCallback;
    use crate::ScraperError;
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> Result<(HttpScraper, MockServer), HttpScraperError> {
        let server = MockServer::start().await;
        let scraper = HttpScraper::new()?;
        Ok((scraper, server))
    }

    fn request_for(server: &MockServer, route: &str) -> HttpRequest {
        let url = Url::parse(&server.uri()).unwrap().join(route).unwrap();
        HttpRequest::new(url, SpiderCallback::Bootstrap, 0)
    }

    #[tokio::test]
    async fn test_get_request() {
        let (scraper, mock_server) = setup().await.unwrap();

        Mock::given(method("GET"))
            .and(path("/hub"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>hub</body></html>")
                    .insert_header("content-type", "text/html"),
            )
            .mount(&mock_server)
            .await;

        let response = scraper
            .fetch(request_for(&mock_server, "/hub"), &SpiderConfig::default())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.decoded_body, "<html><body>hub</body></html>");
        assert_eq!(response.from_request.callback, SpiderCallback::Bootstrap);
        assert_eq!(scraper.stats().snapshot().fetches, 1);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (scraper, mock_server) = setup().await.unwrap();

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let raw = scraper
            .fetch_single(
                request_for(&mock_server, "/missing"),
                &SpiderConfig::default(),
            )
            .await
            .unwrap();
        assert_eq!(raw.status, 404);
        assert_eq!(raw.decoded_body, "Not Found");

        let result = scraper
            .fetch(
                request_for(&mock_server, "/missing"),
                &SpiderConfig::default(),
            )
            .await;
        match result {
            Err(ScraperError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected HttpStatus error, got {:?}", other),
        }
        assert_eq!(scraper.stats().snapshot().fetches_failed, 1);
    }

    #[tokio::test]
    async fn test_custom_headers() {
        let (scraper, mock_server) = setup().await.unwrap();
        let custom_ua = "ForumBot/1.0";
        let scraper = scraper
            .with_headers(vec![("user-agent", custom_ua)])
            .unwrap();

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", custom_ua))
            .and(header("x-board", "digit"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let config = SpiderConfig::default().with_headers(vec![("x-board", "digit")]);
        let response = scraper
            .fetch(request_for(&mock_server, "/"), &config)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.decoded_body, "ok");
    }

    #[tokio::test]
    async fn test_request_headers_are_sent() {
        let (scraper, mock_server) = setup().await.unwrap();

        Mock::given(method("GET"))
            .and(path("/t/1"))
            .and(header("referer", "http://pttdigit.com/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("post"))
            .mount(&mock_server)
            .await;

        let request =
            request_for(&mock_server, "/t/1").with_header("referer", "http://pttdigit.com/");
        let response = scraper
            .fetch(request, &SpiderConfig::default())
            .await
            .unwrap();

        assert_eq!(response.decoded_body, "post");
    }

    #[tokio::test]
    async fn test_invalid_headers() {
        let scraper = HttpScraper::new().unwrap();
        let result = scraper.with_headers(vec![("invalid\0header", "value")]);
        assert!(result.is_err());
    }
}
