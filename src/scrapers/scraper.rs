use crate::core::SpiderConfig;
use crate::http::{HttpRequest, HttpResponse};
use crate::{ScraperError, ScraperResult, StatsTracker};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, trace};
use std::sync::Arc;

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch_single(
        &self,
        request: HttpRequest,
        config: &SpiderConfig,
    ) -> ScraperResult<HttpResponse>;
    fn box_clone(&self) -> Box<dyn Scraper>;
    fn stats(&self) -> &StatsTracker;
    fn set_stats(&mut self, stats: Arc<StatsTracker>);

    /// Fetches `request` and records it. Statuses of 400 and above are turned into
    /// `ScraperError::HttpStatus` so the page never reaches the spider.
    async fn fetch(&self, request: HttpRequest, config: &SpiderConfig) -> ScraperResult<HttpResponse> {
        let start_time = Utc::now();
        let url = request.url.clone();

        info!("Fetching URL: {}", url);
        let response = self.fetch_single(request, config).await?;
        debug!(
            "Received response: status={}, body_length={}",
            response.status,
            response.decoded_body.len()
        );
        trace!("Response headers for {}: {:?}", url, response.headers);

        let duration = Utc::now().signed_duration_since(start_time);
        self.stats()
            .record_fetch(response.status, response.decoded_body.len(), duration);

        if !response.is_success() {
            return Err(ScraperError::HttpStatus {
                url,
                status: response.status,
            });
        }

        Ok(response)
    }
}
