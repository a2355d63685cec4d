use crate::core::spider::{ParseResult, SpiderResponse};
use crate::stats::StatsTracker;
use crate::{HttpRequest, Scraper};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, trace, warn};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::spawn;
use tokio::task::JoinHandle;

use crate::{ScraperResult, Spider};

type CrawlTask = JoinHandle<(HttpRequest, ScraperResult<ParseResult>)>;

pub struct Crawler {
    scraper: Box<dyn Scraper>,
    stats: Arc<StatsTracker>,
}

impl Crawler {
    pub fn new(scraper: Box<dyn Scraper>) -> Self {
        info!("Initializing crawler");
        let stats = Arc::new(StatsTracker::new());
        let mut scraper = scraper;
        scraper.set_stats(Arc::clone(&stats));

        Self { scraper, stats }
    }

    pub fn stats(&self) -> Arc<StatsTracker> {
        Arc::clone(&self.stats)
    }

    pub async fn run<S: Spider + Send + Sync + 'static>(&self, spider: S) -> ScraperResult<()> {
        let spider = Arc::new(spider);
        let mut futures: FuturesUnordered<CrawlTask> = FuturesUnordered::new();
        let mut pending: VecDeque<HttpRequest> = VecDeque::new();

        info!("Starting spider: {}", spider.name());
        debug!(
            "Max depth: {}, max concurrency: {}",
            spider.config().max_depth,
            spider.config().max_concurrency
        );

        self.enqueue(spider.start_requests(), &*spider, &mut pending);

        loop {
            while futures.len() < spider.config().max_concurrency {
                let Some(request) = pending.pop_front() else {
                    break;
                };
                futures.push(self.process_request(request, Arc::clone(&spider)));
            }

            let Some(result) = futures.next().await else {
                break;
            };

            match result {
                Ok((_, Ok(ParseResult::Continue(new_requests)))) => {
                    debug!("Found {} new URLs to process", new_requests.len());
                    self.enqueue(new_requests, &*spider, &mut pending);
                }
                Ok((request, Ok(ParseResult::Skip))) => {
                    debug!("Finished URL: {}", request.url);
                }
                Ok((request, Err(e))) => {
                    warn!("Error processing {}: {}", request.url, e);
                    self.stats.record_failed_page();
                }
                Err(e) => {
                    warn!("Task error: {}", e);
                    self.stats.record_failed_page();
                }
            }
        }

        self.stats.finish();
        self.stats.log_summary(&spider.name());
        Ok(())
    }

    fn enqueue<S: Spider>(
        &self,
        requests: Vec<HttpRequest>,
        spider: &S,
        pending: &mut VecDeque<HttpRequest>,
    ) {
        for request in requests {
            if request.depth >= spider.config().max_depth {
                debug!("Skipping URL {} - max depth reached", request.url);
                continue;
            }

            if !spider.is_allowed(&request.url) {
                debug!("Skipping URL {} - outside allowed domains", request.url);
                continue;
            }

            info!("Queueing URL: {} at depth {}", request.url, request.depth);
            if let Some(meta) = &request.meta {
                trace!("Request metadata: {:?}", meta);
            }

            pending.push_back(request);
        }
    }

    fn process_request<S: Spider + Send + Sync + 'static>(
        &self,
        request: HttpRequest,
        spider: Arc<S>,
    ) -> CrawlTask {
        let scraper = self.scraper.box_clone();
        let config = spider.config().clone();

        spawn(async move {
            let result = match scraper.fetch(request.clone(), &config).await {
                Ok(response) => {
                    let spider_response = SpiderResponse {
                        response,
                        callback: request.callback.clone(),
                    };
                    spider.parse(spider_response).await
                }
                Err(e) => Err(e),
            };
            (request, result)
        })
    }
}
