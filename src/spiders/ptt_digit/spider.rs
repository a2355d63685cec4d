use crate::core::spider::{ParseResult, SpiderCallback, SpiderConfig, SpiderResponse};
use crate::http::{HttpRequest, HttpResponse};
use crate::storage::{IntoStorageData, StorageBackend, StorageItem};
use crate::{ScraperError, ScraperResult, Spider};
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use scraper::Html;
use serde_json::json;
use std::sync::Arc;
use url::Url;

use super::assemble::assemble;
use super::extract::{extract_listing, extract_next_page, extract_post_fields, extract_replies};
use super::model::{Post, PostStub};
use super::selectors::SelectorMap;

pub const START_URL: &str = "http://pttdigit.com/";
pub const ALLOWED_DOMAIN: &str = "pttdigit.com";

/// Follow-up work discovered on one hub page.
#[derive(Debug)]
pub struct HubPage {
    pub posts: Vec<HttpRequest>,
    pub next_page: Option<HttpRequest>,
}

impl HubPage {
    pub fn into_requests(self) -> Vec<HttpRequest> {
        let mut requests = self.posts;
        requests.extend(self.next_page);
        requests
    }
}

pub struct ForumSpider {
    config: SpiderConfig,
    selectors: Arc<SelectorMap>,
    storage: Arc<dyn StorageBackend>,
    start_urls: Vec<Url>,
    allowed_domains: Option<Vec<String>>,
}

impl ForumSpider {
    /// Compiles the built-in selector table; a malformed entry fails here, before any request.
    pub fn new(storage: Arc<dyn StorageBackend>) -> ScraperResult<Self> {
        Self::with_selectors(SelectorMap::ptt_digit()?, storage)
    }

    pub fn with_selectors(
        selectors: SelectorMap,
        storage: Arc<dyn StorageBackend>,
    ) -> ScraperResult<Self> {
        Ok(Self {
            config: SpiderConfig::default(),
            selectors: Arc::new(selectors),
            storage,
            start_urls: vec![Url::parse(START_URL)?],
            allowed_domains: Some(vec![ALLOWED_DOMAIN.to_string()]),
        })
    }

    pub fn with_start_urls(mut self, start_urls: Vec<Url>) -> Self {
        self.start_urls = start_urls;
        self
    }

    pub fn with_allowed_domains(mut self, domains: Option<Vec<String>>) -> Self {
        self.allowed_domains = domains;
        self
    }

    /// Post requests for every listing on the page plus the next hub page, if any.
    pub fn on_hub_page(&self, response: &HttpResponse) -> ScraperResult<HubPage> {
        let depth = response.from_request.depth;
        let document = Html::parse_document(&response.decoded_body);

        let stubs = extract_listing(&document, &response.url, &self.selectors.hub);
        let next_url = extract_next_page(&document, &response.url, &self.selectors.hub);

        info!(
            "Parsed hub {}: {} posts, next page: {}",
            response.url,
            stubs.len(),
            next_url
                .as_ref()
                .map(Url::as_str)
                .unwrap_or("none")
        );

        let posts = stubs
            .into_iter()
            .map(|stub| {
                HttpRequest::new(stub.url.clone(), SpiderCallback::ParsePost, depth + 1)
                    .with_meta(&stub)
            })
            .collect::<ScraperResult<Vec<_>>>()?;

        let next_page =
            next_url.map(|url| HttpRequest::new(url, SpiderCallback::ParseHub, depth));

        Ok(HubPage { posts, next_page })
    }

    pub fn on_post_page(&self, response: &HttpResponse, stub: PostStub) -> Post {
        let document = Html::parse_document(&response.decoded_body);

        let fields = extract_post_fields(&document, &response.url, &self.selectors.post);
        let replies = extract_replies(&document, &self.selectors.push);

        info!("Parsed post {}: {} replies", response.url, replies.len());

        assemble(stub, &fields, replies)
    }

    async fn emit(&self, post: Post) -> ScraperResult<()> {
        let item = StorageItem {
            url: post.url.clone(),
            timestamp: Utc::now(),
            metadata: Some(json!({
                "spider": self.name(),
                "replies": post.replies.len(),
            })),
            data: post.into_storage_data(),
        };
        self.storage.store_serialized(item).await?;
        Ok(())
    }
}

#[async_trait]
impl Spider for ForumSpider {
    fn name(&self) -> String {
        "pttDigit".to_string()
    }

    fn start_urls(&self) -> Vec<Url> {
        self.start_urls.clone()
    }

    fn config(&self) -> &SpiderConfig {
        &self.config
    }

    fn set_config(&mut self, config: SpiderConfig) {
        self.config = config;
    }

    fn allowed_domains(&self) -> Option<Vec<String>> {
        self.allowed_domains.clone()
    }

    async fn parse(&self, spider_response: SpiderResponse) -> ScraperResult<ParseResult> {
        let response = spider_response.response;
        match spider_response.callback {
            SpiderCallback::Bootstrap | SpiderCallback::ParseHub => {
                let hub = self.on_hub_page(&response)?;
                Ok(ParseResult::Continue(hub.into_requests()))
            }
            SpiderCallback::ParsePost => {
                let stub: PostStub = response.from_request.meta_as()?.ok_or_else(|| {
                    ScraperError::ExtractionError(format!(
                        "post request for {} carries no listing stub",
                        response.url
                    ))
                })?;
                let post = self.on_post_page(&response, stub);
                self.emit(post).await?;
                Ok(ParseResult::Skip)
            }
        }
    }
}
