use crate::core::SpiderCallback;
use crate::ScraperResult;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub callback: SpiderCallback,
    pub meta: Option<Value>,
    pub depth: usize,
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new(url: Url, callback: SpiderCallback, depth: usize) -> Self {
        Self {
            url,
            callback,
            meta: None,
            depth,
            headers: HashMap::new(),
        }
    }

    pub fn with_meta<T: serde::Serialize>(mut self, meta: T) -> ScraperResult<Self> {
        self.meta = Some(serde_json::to_value(meta)?);
        Ok(self)
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Decodes the request meta back into `T`. `None` when no meta was attached.
    pub fn meta_as<T: DeserializeOwned>(&self) -> ScraperResult<Option<T>> {
        match &self.meta {
            Some(meta) => Ok(Some(serde_json::from_value(meta.clone())?)),
            None => Ok(None),
        }
    }
}
