use crate::http::HttpRequest;
use chrono::prelude::*;
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub url: Url,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub decoded_body: String,
    pub timestamp: DateTime<Utc>,
    pub from_request: Box<HttpRequest>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}
