use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_REPLY_COUNT_HINT: &str = "0";

/// Hub-derived part of a post. Travels in the post request's meta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStub {
    pub url: Url,
    pub reply_count_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub tag: String,
    pub author: String,
    pub content: String,
    pub datetime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub url: Url,
    pub author: String,
    pub title: String,
    pub datetime: String,
    pub content: String,
    pub reply_count_hint: String,
    pub replies: Vec<Reply>,
}
