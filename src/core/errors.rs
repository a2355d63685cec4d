use crate::storage::base::StorageError;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: Url, status: u16 },

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid selector for `{field}` ({expr}): {message}")]
    InvalidSelector {
        field: String,
        expr: String,
        message: String,
    },

    #[error("Missing required field `{field}` on {url}")]
    MissingField { field: &'static str, url: Url },

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

pub type ScraperResult<T> = Result<T, ScraperError>;
