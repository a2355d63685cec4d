use async_trait::async_trait;
use chrono::{DateTime, Utc};
use erased_serde::Serialize as ErasedSerialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationError(String),
    #[error("Serialization failed: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::OperationError(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::SerializationError(error.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageItem<T: Serialize> {
    pub url: Url,
    pub timestamp: DateTime<Utc>,
    pub data: T,
    pub metadata: Option<Value>,
}

pub type ErasedItem = StorageItem<Box<dyn ErasedSerialize + Send + Sync>>;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn store_serialized(&self, item: ErasedItem) -> Result<(), StorageError>;
}

pub trait IntoStorageData {
    fn into_storage_data(self) -> Box<dyn ErasedSerialize + Send + Sync>;
}

impl<T: Serialize + Send + Sync + 'static> IntoStorageData for T {
    fn into_storage_data(self) -> Box<dyn ErasedSerialize + Send + Sync> {
        Box::new(self)
    }
}
