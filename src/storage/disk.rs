use super::base::{ErasedItem, StorageBackend, StorageError};
use async_trait::async_trait;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes each item as a pretty-printed JSON file under `<base>/<subfolder>/<host>/`.
#[derive(Clone)]
pub struct DiskStorage {
    base_path: PathBuf,
    subfolder: Option<String>,
}

impl DiskStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            subfolder: None,
        })
    }

    pub fn with_subfolder(mut self, subfolder: &str) -> Self {
        self.subfolder = Some(subfolder.to_string());
        self
    }
}

#[async_trait]
impl StorageBackend for DiskStorage {
    async fn store_serialized(&self, item: ErasedItem) -> Result<(), StorageError> {
        let mut path = self.base_path.clone();
        if let Some(ref subfolder) = self.subfolder {
            path = path.join(subfolder);
        }

        let timestamp = item.timestamp.format("%Y%m%d_%H%M%S");
        let host = item.url.host_str().unwrap_or("unknown");
        let filename = format!("{}_{}.json", timestamp, Uuid::now_v7());

        let dir = path.join(host);
        fs::create_dir_all(&dir)?;
        let final_path = dir.join(filename);

        let data = serde_json::to_value(&item.data)?;
        let json = serde_json::json!({
            "url": item.url.to_string(),
            "timestamp": item.timestamp,
            "data": data,
            "metadata": item.metadata,
        });

        fs::write(&final_path, serde_json::to_string_pretty(&json)?)?;
        debug!("Stored {} to {}", item.url, final_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::base::{IntoStorageData, StorageItem};
    use chrono::Utc;
    use serde_json::{json, Value};
    use url::Url;

    #[tokio::test]
    async fn test_store_writes_json_file_per_host() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path()).unwrap().with_subfolder("posts");

        let item = StorageItem {
            url: Url::parse("http://pttdigit.com/t/1").unwrap(),
            timestamp: Utc::now(),
            data: json!({"title": "hello"}).into_storage_data(),
            metadata: Some(json!({"spider": "test"})),
        };
        storage.store_serialized(item).await.unwrap();

        let host_dir = dir.path().join("posts").join("pttdigit.com");
        let files: Vec<_> = fs::read_dir(&host_dir).unwrap().collect();
        assert_eq!(files.len(), 1);

        let written = fs::read_to_string(files[0].as_ref().unwrap().path()).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["url"], "http://pttdigit.com/t/1");
        assert_eq!(value["data"]["title"], "hello");
        assert_eq!(value["metadata"]["spider"], "test");
    }
}
