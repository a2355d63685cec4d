use super::base::{ErasedItem, StorageBackend, StorageError, StorageItem};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

/// Keeps stored items in process as JSON values. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<Vec<StorageItem<Value>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> Vec<StorageItem<Value>> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn store_serialized(&self, item: ErasedItem) -> Result<(), StorageError> {
        let data = serde_json::to_value(&item.data)?;
        self.items.write().push(StorageItem {
            url: item.url,
            timestamp: item.timestamp,
            data,
            metadata: item.metadata,
        });
        Ok(())
    }
}
