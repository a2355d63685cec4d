pub mod base;
pub mod disk;
pub mod memory;

pub use base::{ErasedItem, IntoStorageData, StorageBackend, StorageError, StorageItem};
pub use disk::DiskStorage;
pub use memory::MemoryStorage;
