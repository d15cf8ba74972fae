//! Shared fixtures for purge tests.

#![allow(dead_code)]

use photobook_interface::InMemoryRecords;
use photobook_storage::{Bucket, FileSystemBlobStore, StorageConfig};
use std::sync::Arc;
use tempfile::TempDir;

pub struct Fixture {
    pub temp_dir: TempDir,
    pub store: Arc<FileSystemBlobStore>,
    pub records: Arc<InMemoryRecords>,
}

impl Fixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let store =
            Arc::new(FileSystemBlobStore::open(&StorageConfig::with_root(temp_dir.path())).unwrap());
        Self {
            temp_dir,
            store,
            records: Arc::new(InMemoryRecords::new()),
        }
    }

    /// Drop a file into a bucket behind the store's back.
    pub fn plant(&self, bucket: Bucket, name: &str, content: &[u8]) {
        let path = self.store.layout().bucket_dir(bucket).join(name);
        std::fs::write(path, content).unwrap();
    }
}
