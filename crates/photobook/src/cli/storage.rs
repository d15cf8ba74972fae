//! Storage commands.

use photobook::{BlobStore, Bucket, FileSystemBlobStore, PhotobookConfig, PhotobookResult};
use tracing::info;

/// Create the storage layout.
pub fn init_storage(config: &PhotobookConfig) -> PhotobookResult<FileSystemBlobStore> {
    let store = FileSystemBlobStore::open(config.storage())?;
    info!(root = %store.layout().root().display(), "Storage ready");
    Ok(store)
}

/// Print every stored name in `bucket`, one per line.
pub async fn list_bucket(config: &PhotobookConfig, bucket: Bucket) -> PhotobookResult<()> {
    let store = init_storage(config)?;
    for name in store.list(bucket).await? {
        println!("{}", name);
    }
    Ok(())
}
