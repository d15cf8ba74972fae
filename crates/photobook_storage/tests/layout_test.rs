//! Tests for storage initialization.

use photobook_storage::{
    BlobStore, Bucket, DEFAULT_AVATAR, DEFAULT_AVATAR_NAME, FileSystemBlobStore, StorageConfig,
    StorageLayout,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_fresh_avatar_bucket_holds_only_default() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSystemBlobStore::open(&StorageConfig::with_root(temp_dir.path())).unwrap();

    let avatars = storage.list(Bucket::Avatars).await.unwrap();
    assert_eq!(avatars.len(), 1);
    assert!(avatars.contains(DEFAULT_AVATAR_NAME));
    assert!(storage.list(Bucket::Photos).await.unwrap().is_empty());

    let bytes = storage
        .read(Bucket::Avatars, DEFAULT_AVATAR_NAME)
        .await
        .unwrap()
        .read_to_vec()
        .await
        .unwrap();
    assert_eq!(bytes, DEFAULT_AVATAR);
    // JPEG SOI marker
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_initialization_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(&StorageConfig::with_root(temp_dir.path()));

    layout.ensure_initialized().unwrap();
    layout.ensure_initialized().unwrap();

    let entries: Vec<_> = std::fs::read_dir(layout.bucket_dir(Bucket::Avatars))
        .unwrap()
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(layout.staging_dir(Bucket::Photos).is_dir());
    assert!(layout.staging_dir(Bucket::Avatars).is_dir());
}

#[test]
fn test_existing_avatar_bucket_is_not_reseeded() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(&StorageConfig::with_root(temp_dir.path()));
    std::fs::create_dir_all(layout.bucket_dir(Bucket::Avatars)).unwrap();

    layout.ensure_initialized().unwrap();

    assert!(!layout.bucket_dir(Bucket::Avatars).join(DEFAULT_AVATAR_NAME).exists());
    assert!(layout.bucket_dir(Bucket::Photos).is_dir());
}

#[test]
fn test_unwritable_root_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let result = FileSystemBlobStore::open(&StorageConfig::with_root(&blocker));
    let err = result.unwrap_err();
    assert!(err.storage_kind().is_some_and(|k| k.is_io_failure()));
}
