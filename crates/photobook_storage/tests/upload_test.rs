//! Tests for staged two-phase uploads.

use photobook_error::{ConfigError, PhotobookResult};
use photobook_storage::{BlobStore, Bucket, FileSystemBlobStore, StorageConfig, Upload, Uploader};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

fn uploader(temp_dir: &TempDir) -> Uploader<FileSystemBlobStore> {
    let store = FileSystemBlobStore::open(&StorageConfig::with_root(temp_dir.path())).unwrap();
    Uploader::new(Arc::new(store))
}

#[tokio::test]
async fn test_staged_blob_hidden_until_finalized() {
    let temp_dir = TempDir::new().unwrap();
    let uploader = uploader(&temp_dir);
    let store = Arc::clone(uploader.store());

    let staged = store
        .stage(Bucket::Photos, &Upload::new("image/png", "a.png", b"png".to_vec()))
        .await
        .unwrap();
    assert!(store.list(Bucket::Photos).await.unwrap().is_empty());
    assert!(store.read(Bucket::Photos, staged.name().as_str()).await.is_err());
    assert_eq!(store.list_staged(Bucket::Photos).await.unwrap().len(), 1);

    store.finalize(&staged).await.unwrap();
    assert!(store.list(Bucket::Photos).await.unwrap().contains(staged.name().as_str()));
    assert!(store.list_staged(Bucket::Photos).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_commit_sees_final_name() {
    let temp_dir = TempDir::new().unwrap();
    let uploader = uploader(&temp_dir);

    let committed = uploader
        .upload(
            Bucket::Photos,
            Upload::new("image/jpeg", "dog.jpeg", b"woof".to_vec()),
            |name| async move { PhotobookResult::Ok(format!("post for {}", name)) },
        )
        .await
        .unwrap();

    assert_eq!(committed.value, format!("post for {}", committed.name));
    let bytes = uploader
        .store()
        .read(Bucket::Photos, committed.name.as_str())
        .await
        .unwrap()
        .read_to_vec()
        .await
        .unwrap();
    assert_eq!(bytes, b"woof");
}

#[tokio::test]
async fn test_failed_commit_leaves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let uploader = uploader(&temp_dir);

    let result = uploader
        .upload(
            Bucket::Avatars,
            Upload::new("image/png", "me.png", b"x".to_vec()),
            |_| async { PhotobookResult::<()>::Err(ConfigError::new("database down").into()) },
        )
        .await;

    assert!(result.is_err());
    let store = uploader.store();
    assert_eq!(store.list(Bucket::Avatars).await.unwrap().len(), 1);
    assert!(store.list_staged(Bucket::Avatars).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_type_never_commits() {
    let temp_dir = TempDir::new().unwrap();
    let uploader = uploader(&temp_dir);
    let committed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&committed);

    let err = uploader
        .upload(
            Bucket::Photos,
            Upload::new("image/gif", "a.gif", b"gif".to_vec()),
            move |_| async move {
                flag.store(true, Ordering::SeqCst);
                PhotobookResult::Ok(())
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_invalid_content_type());
    assert!(!committed.load(Ordering::SeqCst));
    assert!(uploader.store().list_staged(Bucket::Photos).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_spawned_upload_completes_detached() {
    let temp_dir = TempDir::new().unwrap();
    let uploader = uploader(&temp_dir);

    let handle = uploader.spawn(
        Bucket::Avatars,
        Upload::new("image/bmp", "me.bmp", b"bmp".to_vec()),
        |_| async { PhotobookResult::Ok(42) },
    );
    let committed = handle.await.unwrap().unwrap();

    assert_eq!(committed.value, 42);
    assert!(
        uploader
            .store()
            .exists(Bucket::Avatars, committed.name.as_str())
            .await
            .unwrap()
    );
}
