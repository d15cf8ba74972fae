//! Tests for the media service over the in-memory record store.

use photobook::{
    BlobStore, Bucket, FileSystemBlobStore, InMemoryRecords, MediaService, PostId,
    ReferenceOracle, StorageConfig, Upload, UserId,
};
use photobook_storage::{DEFAULT_AVATAR, DEFAULT_AVATAR_NAME};
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    _temp_dir: TempDir,
    media: MediaService<FileSystemBlobStore, InMemoryRecords>,
    records: Arc<InMemoryRecords>,
    owner: UserId,
}

fn fixture() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let store =
        Arc::new(FileSystemBlobStore::open(&StorageConfig::with_root(temp_dir.path())).unwrap());
    let records = Arc::new(InMemoryRecords::new());
    let owner = records.add_user("alice");
    Fixture {
        _temp_dir: temp_dir,
        media: MediaService::new(store, Arc::clone(&records)),
        records,
        owner,
    }
}

fn png(name: &str, bytes: &[u8]) -> Upload {
    Upload::new("image/png", name, bytes.to_vec())
}

#[tokio::test]
async fn test_upload_photo_creates_post_and_blob() {
    let f = fixture();

    let post = f
        .media
        .upload_photo(f.owner, png("cat.png", b"meow"), "my cat")
        .await
        .unwrap();

    assert!(post.filepath.ends_with(".png"));
    assert_eq!(post.description, "my cat");
    assert!(f.records.exists_by_filepath(&post.filepath).await.unwrap());
    let bytes = f.media.photo(&post.filepath).await.unwrap().read_to_vec().await.unwrap();
    assert_eq!(bytes, b"meow");
}

#[tokio::test]
async fn test_upload_photo_rejects_content_type() {
    let f = fixture();

    let err = f
        .media
        .upload_photo(f.owner, Upload::new("text/html", "x.html", b"<p>".to_vec()), "")
        .await
        .unwrap_err();

    assert!(err.is_invalid_content_type());
    assert_eq!(f.records.post_count(), 0);
    assert!(f.media.store().list(Bucket::Photos).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_photo_unknown_owner_leaves_nothing() {
    let f = fixture();

    let err = f
        .media
        .upload_photo(UserId(999), png("a.png", b"a"), "")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(f.media.store().list(Bucket::Photos).await.unwrap().is_empty());
    assert!(f.media.store().list_staged(Bucket::Photos).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_post_removes_record_and_blob() {
    let f = fixture();
    let post = f
        .media
        .upload_photo(f.owner, png("a.png", b"a"), "")
        .await
        .unwrap();

    let deleted = f.media.delete_post(f.owner, post.id).await.unwrap();

    assert_eq!(deleted.id, post.id);
    assert_eq!(f.records.post_count(), 0);
    assert!(f.media.photo(&post.filepath).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_post_of_other_user_not_found() {
    let f = fixture();
    let mallory = f.records.add_user("mallory");
    let post = f
        .media
        .upload_photo(f.owner, png("a.png", b"a"), "")
        .await
        .unwrap();

    assert!(f.media.delete_post(mallory, post.id).await.unwrap_err().is_not_found());
    assert!(f.media.delete_post(f.owner, PostId(12345)).await.unwrap_err().is_not_found());
    assert!(f.media.photo(&post.filepath).await.is_ok());
}

#[tokio::test]
async fn test_avatar_of_defaults() {
    let f = fixture();

    let handle = f.media.avatar_of(f.owner).await.unwrap();

    assert_eq!(handle.name().as_str(), DEFAULT_AVATAR_NAME);
    assert_eq!(handle.read_to_vec().await.unwrap(), DEFAULT_AVATAR);
}

#[tokio::test]
async fn test_upload_avatar_replaces_previous_blob() {
    let f = fixture();

    let first = f
        .media
        .upload_avatar(f.owner, png("me.png", b"first"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.previous, None);

    let second = f
        .media
        .upload_avatar(f.owner, png("me2.png", b"second"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.previous.as_deref(), Some(first.current.as_str()));

    let names = f.media.store().list(Bucket::Avatars).await.unwrap();
    assert!(!names.contains(first.current.as_str()));
    assert!(names.contains(second.current.as_str()));
    assert!(names.contains(DEFAULT_AVATAR_NAME));

    let shown = f.media.avatar_of(f.owner).await.unwrap().read_to_vec().await.unwrap();
    assert_eq!(shown, b"second");
}

#[tokio::test]
async fn test_reset_avatar_keeps_default() {
    let f = fixture();
    let change = f
        .media
        .upload_avatar(f.owner, png("me.png", b"me"))
        .await
        .unwrap()
        .unwrap();

    let previous = f.media.reset_avatar(f.owner).await.unwrap();

    assert_eq!(previous.as_deref(), Some(change.current.as_str()));
    assert!(!f.media.store().exists(Bucket::Avatars, change.current.as_str()).await.unwrap());
    assert!(f.media.store().exists(Bucket::Avatars, DEFAULT_AVATAR_NAME).await.unwrap());
    assert_eq!(f.media.reset_avatar(f.owner).await.unwrap(), None);
}
