//! Tests for the filesystem blob store.

use photobook_storage::{
    BlobStore, Bucket, DEFAULT_CONTENT_TYPES, FileSystemBlobStore, StorageConfig,
    StorageConfigBuilder, StorageErrorKind, Upload,
};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

fn open_store(temp_dir: &TempDir) -> FileSystemBlobStore {
    FileSystemBlobStore::open(&StorageConfig::with_root(temp_dir.path().join("uploads"))).unwrap()
}

#[tokio::test]
async fn test_write_and_read_every_supported_type() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);

    for (i, content_type) in DEFAULT_CONTENT_TYPES.iter().enumerate() {
        let data = format!("image body {}", i).into_bytes();
        let upload = Upload::new(*content_type, "picture.img", data.clone());

        let name = storage.write(Bucket::Photos, &upload).await.unwrap();
        assert!(name.as_str().ends_with(".img"));

        let retrieved = storage
            .read(Bucket::Photos, name.as_str())
            .await
            .unwrap()
            .read_to_vec()
            .await
            .unwrap();
        assert_eq!(retrieved, data, "{content_type}");
    }
}

#[tokio::test]
async fn test_unsupported_type_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);

    for content_type in ["image/gif", "text/html", "application/pdf", ""] {
        let upload = Upload::new(content_type, "evil.html", b"<script>".to_vec());
        let err = storage.write(Bucket::Photos, &upload).await.unwrap_err();
        assert!(err.is_invalid_content_type(), "{content_type}");
    }

    assert!(storage.list(Bucket::Photos).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generated_name_preserves_extension() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);

    let upload = Upload::new("image/png", "cat.png", b"meow".to_vec());
    let name = storage.write(Bucket::Photos, &upload).await.unwrap();

    assert_ne!(name.as_str(), "cat.png");
    assert!(name.as_str().ends_with(".png"));
    let path = temp_dir.path().join("uploads/photos").join(name.as_str());
    assert!(path.is_file());
}

#[tokio::test]
async fn test_read_is_lazy_stream() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);

    let data = vec![7u8; 10_000];
    let upload = Upload::new("image/webp", "big.webp", data.clone());
    let name = storage.write(Bucket::Avatars, &upload).await.unwrap();

    let mut handle = storage.read(Bucket::Avatars, name.as_str()).await.unwrap();
    assert_eq!(handle.size(), 10_000);
    assert_eq!(handle.content_type(), "image/webp");

    let mut first = [0u8; 16];
    handle.read_exact(&mut first).await.unwrap();
    assert_eq!(first, [7u8; 16]);
}

#[tokio::test]
async fn test_read_missing_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);

    let err = storage.read(Bucket::Photos, "nope.png").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_read_rejects_path_traversal() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);
    std::fs::write(temp_dir.path().join("secret.txt"), b"secret").unwrap();

    for name in ["../../secret.txt", "../photos/x", "..", "/etc/passwd"] {
        let err = storage.read(Bucket::Photos, name).await.unwrap_err();
        assert!(
            matches!(err.storage_kind(), Some(StorageErrorKind::InvalidName(_))),
            "{name}"
        );
    }
}

#[tokio::test]
async fn test_read_directory_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);
    std::fs::create_dir(temp_dir.path().join("uploads/photos/sub")).unwrap();

    let err = storage.read(Bucket::Photos, "sub").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);

    let upload = Upload::new("image/jpeg", "me.jpg", b"Delete me".to_vec());
    let name = storage.write(Bucket::Photos, &upload).await.unwrap();
    assert!(storage.exists(Bucket::Photos, name.as_str()).await.unwrap());

    storage.delete(Bucket::Photos, name.as_str()).await.unwrap();
    storage.delete(Bucket::Photos, name.as_str()).await.unwrap();
    assert!(!storage.exists(Bucket::Photos, name.as_str()).await.unwrap());
}

#[tokio::test]
async fn test_list_only_regular_files() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);

    let a = storage
        .write(Bucket::Photos, &Upload::new("image/png", "a.png", b"a".to_vec()))
        .await
        .unwrap();
    let b = storage
        .write(Bucket::Photos, &Upload::new("image/bmp", "b.bmp", b"b".to_vec()))
        .await
        .unwrap();
    std::fs::create_dir(temp_dir.path().join("uploads/photos/nested")).unwrap();

    let names = storage.list(Bucket::Photos).await.unwrap();
    assert_eq!(names.len(), 2);
    assert!(names.contains(a.as_str()));
    assert!(names.contains(b.as_str()));

    let avatars = storage.list(Bucket::Avatars).await.unwrap();
    assert!(!avatars.contains(a.as_str()));
}

#[tokio::test]
async fn test_list_missing_bucket_fails() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);
    std::fs::remove_dir_all(temp_dir.path().join("uploads/photos")).unwrap();

    let err = storage.list(Bucket::Photos).await.unwrap_err();
    assert!(err.storage_kind().is_some_and(|k| k.is_io_failure()));
}

#[tokio::test]
async fn test_built_config_narrows_allow_list() {
    let temp_dir = TempDir::new().unwrap();
    let config = StorageConfigBuilder::default()
        .uploads_dir(temp_dir.path().join("uploads"))
        .allowed_content_types(vec!["image/gif".to_string()])
        .build()
        .unwrap();
    let storage = FileSystemBlobStore::open(&config).unwrap();

    let gif = Upload::new("image/gif", "spin.gif", b"GIF89a".to_vec());
    let name = storage.write(Bucket::Photos, &gif).await.unwrap();
    assert!(storage.exists(Bucket::Photos, name.as_str()).await.unwrap());

    let png = Upload::new("image/png", "still.png", b"png".to_vec());
    let err = storage.write(Bucket::Photos, &png).await.unwrap_err();
    assert!(err.is_invalid_content_type());
}

#[tokio::test]
async fn test_hidden_names_are_readable_and_deletable() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);
    std::fs::write(temp_dir.path().join("uploads/photos/.hidden.png"), b"dot").unwrap();

    let names = storage.list(Bucket::Photos).await.unwrap();
    assert!(names.contains(".hidden.png"));

    let bytes = storage
        .read(Bucket::Photos, ".hidden.png")
        .await
        .unwrap()
        .read_to_vec()
        .await
        .unwrap();
    assert_eq!(bytes, b"dot");

    storage.delete(Bucket::Photos, ".hidden.png").await.unwrap();
    assert!(!storage.exists(Bucket::Photos, ".hidden.png").await.unwrap());
}

#[tokio::test]
async fn test_exists_reports_io_failure() {
    let temp_dir = TempDir::new().unwrap();
    let storage = open_store(&temp_dir);
    let bucket_dir = temp_dir.path().join("uploads/photos");
    std::fs::remove_dir_all(&bucket_dir).unwrap();
    std::fs::write(&bucket_dir, b"not a directory").unwrap();

    let err = storage.exists(Bucket::Photos, "x.png").await.unwrap_err();
    assert!(err.storage_kind().is_some_and(|k| k.is_io_failure()));
}
