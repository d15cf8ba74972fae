//! Filesystem-based blob store implementation.
//!
//! Buckets are flat directories under the uploads root. Staged uploads live in
//! a sibling `.staging` tree on the same filesystem so finalizing is a link
//! plus unlink rather than a copy.

use crate::layout::StorageLayout;
use crate::naming::generate_name;
use crate::validator::{ContentTypeValidator, content_type_for};
use crate::{
    BlobEntry, BlobHandle, BlobStore, Bucket, StagedBlob, StorageConfig, StoredName, Upload,
};
use photobook_error::{PhotobookResult, StorageError, StorageErrorKind};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Filesystem blob store.
///
/// # Example Structure
///
/// ```text
/// uploads/
/// ├── photos/9b2e0c...c1.png
/// ├── avatars/default.jpeg
/// └── .staging/photos/77f1...0a.jpeg
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemBlobStore {
    layout: StorageLayout,
    validator: ContentTypeValidator,
}

impl FileSystemBlobStore {
    /// Open the store, creating any missing bucket.
    ///
    /// # Errors
    ///
    /// Returns an IO failure if the layout cannot be initialized.
    #[tracing::instrument(skip(config), fields(root = %config.uploads_dir().display()))]
    pub fn open(config: &StorageConfig) -> PhotobookResult<Self> {
        let layout = StorageLayout::new(config);
        layout.ensure_initialized()?;

        tracing::info!("Opened filesystem blob store");
        Ok(Self {
            layout,
            validator: ContentTypeValidator::new(config.allowed_content_types()),
        })
    }

    /// Layout used by this store.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    fn check_content_type(&self, upload: &Upload) -> PhotobookResult<()> {
        if self.validator.accept(&upload.content_type) {
            Ok(())
        } else {
            tracing::debug!(content_type = %upload.content_type, "Rejected upload");
            Err(StorageError::new(StorageErrorKind::InvalidContentType(
                upload.content_type.clone(),
            ))
            .into())
        }
    }

    /// Write `content` to a new file, refusing to replace an existing one.
    async fn write_new(path: &Path, content: &[u8]) -> PhotobookResult<()> {
        let write_err = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(write_err)?;

        let written = async {
            file.write_all(content).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(path).await {
                tracing::warn!(path = %path.display(), error = %cleanup, "Could not remove partial file");
            }
            return Err(write_err(e).into());
        }
        Ok(())
    }

    async fn scan(dir: &Path, bucket: Bucket) -> PhotobookResult<Vec<BlobEntry>> {
        let read_err = |e: std::io::Error| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::BucketMissing(dir.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut entries = Vec::new();
        let mut dir_entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
        while let Some(entry) = dir_entries.next_entry().await.map_err(read_err)? {
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                // Deleted between listing and stat
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(read_err(e).into()),
            };
            if !metadata.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            // Only names that delete and read accept are reported.
            if StoredName::parse(name.as_str()).is_err() {
                tracing::warn!(path = %entry.path().display(), "Skipping unaddressable file name");
                continue;
            }
            entries.push(BlobEntry {
                bucket,
                name,
                size: metadata.len(),
                modified: metadata.modified().map_err(read_err)?,
            });
        }
        Ok(entries)
    }

    async fn remove_if_present(path: &Path) -> PhotobookResult<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileDelete(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for FileSystemBlobStore {
    #[tracing::instrument(skip(self, upload), fields(bucket = %bucket, size = upload.content.len(), content_type = %upload.content_type))]
    async fn write(&self, bucket: Bucket, upload: &Upload) -> PhotobookResult<StoredName> {
        self.check_content_type(upload)?;

        let name = generate_name(&upload.original_name);
        let path = self.layout.blob_path(bucket, &name);
        Self::write_new(&path, &upload.content).await?;

        tracing::info!(name = %name, path = %path.display(), "Stored blob");
        Ok(name)
    }

    #[tracing::instrument(skip(self), fields(bucket = %bucket))]
    async fn read(&self, bucket: Bucket, name: &str) -> PhotobookResult<BlobHandle> {
        let name = StoredName::parse(name)?;
        let path = self.layout.blob_path(bucket, &name);
        let not_found = || StorageError::new(StorageErrorKind::NotFound(name.to_string()));

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(not_found().into()),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found().into()),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        let file = tokio::fs::File::open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                not_found()
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(path = %path.display(), size = metadata.len(), "Opened blob");
        let content_type = content_type_for(name.as_str());
        Ok(BlobHandle::new(name, metadata.len(), content_type, file))
    }

    async fn list(&self, bucket: Bucket) -> PhotobookResult<BTreeSet<String>> {
        Ok(self
            .entries(bucket)
            .await?
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }

    #[tracing::instrument(skip(self), fields(bucket = %bucket))]
    async fn entries(&self, bucket: Bucket) -> PhotobookResult<Vec<BlobEntry>> {
        Self::scan(&self.layout.bucket_dir(bucket), bucket).await
    }

    #[tracing::instrument(skip(self), fields(bucket = %bucket))]
    async fn delete(&self, bucket: Bucket, name: &str) -> PhotobookResult<()> {
        let name = StoredName::parse(name)?;
        let path = self.layout.blob_path(bucket, &name);

        if Self::remove_if_present(&path).await? {
            tracing::info!(path = %path.display(), "Deleted blob");
        } else {
            tracing::debug!(path = %path.display(), "Blob already gone");
        }
        Ok(())
    }

    async fn exists(&self, bucket: Bucket, name: &str) -> PhotobookResult<bool> {
        let name = StoredName::parse(name)?;
        let path = self.layout.blob_path(bucket, &name);
        tokio::fs::try_exists(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    #[tracing::instrument(skip(self, upload), fields(bucket = %bucket, size = upload.content.len(), content_type = %upload.content_type))]
    async fn stage(&self, bucket: Bucket, upload: &Upload) -> PhotobookResult<StagedBlob> {
        self.check_content_type(upload)?;

        let name = generate_name(&upload.original_name);
        let path = self.layout.staged_path(bucket, &name);
        Self::write_new(&path, &upload.content).await?;

        tracing::debug!(name = %name, path = %path.display(), "Staged upload");
        Ok(StagedBlob::new(bucket, name))
    }

    #[tracing::instrument(skip(self), fields(bucket = %staged.bucket(), name = %staged.name()))]
    async fn finalize(&self, staged: &StagedBlob) -> PhotobookResult<()> {
        let from = self.layout.staged_path(staged.bucket(), staged.name());
        let to = self.layout.blob_path(staged.bucket(), staged.name());

        // hard_link fails when the target exists, unlike rename
        tokio::fs::hard_link(&from, &to).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(format!(
                    "staged {}",
                    staged.name()
                )))
            } else {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "link {} to {}: {}",
                    from.display(),
                    to.display(),
                    e
                )))
            }
        })?;
        Self::remove_if_present(&from).await?;

        tracing::info!(path = %to.display(), "Finalized upload");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(bucket = %staged.bucket(), name = %staged.name()))]
    async fn abandon(&self, staged: &StagedBlob) -> PhotobookResult<()> {
        let path = self.layout.staged_path(staged.bucket(), staged.name());
        if Self::remove_if_present(&path).await? {
            tracing::info!(path = %path.display(), "Discarded staged upload");
        }
        Ok(())
    }

    async fn list_staged(&self, bucket: Bucket) -> PhotobookResult<Vec<BlobEntry>> {
        Self::scan(&self.layout.staging_dir(bucket), bucket).await
    }
}
