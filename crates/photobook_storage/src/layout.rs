//! On-disk layout of the uploads root.
//!
//! ```text
//! uploads/
//! ├── photos/
//! │   └── 9b2e...c1.png
//! ├── avatars/
//! │   ├── default.jpeg
//! │   └── 51aa...07.webp
//! └── .staging/
//!     ├── photos/     (uploads whose record is not committed yet)
//!     └── avatars/
//! ```

use crate::naming::{DEFAULT_AVATAR_NAME, StoredName};
use crate::{Bucket, StorageConfig};
use photobook_error::{PhotobookResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// Image written into a freshly created avatar bucket.
pub const DEFAULT_AVATAR: &[u8] = include_bytes!("../assets/default.jpeg");

const STAGING_DIR: &str = ".staging";

/// Resolves bucket and staging paths under one uploads root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    /// Layout rooted at the configured uploads directory.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.uploads_dir().clone(),
        }
    }

    /// The uploads root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a bucket.
    pub fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.as_str())
    }

    /// Staging directory of a bucket.
    pub fn staging_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(STAGING_DIR).join(bucket.as_str())
    }

    /// Path of a finalized blob.
    pub fn blob_path(&self, bucket: Bucket, name: &StoredName) -> PathBuf {
        self.bucket_dir(bucket).join(name.as_str())
    }

    /// Path of a staged blob.
    pub fn staged_path(&self, bucket: Bucket, name: &StoredName) -> PathBuf {
        self.staging_dir(bucket).join(name.as_str())
    }

    /// Create every bucket and staging directory that is missing.
    ///
    /// When the avatar bucket is created by this call, the default avatar is
    /// written into it. Calling this again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an IO failure if a directory or the default avatar cannot be
    /// written. The process should not serve traffic in that case.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub fn ensure_initialized(&self) -> PhotobookResult<()> {
        for bucket in Bucket::iter() {
            let dir = self.bucket_dir(bucket);
            let created = !dir.is_dir();
            if created {
                create_dir(&dir)?;
                tracing::info!(bucket = %bucket, path = %dir.display(), "Created bucket");
            }
            if created && bucket == Bucket::Avatars {
                self.write_default_avatar(&dir)?;
            }
            create_dir(&self.staging_dir(bucket))?;
        }
        Ok(())
    }

    fn write_default_avatar(&self, dir: &Path) -> PhotobookResult<()> {
        let path = dir.join(DEFAULT_AVATAR_NAME);
        std::fs::write(&path, DEFAULT_AVATAR).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        tracing::info!(path = %path.display(), "Wrote default avatar");
        Ok(())
    }
}

fn create_dir(dir: &Path) -> PhotobookResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            dir.display(),
            e
        )))
    })?;
    Ok(())
}
