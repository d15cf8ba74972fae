//! Blob store trait definition.

use crate::{BlobEntry, BlobHandle, Bucket, StagedBlob, StoredName, Upload};
use photobook_error::PhotobookResult;
use std::collections::BTreeSet;

/// Bucketed storage of immutable blobs.
///
/// Blobs are created once, read any number of times, and deleted once. No
/// operation modifies a stored file in place, so implementations need no
/// per-file locking.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Validate, name, and store an upload directly in `bucket`.
    ///
    /// # Errors
    ///
    /// - `InvalidContentType` if the content type is not allowed (nothing is written)
    /// - an IO failure if the copy fails or the generated name already exists
    async fn write(&self, bucket: Bucket, upload: &Upload) -> PhotobookResult<StoredName>;

    /// Open a stored blob for reading.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if `name` could escape the bucket
    /// - `NotFound` if no readable file has that name
    async fn read(&self, bucket: Bucket, name: &str) -> PhotobookResult<BlobHandle>;

    /// Names of the regular files directly inside `bucket`.
    async fn list(&self, bucket: Bucket) -> PhotobookResult<BTreeSet<String>>;

    /// Regular files directly inside `bucket`, with size and modification time.
    async fn entries(&self, bucket: Bucket) -> PhotobookResult<Vec<BlobEntry>>;

    /// Remove a blob. Removing a blob that is already gone succeeds.
    async fn delete(&self, bucket: Bucket, name: &str) -> PhotobookResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, bucket: Bucket, name: &str) -> PhotobookResult<bool>;

    /// Validate and write an upload to the staging area of `bucket`.
    ///
    /// Staged blobs are invisible to [`list`](Self::list) and
    /// [`read`](Self::read) until [`finalize`](Self::finalize) moves them.
    async fn stage(&self, bucket: Bucket, upload: &Upload) -> PhotobookResult<StagedBlob>;

    /// Move a staged blob into its bucket without overwriting anything.
    async fn finalize(&self, staged: &StagedBlob) -> PhotobookResult<()>;

    /// Discard a staged blob. Discarding one that is already gone succeeds.
    async fn abandon(&self, staged: &StagedBlob) -> PhotobookResult<()>;

    /// Files currently in the staging area of `bucket`.
    async fn list_staged(&self, bucket: Bucket) -> PhotobookResult<Vec<BlobEntry>>;
}
