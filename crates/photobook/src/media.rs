//! Upload, read and delete of photos and avatars.
//!
//! Every upload goes through the staged two-phase path: the blob is staged,
//! the record that references it is committed, and only then is the blob moved
//! into its bucket. Explicit deletes remove the record first and the blob
//! second, so a crash in between leaves an orphan for the reconciler rather
//! than a record pointing at nothing.

use photobook_error::{PhotobookResult, RecordError, RecordErrorKind};
use photobook_interface::{Post, PostId, RecordStore, UserId};
use photobook_storage::{
    BlobHandle, BlobStore, Bucket, DEFAULT_AVATAR_NAME, StoredName, Upload, Uploader,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

/// Result of an avatar upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarChange {
    /// Name of the new avatar blob
    pub current: StoredName,
    /// Avatar the user had before, `None` for the default
    pub previous: Option<String>,
}

/// Composes blob storage with the record store.
pub struct MediaService<S, R> {
    uploader: Uploader<S>,
    records: Arc<R>,
}

impl<S, R> Clone for MediaService<S, R> {
    fn clone(&self) -> Self {
        Self {
            uploader: self.uploader.clone(),
            records: Arc::clone(&self.records),
        }
    }
}

impl<S, R> MediaService<S, R>
where
    S: BlobStore + 'static,
    R: RecordStore + 'static,
{
    /// Create a service over a store and a record store.
    pub fn new(store: Arc<S>, records: Arc<R>) -> Self {
        Self {
            uploader: Uploader::new(store),
            records,
        }
    }

    /// Blob store.
    pub fn store(&self) -> &Arc<S> {
        self.uploader.store()
    }

    /// Record store.
    pub fn records(&self) -> &Arc<R> {
        &self.records
    }

    /// Store a photo and create the post referencing it.
    ///
    /// # Errors
    ///
    /// `InvalidContentType` before anything is written, a record error if the
    /// post cannot be created, or an IO failure.
    #[instrument(skip(self, upload, description), fields(owner = %owner, original = %upload.original_name))]
    pub async fn upload_photo(
        &self,
        owner: UserId,
        upload: Upload,
        description: &str,
    ) -> PhotobookResult<Post> {
        let records = Arc::clone(&self.records);
        let description = description.to_string();
        let committed = self
            .uploader
            .upload(Bucket::Photos, upload, move |name| async move {
                records.create_post(owner, name.as_str(), &description).await
            })
            .await?;
        info!(post = %committed.value.id, name = %committed.name, "Uploaded photo");
        Ok(committed.value)
    }

    /// Replace a user's avatar without waiting for the upload.
    ///
    /// The previous avatar blob is removed once the new one is in place, unless
    /// it is the default avatar. The handle may be dropped.
    pub fn upload_avatar(
        &self,
        owner: UserId,
        upload: Upload,
    ) -> JoinHandle<PhotobookResult<AvatarChange>> {
        let service = self.clone();
        tokio::spawn(async move { service.replace_avatar(owner, upload).await })
    }

    #[instrument(skip(self, upload), fields(owner = %owner, original = %upload.original_name))]
    async fn replace_avatar(&self, owner: UserId, upload: Upload) -> PhotobookResult<AvatarChange> {
        let records = Arc::clone(&self.records);
        let committed = self
            .uploader
            .upload(Bucket::Avatars, upload, move |name| async move {
                records.set_avatar(owner, name.as_str()).await
            })
            .await?;

        if let Some(previous) = committed.value.as_deref() {
            self.discard_avatar(previous).await;
        }
        info!(name = %committed.name, "Replaced avatar");
        Ok(AvatarChange {
            current: committed.name,
            previous: committed.value,
        })
    }

    /// Point a user back at the default avatar and remove the old blob.
    ///
    /// Returns the name of the avatar that was cleared.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn reset_avatar(&self, owner: UserId) -> PhotobookResult<Option<String>> {
        let previous = self.records.reset_avatar(owner).await?;
        if let Some(name) = previous.as_deref() {
            self.discard_avatar(name).await;
        }
        Ok(previous)
    }

    async fn discard_avatar(&self, name: &str) {
        if name == DEFAULT_AVATAR_NAME {
            return;
        }
        // Left for the reconciler if this fails.
        if let Err(e) = self.store().delete(Bucket::Avatars, name).await {
            warn!(name, error = %e, "Could not delete previous avatar");
        }
    }

    /// Delete a post owned by `owner`, then its photo.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such post belongs to `owner`.
    #[instrument(skip(self), fields(owner = %owner, post = %post))]
    pub async fn delete_post(&self, owner: UserId, post: PostId) -> PhotobookResult<Post> {
        let deleted = self
            .records
            .delete_post(owner, post)
            .await?
            .ok_or_else(|| RecordError::new(RecordErrorKind::PostNotFound(post.0)))?;

        if let Err(e) = self.store().delete(Bucket::Photos, &deleted.filepath).await {
            warn!(name = %deleted.filepath, error = %e, "Could not delete photo of removed post");
        }
        info!(name = %deleted.filepath, "Deleted post");
        Ok(deleted)
    }

    /// Open a stored photo.
    pub async fn photo(&self, name: &str) -> PhotobookResult<BlobHandle> {
        self.store().read(Bucket::Photos, name).await
    }

    /// Open a stored avatar.
    pub async fn avatar(&self, name: &str) -> PhotobookResult<BlobHandle> {
        self.store().read(Bucket::Avatars, name).await
    }

    /// Open the avatar shown for `owner`, falling back to the default.
    pub async fn avatar_of(&self, owner: UserId) -> PhotobookResult<BlobHandle> {
        let name = self.records.avatar_of(owner).await?;
        self.avatar(name.as_deref().unwrap_or(DEFAULT_AVATAR_NAME))
            .await
    }
}
