//! Two-phase uploads.
//!
//! A blob only becomes visible in its bucket after the record referencing it
//! has been committed:
//!
//! 1. stage: validate and write to the bucket's staging area
//! 2. commit: the caller creates the referencing record under the final name
//! 3. finalize: move the staged file into the bucket
//!
//! If the commit fails the staged file is discarded. A crash between steps
//! leaves the file in staging, where the staging sweep eventually removes it.
//! The reconciler never looks at staging, so an in-flight upload cannot be
//! mistaken for an orphan.

use crate::{BlobStore, Bucket, StoredName, Upload};
use photobook_error::PhotobookResult;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Result of a committed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    /// Final name of the blob in its bucket
    pub name: StoredName,
    /// Value returned by the commit step
    pub value: T,
}

/// Runs uploads through stage, commit, finalize.
pub struct Uploader<S> {
    store: Arc<S>,
}

impl<S> Clone for Uploader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: BlobStore + 'static> Uploader<S> {
    /// Create an uploader over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Stage `upload`, run `commit` with its final name, then finalize.
    ///
    /// # Errors
    ///
    /// - `InvalidContentType` before anything is written
    /// - any error from `commit`, after the staged file is discarded
    /// - an IO failure from staging or finalizing
    #[tracing::instrument(skip(self, upload, commit), fields(bucket = %bucket, original = %upload.original_name))]
    pub async fn upload<F, Fut, T>(
        &self,
        bucket: Bucket,
        upload: Upload,
        commit: F,
    ) -> PhotobookResult<Committed<T>>
    where
        F: FnOnce(StoredName) -> Fut + Send,
        Fut: Future<Output = PhotobookResult<T>> + Send,
        T: Send,
    {
        let staged = self.store.stage(bucket, &upload).await?;
        drop(upload);

        let value = match commit(staged.name().clone()).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(name = %staged.name(), error = %e, "Commit failed, discarding staged upload");
                if let Err(cleanup) = self.store.abandon(&staged).await {
                    tracing::error!(name = %staged.name(), error = %cleanup, "Could not discard staged upload");
                }
                return Err(e);
            }
        };

        if let Err(e) = self.store.finalize(&staged).await {
            // The record now names a blob that is still in staging.
            tracing::error!(name = %staged.name(), error = %e, "Committed upload could not be finalized");
            return Err(e);
        }

        Ok(Committed {
            name: staged.name().clone(),
            value,
        })
    }

    /// Run [`upload`](Self::upload) detached from the caller.
    ///
    /// The returned handle may be awaited or dropped; the upload completes
    /// either way.
    pub fn spawn<F, Fut, T>(
        &self,
        bucket: Bucket,
        upload: Upload,
        commit: F,
    ) -> JoinHandle<PhotobookResult<Committed<T>>>
    where
        F: FnOnce(StoredName) -> Fut + Send + 'static,
        Fut: Future<Output = PhotobookResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let uploader = self.clone();
        tokio::spawn(async move { uploader.upload(bucket, upload, commit).await })
    }
}
