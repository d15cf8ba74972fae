//! Orphan reconciliation.
//!
//! Filesystem and database are never updated atomically together, so blobs can
//! outlive the records that referenced them. A reconciliation pass walks one
//! bucket and deletes every blob that no record references, skipping in-flight
//! uploads and the default avatar.

use photobook_error::PhotobookResult;
use photobook_interface::ReferenceOracle;
use photobook_storage::{BlobStore, Bucket, DEFAULT_AVATAR_NAME, TEMP_SUFFIX};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one reconciliation pass over a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Bucket that was scanned
    pub bucket: Bucket,
    /// Files found in the bucket
    pub scanned: usize,
    /// Files skipped because they are in flight or the default avatar
    pub excluded: usize,
    /// Files still referenced by a record
    pub retained: usize,
    /// Orphans removed
    pub deleted: usize,
    /// Files left alone because the oracle could not answer
    pub skipped: usize,
    /// Orphans that could not be removed
    pub failed: usize,
}

impl ReconcileReport {
    fn new(bucket: Bucket) -> Self {
        Self {
            bucket,
            scanned: 0,
            excluded: 0,
            retained: 0,
            deleted: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// Whether a stored name is never collected from `bucket`.
pub fn is_excluded(bucket: Bucket, name: &str) -> bool {
    name.ends_with(TEMP_SUFFIX) || (bucket == Bucket::Avatars && name == DEFAULT_AVATAR_NAME)
}

/// Deletes blobs that no record references.
pub struct Reconciler<S, O> {
    store: Arc<S>,
    oracle: Arc<O>,
}

impl<S: BlobStore, O: ReferenceOracle> Reconciler<S, O> {
    /// Create a reconciler.
    pub fn new(store: Arc<S>, oracle: Arc<O>) -> Self {
        Self { store, oracle }
    }

    async fn is_referenced(&self, bucket: Bucket, name: &str) -> PhotobookResult<bool> {
        match bucket {
            Bucket::Photos => self.oracle.exists_by_filepath(name).await,
            Bucket::Avatars => self.oracle.exists_by_avatar(name).await,
        }
    }

    /// Run one pass over `bucket`.
    ///
    /// Each name is checked against the oracle individually and at the moment
    /// of the check, so records committed during the pass protect their blobs.
    /// Oracle failures and delete failures affect only the file concerned.
    ///
    /// # Errors
    ///
    /// Fails only if the bucket cannot be listed.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, bucket: Bucket) -> PhotobookResult<ReconcileReport> {
        info!("Started purging unused files");
        let names = self.store.list(bucket).await?;
        let mut report = ReconcileReport::new(bucket);

        for name in names {
            report.scanned += 1;
            if is_excluded(bucket, &name) {
                report.excluded += 1;
                continue;
            }

            match self.is_referenced(bucket, &name).await {
                Ok(true) => {
                    report.retained += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(name = %name, error = %e, "Reference lookup failed, keeping file");
                    report.skipped += 1;
                    continue;
                }
            }

            match self.store.delete(bucket, &name).await {
                Ok(()) => {
                    debug!(name = %name, "Deleted orphan");
                    report.deleted += 1;
                }
                Err(e) => {
                    error!(name = %name, error = %e, "File could not be deleted");
                    report.failed += 1;
                }
            }
        }

        info!(
            scanned = report.scanned,
            deleted = report.deleted,
            skipped = report.skipped,
            failed = report.failed,
            "Finished purging unused files"
        );
        Ok(report)
    }
}
