//! Sweep of abandoned uploads.
//!
//! An upload that crashed between staging and finalizing leaves its file in the
//! staging area forever, because the reconciler never looks there. The sweeper
//! removes staged files, and `.tmp` files inside buckets, once they are older
//! than the configured grace period.

use photobook_error::PhotobookResult;
use photobook_storage::{BlobEntry, BlobStore, Bucket, StagedBlob, StoredName, TEMP_SUFFIX};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use strum::IntoEnumIterator;
use tracing::{error, info, instrument, warn};

/// Outcome of one staging sweep over a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Bucket whose staging area was swept
    pub bucket: Bucket,
    /// Staged and temporary files examined
    pub scanned: usize,
    /// Files younger than the grace period
    pub fresh: usize,
    /// Abandoned files removed
    pub deleted: usize,
    /// Abandoned files that could not be removed
    pub failed: usize,
}

/// Removes staged uploads older than a grace period.
pub struct StagingSweeper<S> {
    store: Arc<S>,
    max_age: Duration,
}

impl<S: BlobStore> StagingSweeper<S> {
    /// Create a sweeper with the given grace period.
    pub fn new(store: Arc<S>, max_age: Duration) -> Self {
        Self { store, max_age }
    }

    /// Grace period.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Sweep `bucket` using the current time.
    pub async fn sweep(&self, bucket: Bucket) -> PhotobookResult<SweepReport> {
        self.sweep_at(bucket, SystemTime::now()).await
    }

    /// Sweep every bucket.
    ///
    /// A bucket that cannot be swept is logged and left out of the result; the
    /// other buckets are still swept.
    pub async fn sweep_all(&self) -> Vec<SweepReport> {
        let mut reports = Vec::new();
        for bucket in Bucket::iter() {
            match self.sweep(bucket).await {
                Ok(report) => reports.push(report),
                Err(e) => error!(bucket = %bucket, error = %e, "Staging sweep failed"),
            }
        }
        reports
    }

    fn is_abandoned(&self, entry: &BlobEntry, now: SystemTime) -> bool {
        // Modification times in the future count as fresh.
        now.duration_since(entry.modified)
            .map(|age| age > self.max_age)
            .unwrap_or(false)
    }

    /// Sweep `bucket` as if the current time were `now`.
    #[instrument(skip(self, now), fields(max_age_secs = self.max_age.as_secs()))]
    pub async fn sweep_at(&self, bucket: Bucket, now: SystemTime) -> PhotobookResult<SweepReport> {
        let mut report = SweepReport {
            bucket,
            scanned: 0,
            fresh: 0,
            deleted: 0,
            failed: 0,
        };

        for entry in self.store.list_staged(bucket).await? {
            report.scanned += 1;
            if !self.is_abandoned(&entry, now) {
                report.fresh += 1;
                continue;
            }
            let name = match StoredName::parse(entry.name.as_str()) {
                Ok(name) => name,
                Err(e) => {
                    warn!(name = %entry.name, error = %e, "Skipping unexpected staging entry");
                    report.failed += 1;
                    continue;
                }
            };
            match self.store.abandon(&StagedBlob::new(bucket, name)).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    error!(name = %entry.name, error = %e, "Staged upload could not be deleted");
                    report.failed += 1;
                }
            }
        }

        let temporaries = self
            .store
            .entries(bucket)
            .await?
            .into_iter()
            .filter(|entry| entry.name.ends_with(TEMP_SUFFIX));
        for entry in temporaries {
            report.scanned += 1;
            if !self.is_abandoned(&entry, now) {
                report.fresh += 1;
                continue;
            }
            match self.store.delete(bucket, &entry.name).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    error!(name = %entry.name, error = %e, "Temporary file could not be deleted");
                    report.failed += 1;
                }
            }
        }

        if report.deleted > 0 || report.failed > 0 {
            info!(
                deleted = report.deleted,
                failed = report.failed,
                "Swept abandoned uploads"
            );
        }
        Ok(report)
    }
}
