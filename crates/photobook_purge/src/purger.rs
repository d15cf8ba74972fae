//! Single purge passes.

use crate::{ReconcileReport, Reconciler, StagingSweeper, SweepReport};
use photobook_error::PhotobookResult;
use photobook_interface::ReferenceOracle;
use photobook_storage::{BlobStore, Bucket};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// A unit of scheduled maintenance.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PurgeTask {
    /// Delete unreferenced photos
    Photos,
    /// Delete unreferenced avatars
    Avatars,
    /// Delete abandoned staged uploads in every bucket
    Staging,
}

impl PurgeTask {
    /// Bucket reconciled by this task, `None` for the staging sweep.
    pub fn bucket(self) -> Option<Bucket> {
        match self {
            PurgeTask::Photos => Some(Bucket::Photos),
            PurgeTask::Avatars => Some(Bucket::Avatars),
            PurgeTask::Staging => None,
        }
    }
}

/// What a purge pass did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PurgeReport {
    /// Orphan reconciliation of one bucket
    Reconcile(ReconcileReport),
    /// Staging sweep, one report per bucket
    Sweep {
        /// Per-bucket results
        buckets: Vec<SweepReport>,
    },
}

impl PurgeReport {
    /// Files removed by the pass.
    pub fn deleted(&self) -> usize {
        match self {
            PurgeReport::Reconcile(report) => report.deleted,
            PurgeReport::Sweep { buckets } => buckets.iter().map(|r| r.deleted).sum(),
        }
    }
}

/// Runs purge tasks against one store and one reference oracle.
pub struct Purger<S, O> {
    reconciler: Reconciler<S, O>,
    sweeper: StagingSweeper<S>,
}

impl<S: BlobStore, O: ReferenceOracle> Purger<S, O> {
    /// Create a purger.
    pub fn new(store: Arc<S>, oracle: Arc<O>, staging_max_age: Duration) -> Self {
        Self {
            reconciler: Reconciler::new(Arc::clone(&store), oracle),
            sweeper: StagingSweeper::new(store, staging_max_age),
        }
    }

    /// The reconciler used for bucket tasks.
    pub fn reconciler(&self) -> &Reconciler<S, O> {
        &self.reconciler
    }

    /// The sweeper used for the staging task.
    pub fn sweeper(&self) -> &StagingSweeper<S> {
        &self.sweeper
    }

    /// Run one pass of `task`.
    #[instrument(skip(self))]
    pub async fn run(&self, task: PurgeTask) -> PhotobookResult<PurgeReport> {
        match task.bucket() {
            Some(bucket) => Ok(PurgeReport::Reconcile(
                self.reconciler.reconcile(bucket).await?,
            )),
            None => Ok(PurgeReport::Sweep {
                buckets: self.sweeper.sweep_all().await,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_names_parse() {
        assert_eq!("photos".parse::<PurgeTask>().ok(), Some(PurgeTask::Photos));
        assert_eq!("Avatars".parse::<PurgeTask>().ok(), Some(PurgeTask::Avatars));
        assert_eq!(PurgeTask::Staging.to_string(), "staging");
        assert!("everything".parse::<PurgeTask>().is_err());
        assert_eq!(PurgeTask::Avatars.bucket(), Some(Bucket::Avatars));
        assert_eq!(PurgeTask::Staging.bucket(), None);
    }
}
