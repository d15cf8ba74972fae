//! One-off purge runs outside the scheduler.

use photobook_error::PhotobookResult;
use photobook_interface::ReferenceOracle;
use photobook_purge::{PurgeConfig, PurgeReport, PurgeTask, Reconciler, StagingSweeper};
use photobook_storage::BlobStore;
use std::sync::Arc;
use tracing::instrument;

/// Run `tasks` once, in order.
///
/// The staging sweep never consults references, so `connect` is called only
/// when at least one task reconciles a bucket.
///
/// # Errors
///
/// Fails if `connect` fails or a bucket cannot be listed.
#[instrument(skip(store, config, connect))]
pub async fn purge_once<S, O, F>(
    store: Arc<S>,
    config: &PurgeConfig,
    tasks: &[PurgeTask],
    connect: F,
) -> PhotobookResult<Vec<(PurgeTask, PurgeReport)>>
where
    S: BlobStore,
    O: ReferenceOracle,
    F: FnOnce() -> PhotobookResult<Arc<O>>,
{
    let reconciler = if tasks.iter().any(|task| task.bucket().is_some()) {
        Some(Reconciler::new(Arc::clone(&store), connect()?))
    } else {
        None
    };
    let sweeper = StagingSweeper::new(store, config.staging_max_age());

    let mut reports = Vec::with_capacity(tasks.len());
    for &task in tasks {
        let report = match task.bucket().zip(reconciler.as_ref()) {
            Some((bucket, reconciler)) => PurgeReport::Reconcile(reconciler.reconcile(bucket).await?),
            None => PurgeReport::Sweep {
                buckets: sweeper.sweep_all().await,
            },
        };
        reports.push((task, report));
    }
    Ok(reports)
}
