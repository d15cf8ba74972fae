//! Garbage collection for Photobook storage.
//!
//! Uploads and record changes are not atomic across the filesystem and the
//! database, so blobs can be left behind with nothing referencing them. This
//! crate removes them:
//!
//! - [`Reconciler`] deletes blobs in a bucket that no record references
//! - [`StagingSweeper`] deletes staged uploads that were never finalized
//! - [`PurgeServer`] runs both on cron or interval schedules
//!
//! # Example
//!
//! ```rust,no_run
//! use photobook_interface::InMemoryRecords;
//! use photobook_purge::{PurgeConfig, PurgeServer, PurgeTask, Purger};
//! use photobook_storage::{FileSystemBlobStore, StorageConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PurgeConfig::default();
//! let store = Arc::new(FileSystemBlobStore::open(&StorageConfig::default())?);
//! let records = Arc::new(InMemoryRecords::new());
//! let purger = Arc::new(Purger::new(store, records, config.staging_max_age()));
//!
//! let handle = PurgeServer::new(config, purger).start()?;
//! handle.trigger(PurgeTask::Photos).await;
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod purger;
mod reconciler;
mod schedule;
mod server;
mod sweeper;

pub use config::PurgeConfig;
pub use purger::{PurgeReport, PurgeTask, Purger};
pub use reconciler::{ReconcileReport, Reconciler, is_excluded};
pub use schedule::{MAX_INTERVAL_SECS, PurgeSchedule};
pub use server::{PurgeEvent, PurgeHandle, PurgeMessage, PurgeServer, PurgeWorker};
pub use sweeper::{StagingSweeper, SweepReport};
