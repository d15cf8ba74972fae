//! Photobook - photo and avatar storage for a social backend.
//!
//! Uploaded photos and avatars live as immutable files in two buckets on local
//! disk, referenced from relational records. This crate ties the pieces
//! together:
//!
//! - [`MediaService`] uploads, reads and deletes media along with its records
//! - [`PhotobookConfig`] loads layered configuration
//! - the purge server collects blobs nothing references any more
//!
//! # Example
//!
//! ```rust,no_run
//! use photobook::{FileSystemBlobStore, InMemoryRecords, MediaService, PhotobookConfig, Upload};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PhotobookConfig::load(None)?;
//! let store = Arc::new(FileSystemBlobStore::open(config.storage())?);
//! let records = Arc::new(InMemoryRecords::new());
//! let owner = records.add_user("alice");
//!
//! let media = MediaService::new(store, records);
//! let post = media
//!     .upload_photo(owner, Upload::new("image/png", "cat.png", vec![0u8; 16]), "my cat")
//!     .await?;
//! let bytes = media.photo(&post.filepath).await?.read_to_vec().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `photobook_error` - Error types
//! - `photobook_interface` - Record store and reference oracle traits
//! - `photobook_storage` - Buckets, names, staged uploads
//! - `photobook_database` - PostgreSQL records
//! - `photobook_purge` - Orphan reconciliation and schedules

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod maintenance;
mod media;

pub use config::{DatabaseConfig, PhotobookConfig};
pub use maintenance::purge_once;
pub use media::{AvatarChange, MediaService};

pub use photobook_database::{PostgresRecords, database_url, establish_pool, run_migrations};
pub use photobook_error::{PhotobookError, PhotobookErrorKind, PhotobookResult};
pub use photobook_interface::{
    InMemoryRecords, Post, PostId, RecordStore, ReferenceOracle, UserId,
};
pub use photobook_purge::{
    PurgeConfig, PurgeHandle, PurgeReport, PurgeSchedule, PurgeServer, PurgeTask, Purger,
    ReconcileReport, Reconciler, StagingSweeper, SweepReport,
};
pub use photobook_storage::{
    BlobHandle, BlobStore, Bucket, FileSystemBlobStore, StorageConfig, StoredName, Upload,
    Uploader,
};
