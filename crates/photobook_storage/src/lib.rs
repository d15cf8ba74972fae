//! Bucketed blob storage for Photobook uploads.
//!
//! Photos and avatars are stored as immutable files in two flat buckets under a
//! single uploads root. This crate owns everything about those files except the
//! question of whether they are still referenced, which belongs to the record
//! store.
//!
//! # Features
//!
//! - **Generated names**: uploads are stored as a random token plus extension
//! - **Content-type gate**: only allow-listed image types are accepted
//! - **Staged uploads**: files stay out of their bucket until their record commits
//! - **Idempotent deletes**: removing a missing blob succeeds
//!
//! # Example
//!
//! ```rust
//! use photobook_storage::{BlobStore, Bucket, FileSystemBlobStore, StorageConfig, Upload};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemBlobStore::open(&StorageConfig::with_root("/tmp/photobook"))?;
//!
//! let upload = Upload::new("image/png", "cat.png", vec![0u8; 64]);
//! let name = store.write(Bucket::Photos, &upload).await?;
//!
//! let bytes = store.read(Bucket::Photos, name.as_str()).await?.read_to_vec().await?;
//! assert_eq!(bytes, upload.content);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob;
mod bucket;
mod config;
mod filesystem;
mod layout;
mod naming;
mod store;
mod upload;
mod validator;

pub use blob::{BlobEntry, BlobHandle, StagedBlob, Upload};
pub use bucket::Bucket;
pub use config::{StorageConfig, StorageConfigBuilder};
pub use filesystem::FileSystemBlobStore;
pub use layout::{DEFAULT_AVATAR, StorageLayout};
pub use naming::{DEFAULT_AVATAR_NAME, StoredName, TEMP_SUFFIX, extension_of, generate_name};
pub use store::BlobStore;
pub use upload::{Committed, Uploader};
pub use validator::{ContentTypeValidator, DEFAULT_CONTENT_TYPES, content_type_for};

pub use photobook_error::{StorageError, StorageErrorKind};
