//! Record store and reference oracle traits for Photobook.
//!
//! Blob storage never owns the question "is this file still in use". That answer
//! lives with the relational records (posts and user avatars) and is reached only
//! through the traits in this crate:
//!
//! - [`ReferenceOracle`] answers point lookups by stored file name
//! - [`RecordStore`] creates and removes the records that reference blobs
//!
//! [`InMemoryRecords`] implements both for tests and local development.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod records;
mod traits;

pub use memory::InMemoryRecords;
pub use records::{Post, PostId, UserId};
pub use traits::{RecordStore, ReferenceOracle};
