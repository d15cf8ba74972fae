//! Error types for the Photobook media storage service.
//!
//! Every crate in the workspace reports failures through the types defined here.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use photobook_error::{PhotobookResult, StorageError, StorageErrorKind};
//!
//! fn load() -> PhotobookResult<Vec<u8>> {
//!     Err(StorageError::new(StorageErrorKind::NotFound("cat.png".to_string())))?
//! }
//!
//! match load() {
//!     Ok(bytes) => println!("Got {} bytes", bytes.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod oracle;
mod record;
mod schedule;
mod storage;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{PhotobookError, PhotobookErrorKind, PhotobookResult};
pub use oracle::OracleError;
pub use record::{RecordError, RecordErrorKind};
pub use schedule::ScheduleError;
pub use storage::{StorageError, StorageErrorKind};
