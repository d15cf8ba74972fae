//! Top-level error wrapper types.

#[cfg(feature = "database")]
use crate::DatabaseError;
use crate::{ConfigError, OracleError, RecordError, ScheduleError, StorageError};

/// Every failure the workspace can report.
///
/// # Examples
///
/// ```
/// use photobook_error::{ConfigError, PhotobookError};
///
/// let err: PhotobookError = ConfigError::new("bad root").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PhotobookErrorKind {
    /// Blob storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Reference lookup failed
    #[from(OracleError)]
    Oracle(OracleError),
    /// Record lookup found nothing
    #[from(RecordError)]
    Record(RecordError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Purge schedule error
    #[from(ScheduleError)]
    Schedule(ScheduleError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Photobook error with kind discrimination.
///
/// # Examples
///
/// ```
/// use photobook_error::{PhotobookErrorKind, PhotobookResult, StorageError, StorageErrorKind};
///
/// fn might_fail() -> PhotobookResult<()> {
///     Err(StorageError::new(StorageErrorKind::InvalidContentType("text/html".into())))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(err.is_invalid_content_type());
/// assert!(matches!(err.kind(), PhotobookErrorKind::Storage(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Photobook Error: {}", _0)]
pub struct PhotobookError(Box<PhotobookErrorKind>);

impl PhotobookError {
    /// Create a new error from a kind.
    pub fn new(kind: PhotobookErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PhotobookErrorKind {
        &self.0
    }

    /// Storage error kind, if this is a storage error.
    pub fn storage_kind(&self) -> Option<&crate::StorageErrorKind> {
        match self.kind() {
            PhotobookErrorKind::Storage(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// Requested blob or record does not exist.
    pub fn is_not_found(&self) -> bool {
        match self.kind() {
            PhotobookErrorKind::Storage(e) => {
                matches!(e.kind, crate::StorageErrorKind::NotFound(_))
            }
            PhotobookErrorKind::Record(_) => true,
            #[cfg(feature = "database")]
            PhotobookErrorKind::Database(e) => {
                matches!(e.kind, crate::DatabaseErrorKind::NotFound)
            }
            _ => false,
        }
    }

    /// Upload was rejected by the content-type allow-list.
    pub fn is_invalid_content_type(&self) -> bool {
        matches!(
            self.storage_kind(),
            Some(crate::StorageErrorKind::InvalidContentType(_))
        )
    }

    /// Reference store could not be consulted.
    pub fn is_oracle_unavailable(&self) -> bool {
        matches!(self.kind(), PhotobookErrorKind::Oracle(_))
    }
}

// Generic From implementation for any type that converts to PhotobookErrorKind
impl<T> From<T> for PhotobookError
where
    T: Into<PhotobookErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Photobook operations.
pub type PhotobookResult<T> = std::result::Result<T, PhotobookError>;
