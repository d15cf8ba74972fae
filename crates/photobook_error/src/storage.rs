//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Upload content type is not on the allow-list
    #[display("Unsupported content type: {}", _0)]
    InvalidContentType(String),
    /// Blob not found in the bucket
    #[display("Blob not found: {}", _0)]
    NotFound(String),
    /// Blob name is empty or escapes its bucket
    #[display("Invalid blob name: {}", _0)]
    InvalidName(String),
    /// Failed to create a storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read a file or directory
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to delete a file
    #[display("Failed to delete file: {}", _0)]
    FileDelete(String),
    /// Bucket directory disappeared after initialization
    #[display("Bucket directory missing: {}", _0)]
    BucketMissing(String),
}

impl StorageErrorKind {
    /// Whether this is a filesystem fault rather than a caller error.
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            StorageErrorKind::DirectoryCreation(_)
                | StorageErrorKind::FileWrite(_)
                | StorageErrorKind::FileRead(_)
                | StorageErrorKind::FileDelete(_)
                | StorageErrorKind::BucketMissing(_)
        )
    }
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use photobook_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("cat.png".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// assert!(!err.kind.is_io_failure());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
