//! Record store error types.

/// Record lookups that found nothing to act on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RecordErrorKind {
    /// No user with this id
    #[display("User {} not found", _0)]
    UserNotFound(i64),
    /// No post with this id owned by the caller
    #[display("Post {} not found", _0)]
    PostNotFound(i64),
}

/// Record store error with location tracking.
///
/// # Examples
///
/// ```
/// use photobook_error::{RecordError, RecordErrorKind};
///
/// let err = RecordError::new(RecordErrorKind::PostNotFound(7));
/// assert!(format!("{}", err).contains("Post 7"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Record Error: {} at line {} in {}", kind, line, file)]
pub struct RecordError {
    /// The kind of error that occurred
    pub kind: RecordErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RecordError {
    /// Create a new record error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RecordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
