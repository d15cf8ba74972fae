//! Reference oracle error types.

/// The reference store could not answer an existence query.
///
/// Callers must treat this as "unknown", never as "unreferenced".
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Reference Oracle Unavailable: {} at line {} in {}", message, line, file)]
pub struct OracleError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl OracleError {
    /// Create a new OracleError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use photobook_error::OracleError;
    ///
    /// let err = OracleError::new("connection pool exhausted");
    /// assert!(err.message.contains("pool"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
