//! Schedule error types.

/// A purge schedule could not be parsed or has no future executions.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Schedule Error: {} ({}) at line {} in {}", message, expression, line, file)]
pub struct ScheduleError {
    /// The offending schedule expression
    pub expression: String,
    /// Why it was rejected
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ScheduleError {
    /// Create a new ScheduleError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use photobook_error::ScheduleError;
    ///
    /// let err = ScheduleError::new("* * *", "too few fields");
    /// assert!(format!("{}", err).contains("* * *"));
    /// ```
    #[track_caller]
    pub fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            expression: expression.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
