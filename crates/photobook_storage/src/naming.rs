//! Stored blob names.
//!
//! Uploaded files never keep the name the client sent. Each blob is stored as a
//! 128-bit random token plus the original extension, so names are unique and
//! carry no user-controlled path components.

use photobook_error::{PhotobookResult, StorageError, StorageErrorKind};
use uuid::Uuid;

/// Suffix marking a file that is still being written.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Name of the avatar served to users who never uploaded one.
pub const DEFAULT_AVATAR_NAME: &str = "default.jpeg";

const MAX_NAME_LEN: usize = 255;

/// A blob name that is safe to join onto a bucket directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct StoredName(String);

impl StoredName {
    /// Validate a name received from a caller.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if the name is empty, too long, `.` or `..`, or
    /// contains a path separator or NUL byte.
    pub fn parse(name: impl Into<String>) -> PhotobookResult<Self> {
        let name = name.into();
        let invalid = name.is_empty()
            || name.len() > MAX_NAME_LEN
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(StorageError::new(StorageErrorKind::InvalidName(name)).into());
        }
        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name carries the in-flight marker.
    pub fn is_temporary(&self) -> bool {
        self.0.ends_with(TEMP_SUFFIX)
    }
}

impl AsRef<str> for StoredName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<StoredName> for String {
    fn from(name: StoredName) -> Self {
        name.0
    }
}

/// Extension of a client-supplied file name, without the dot.
///
/// Only the final path component is considered, so `"../x/cat.PNG"` yields
/// `Some("PNG")`. Names without an extension, or whose extension would not be
/// a valid stored name, yield `None`.
pub fn extension_of(original: &str) -> Option<&str> {
    let file_name = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains('\0') {
        return None;
    }
    Some(ext)
}

/// Generate a fresh stored name for an upload.
pub fn generate_name(original: &str) -> StoredName {
    let token = Uuid::new_v4().simple().to_string();
    match extension_of(original) {
        Some(ext) => StoredName(format!("{}.{}", token, ext)),
        None => StoredName(token),
    }
}
