//! Storage configuration.

use crate::validator::DEFAULT_CONTENT_TYPES;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where uploads live and which content types they may have.
///
/// Built once at startup and shared by reference.
///
/// ```toml
/// [storage]
/// uploads_dir = "uploads"
/// allowed_content_types = ["image/png", "image/jpeg"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct StorageConfig {
    /// Root directory holding every bucket
    #[serde(default = "default_uploads_dir")]
    uploads_dir: PathBuf,

    /// Content types accepted on upload
    #[serde(default = "default_content_types")]
    allowed_content_types: Vec<String>,
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_content_types() -> Vec<String> {
    DEFAULT_CONTENT_TYPES.iter().map(|t| t.to_string()).collect()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            allowed_content_types: default_content_types(),
        }
    }
}

impl StorageConfig {
    /// Default configuration rooted at `uploads_dir`.
    pub fn with_root(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            ..Self::default()
        }
    }
}
