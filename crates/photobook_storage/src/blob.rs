//! Upload payloads, read handles, and directory entries.

use crate::Bucket;
use crate::naming::StoredName;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::SystemTime;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

/// File content received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Declared content type (checked against the allow-list)
    pub content_type: String,
    /// File name the client sent, used only for its extension
    pub original_name: String,
    /// File bytes
    pub content: Vec<u8>,
}

impl Upload {
    /// Create an upload.
    pub fn new(
        content_type: impl Into<String>,
        original_name: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            original_name: original_name.into(),
            content: content.into(),
        }
    }
}

/// Lazily read handle to a stored blob.
///
/// Implements [`AsyncRead`]; nothing is read until the caller polls it.
#[derive(Debug)]
pub struct BlobHandle {
    name: StoredName,
    size: u64,
    content_type: &'static str,
    file: tokio::fs::File,
}

impl BlobHandle {
    pub(crate) fn new(
        name: StoredName,
        size: u64,
        content_type: &'static str,
        file: tokio::fs::File,
    ) -> Self {
        Self {
            name,
            size,
            content_type,
            file,
        }
    }

    /// Stored name of the blob.
    pub fn name(&self) -> &StoredName {
        &self.name
    }

    /// Size in bytes when the handle was opened.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Content type inferred from the extension.
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Underlying file, for streaming responses.
    pub fn into_file(self) -> tokio::fs::File {
        self.file
    }

    /// Read the whole blob into memory.
    pub async fn read_to_vec(mut self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.size as usize);
        self.file.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}

impl AsyncRead for BlobHandle {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.file).poll_read(cx, buf)
    }
}

/// A file found in a bucket or staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    /// Bucket the entry belongs to
    pub bucket: Bucket,
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

/// An upload written to the staging area but not yet visible in its bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedBlob {
    bucket: Bucket,
    name: StoredName,
}

impl StagedBlob {
    /// Refer to a staged blob by bucket and name.
    pub fn new(bucket: Bucket, name: StoredName) -> Self {
        Self { bucket, name }
    }

    /// Target bucket.
    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    /// Name the blob will have once finalized.
    pub fn name(&self) -> &StoredName {
        &self.name
    }
}
