//! Record types shared between the media service and the record stores.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Primary key of a user record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("user:{}", _0)]
pub struct UserId(pub i64);

/// Primary key of a post record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("post:{}", _0)]
pub struct PostId(pub i64);

/// A published photo.
///
/// `filepath` is the stored blob name inside the photo bucket, which is what
/// the reference oracle matches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Record id
    pub id: PostId,
    /// Author
    pub owner: UserId,
    /// Stored blob name in the photo bucket
    pub filepath: String,
    /// Caption supplied with the upload
    pub description: String,
    /// Creation time (UTC)
    pub created_at: NaiveDateTime,
}
