//! Seams between blob storage and the relational records.

use crate::{Post, PostId, UserId};
use async_trait::async_trait;
use photobook_error::PhotobookResult;

/// Answers whether a stored file name is referenced by a live record.
///
/// Implementations must read committed state on every call and must not cache
/// answers: a stale "unreferenced" leads directly to deleting a live file.
/// When the backing store cannot be reached, return an
/// [`OracleError`](photobook_error::OracleError) rather than `false`.
#[async_trait]
pub trait ReferenceOracle: Send + Sync {
    /// Does any post record reference `name` as its photo?
    async fn exists_by_filepath(&self, name: &str) -> PhotobookResult<bool>;

    /// Does any user record reference `name` as its avatar?
    async fn exists_by_avatar(&self, name: &str) -> PhotobookResult<bool>;
}

/// Creates and removes the records that bring blobs into the reference set.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a post referencing `filepath`.
    ///
    /// # Errors
    ///
    /// Fails if `owner` does not exist or the store is unreachable.
    async fn create_post(
        &self,
        owner: UserId,
        filepath: &str,
        description: &str,
    ) -> PhotobookResult<Post>;

    /// Delete a post if `owner` authored it, returning the removed record.
    async fn delete_post(&self, owner: UserId, post: PostId) -> PhotobookResult<Option<Post>>;

    /// Point the user's avatar at `name`, returning the previous avatar name.
    async fn set_avatar(&self, owner: UserId, name: &str) -> PhotobookResult<Option<String>>;

    /// Clear the user's avatar, returning the previous avatar name.
    async fn reset_avatar(&self, owner: UserId) -> PhotobookResult<Option<String>>;

    /// Current avatar name, `None` when the user has the default avatar.
    async fn avatar_of(&self, owner: UserId) -> PhotobookResult<Option<String>>;
}
