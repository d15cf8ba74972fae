//! In-memory record store.

use crate::{Post, PostId, RecordStore, ReferenceOracle, UserId};
use async_trait::async_trait;
use parking_lot::RwLock;
use photobook_error::{OracleError, PhotobookResult, RecordError, RecordErrorKind};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, UserRow>,
    posts: BTreeMap<PostId, Post>,
    next_user: i64,
    next_post: i64,
}

#[derive(Debug, Clone)]
struct UserRow {
    username: String,
    avatar: Option<String>,
}

/// Users and posts held in process memory.
///
/// Implements both [`RecordStore`] and [`ReferenceOracle`]. Oracle queries can
/// be made to fail with [`set_available`](Self::set_available) to exercise
/// outage handling.
#[derive(Debug)]
pub struct InMemoryRecords {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl Default for InMemoryRecords {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecords {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Register a user and return its id.
    pub fn add_user(&self, username: impl Into<String>) -> UserId {
        let mut tables = self.tables.write();
        tables.next_user += 1;
        let id = UserId(tables.next_user);
        tables.users.insert(
            id,
            UserRow {
                username: username.into(),
                avatar: None,
            },
        );
        id
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.tables.read().posts.len()
    }

    /// Toggle whether oracle lookups succeed.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> PhotobookResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(OracleError::new("in-memory record store marked unavailable").into())
        }
    }
}

#[async_trait]
impl ReferenceOracle for InMemoryRecords {
    async fn exists_by_filepath(&self, name: &str) -> PhotobookResult<bool> {
        self.check_available()?;
        Ok(self.tables.read().posts.values().any(|p| p.filepath == name))
    }

    async fn exists_by_avatar(&self, name: &str) -> PhotobookResult<bool> {
        self.check_available()?;
        Ok(self
            .tables
            .read()
            .users
            .values()
            .any(|u| u.avatar.as_deref() == Some(name)))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecords {
    async fn create_post(
        &self,
        owner: UserId,
        filepath: &str,
        description: &str,
    ) -> PhotobookResult<Post> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&owner) {
            return Err(RecordError::new(RecordErrorKind::UserNotFound(owner.0)).into());
        }
        tables.next_post += 1;
        let post = Post {
            id: PostId(tables.next_post),
            owner,
            filepath: filepath.to_string(),
            description: description.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        tables.posts.insert(post.id, post.clone());
        tracing::debug!(post = %post.id, filepath, "Created post");
        Ok(post)
    }

    async fn delete_post(&self, owner: UserId, post: PostId) -> PhotobookResult<Option<Post>> {
        let mut tables = self.tables.write();
        match tables.posts.get(&post) {
            Some(p) if p.owner == owner => Ok(tables.posts.remove(&post)),
            _ => Ok(None),
        }
    }

    async fn set_avatar(&self, owner: UserId, name: &str) -> PhotobookResult<Option<String>> {
        let mut tables = self.tables.write();
        let user = tables
            .users
            .get_mut(&owner)
            .ok_or_else(|| RecordError::new(RecordErrorKind::UserNotFound(owner.0)))?;
        Ok(user.avatar.replace(name.to_string()))
    }

    async fn reset_avatar(&self, owner: UserId) -> PhotobookResult<Option<String>> {
        let mut tables = self.tables.write();
        let user = tables
            .users
            .get_mut(&owner)
            .ok_or_else(|| RecordError::new(RecordErrorKind::UserNotFound(owner.0)))?;
        Ok(user.avatar.take())
    }

    async fn avatar_of(&self, owner: UserId) -> PhotobookResult<Option<String>> {
        let tables = self.tables.read();
        let user = tables
            .users
            .get(&owner)
            .ok_or_else(|| RecordError::new(RecordErrorKind::UserNotFound(owner.0)))?;
        Ok(user.avatar.clone())
    }
}
