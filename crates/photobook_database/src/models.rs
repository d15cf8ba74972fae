//! Row types for the `users` and `posts` tables.

use crate::schema::{posts, users};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use photobook_interface::{Post, PostId, UserId};

/// A row of `users`.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Primary key
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Stored avatar name, `None` for the default avatar
    pub avatar: Option<String>,
}

/// Insertable user.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    /// Unique login name
    pub username: &'a str,
}

/// A row of `posts`.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = posts)]
#[diesel(belongs_to(UserRow, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRow {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Stored photo name
    pub filepath: String,
    /// Caption
    pub description: String,
    /// Insertion time
    pub created_at: NaiveDateTime,
}

/// Insertable post.
#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
    /// Owning user
    pub user_id: i64,
    /// Stored photo name
    pub filepath: &'a str,
    /// Caption
    pub description: &'a str,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId(row.id),
            owner: UserId(row.user_id),
            filepath: row.filepath,
            description: row.description,
            created_at: row.created_at,
        }
    }
}
