//! PostgreSQL implementation of the record store and reference oracle.

use crate::connection::PgPool;
use crate::models::{NewPost, NewUser, PostRow};
use crate::schema::{posts, users};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind as DieselErrorKind, Error as DieselError};
use photobook_error::{
    DatabaseError, DatabaseErrorKind, OracleError, PhotobookResult, RecordError, RecordErrorKind,
};
use photobook_interface::{Post, PostId, RecordStore, ReferenceOracle, UserId};
use tracing::{debug, instrument};

/// Records stored in PostgreSQL, reached through an r2d2 pool.
///
/// Every query runs on the blocking thread pool.
#[derive(Clone)]
pub struct PostgresRecords {
    pool: PgPool,
}

impl PostgresRecords {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn with_conn<T, F>(&self, f: F) -> PhotobookResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> PhotobookResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                DatabaseError::new(DatabaseErrorKind::Connection(format!(
                    "Failed to get connection from pool: {}",
                    e
                )))
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Query(format!("Task join error: {}", e)))
        })?
    }

    /// Insert a user with the default avatar.
    #[instrument(skip(self))]
    pub async fn create_user(&self, username: &str) -> PhotobookResult<UserId> {
        let username = username.to_string();
        self.with_conn(move |conn| {
            let id = diesel::insert_into(users::table)
                .values(&NewUser {
                    username: &username,
                })
                .returning(users::id)
                .get_result::<i64>(conn)
                .map_err(DatabaseError::from)?;
            Ok(UserId(id))
        })
        .await
    }

    /// Replace the avatar column of `owner`, returning the previous value.
    async fn swap_avatar(
        &self,
        owner: UserId,
        avatar: Option<String>,
    ) -> PhotobookResult<Option<String>> {
        let previous = self
            .with_conn(move |conn| {
                let previous = conn.transaction::<_, DatabaseError, _>(|conn| {
                    let previous = users::table
                        .find(owner.0)
                        .select(users::avatar)
                        .for_update()
                        .first::<Option<String>>(conn)
                        .optional()?;
                    if previous.is_some() {
                        diesel::update(users::table.find(owner.0))
                            .set(users::avatar.eq(avatar))
                            .execute(conn)?;
                    }
                    Ok(previous)
                })?;
                Ok(previous)
            })
            .await?;
        previous.ok_or_else(|| RecordError::new(RecordErrorKind::UserNotFound(owner.0)).into())
    }

    async fn lookup(&self, query: Lookup, name: &str) -> PhotobookResult<bool> {
        let name = name.to_string();
        let found = self
            .with_conn(move |conn| {
                let found = match query {
                    Lookup::Filepath => diesel::select(diesel::dsl::exists(
                        posts::table.filter(posts::filepath.eq(&name)),
                    ))
                    .get_result::<bool>(conn),
                    Lookup::Avatar => diesel::select(diesel::dsl::exists(
                        users::table.filter(users::avatar.eq(&name)),
                    ))
                    .get_result::<bool>(conn),
                }
                .map_err(DatabaseError::from)?;
                Ok(found)
            })
            .await;
        // Any database failure means the answer is unknown, never "unreferenced".
        found.map_err(|e| OracleError::new(e.to_string()).into())
    }
}

#[derive(Debug, Clone, Copy)]
enum Lookup {
    Filepath,
    Avatar,
}

#[async_trait]
impl ReferenceOracle for PostgresRecords {
    #[instrument(skip(self))]
    async fn exists_by_filepath(&self, name: &str) -> PhotobookResult<bool> {
        self.lookup(Lookup::Filepath, name).await
    }

    #[instrument(skip(self))]
    async fn exists_by_avatar(&self, name: &str) -> PhotobookResult<bool> {
        self.lookup(Lookup::Avatar, name).await
    }
}

#[async_trait]
impl RecordStore for PostgresRecords {
    #[instrument(skip(self, description), fields(owner = %owner))]
    async fn create_post(
        &self,
        owner: UserId,
        filepath: &str,
        description: &str,
    ) -> PhotobookResult<Post> {
        let filepath = filepath.to_string();
        let description = description.to_string();
        self.with_conn(move |conn| {
            let inserted = diesel::insert_into(posts::table)
                .values(&NewPost {
                    user_id: owner.0,
                    filepath: &filepath,
                    description: &description,
                })
                .returning(PostRow::as_returning())
                .get_result(conn);
            match inserted {
                Ok(row) => {
                    debug!(post = row.id, "Created post");
                    Ok(row.into())
                }
                Err(DieselError::DatabaseError(DieselErrorKind::ForeignKeyViolation, _)) => {
                    Err(RecordError::new(RecordErrorKind::UserNotFound(owner.0)).into())
                }
                Err(e) => Err(DatabaseError::from(e).into()),
            }
        })
        .await
    }

    #[instrument(skip(self), fields(owner = %owner, post = %post))]
    async fn delete_post(&self, owner: UserId, post: PostId) -> PhotobookResult<Option<Post>> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(
                posts::table
                    .filter(posts::id.eq(post.0))
                    .filter(posts::user_id.eq(owner.0)),
            )
            .returning(PostRow::as_returning())
            .get_result(conn)
            .optional()
            .map_err(DatabaseError::from)?;
            Ok(deleted.map(Post::from))
        })
        .await
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn set_avatar(&self, owner: UserId, name: &str) -> PhotobookResult<Option<String>> {
        self.swap_avatar(owner, Some(name.to_string())).await
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn reset_avatar(&self, owner: UserId) -> PhotobookResult<Option<String>> {
        self.swap_avatar(owner, None).await
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn avatar_of(&self, owner: UserId) -> PhotobookResult<Option<String>> {
        let avatar = self
            .with_conn(move |conn| {
                let avatar = users::table
                    .find(owner.0)
                    .select(users::avatar)
                    .first::<Option<String>>(conn)
                    .optional()
                    .map_err(DatabaseError::from)?;
                Ok(avatar)
            })
            .await?;
        avatar.ok_or_else(|| RecordError::new(RecordErrorKind::UserNotFound(owner.0)).into())
    }
}
