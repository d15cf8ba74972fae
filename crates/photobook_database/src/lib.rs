//! PostgreSQL record store for Photobook.
//!
//! Provides the `users` and `posts` schema, embedded migrations, and
//! [`PostgresRecords`], which implements both the record store and the
//! reference oracle over an r2d2 connection pool.
//!
//! # Example
//!
//! ```rust,no_run
//! use photobook_database::{PostgresRecords, database_url, establish_pool, run_migrations};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = establish_pool(&database_url()?, 10)?;
//! let mut conn = pool.get()?;
//! run_migrations(&mut conn)?;
//! let records = PostgresRecords::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod models;
mod records;

/// Diesel table definitions.
#[allow(missing_docs)]
pub mod schema;

pub use connection::{PgPool, database_url, establish_pool, run_migrations};
pub use models::{NewPost, NewUser, PostRow, UserRow};
pub use records::PostgresRecords;

use photobook_error::DatabaseError;

/// Result type for database setup operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
