use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::error::Result;

pub type DbPool = Pool<Sqlite>;

/// Open the SQLite store at `path`, creating the file if it does not exist.
///
/// The pool is capped at a single connection: each pipeline phase owns the
/// store exclusively for its duration and closes it on exit.
pub async fn connect(path: &Path) -> Result<DbPool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// An isolated in-memory store with the same pool shape, for tests.
///
/// The single connection must never be recycled: an in-memory SQLite
/// database lives and dies with its connection.
pub async fn connect_in_memory() -> Result<DbPool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    Ok(pool)
}
