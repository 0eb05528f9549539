//! Persistence layer.
//!
//! [`CaptureStore`] is the interface the handlers use; [`SqliteStore`] is the
//! implementation backed by a `sqlx` SQLite pool. All trait methods use
//! `impl Future` in their signatures, so no `async-trait` boxing is involved.

pub mod capture;
pub mod dao;

pub use capture::CaptureStore;
pub use dao::CaptureRecord;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` is a sqlx SQLite URL such as `"sqlite://vigil.db"`.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::migrate(pool).await
    }

    /// A private in-memory database. The pool is pinned to a single connection
    /// that never expires, since every new connection would see an empty database.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::migrate(pool).await
    }

    /// Make every later insert fail, for exercising the storage error path.
    #[cfg(test)]
    pub async fn reject_inserts(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TRIGGER reject_inserts BEFORE INSERT ON capture_records \
             BEGIN SELECT RAISE(ABORT, 'disk full'); END",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}
