//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the storage operations for one table.

pub mod contact;
pub mod post;

pub use contact::{ContactRepository, SqlxContactRepository};
pub use post::{PostRepository, SqlxPostRepository};

use crate::db::DynDatabasePool;
use sqlx::{MySqlPool, SqlitePool};

/// Borrowed view of the concrete pool behind a [`DynDatabasePool`]
pub(crate) enum Backend<'a> {
    Sqlite(&'a SqlitePool),
    Mysql(&'a MySqlPool),
}

pub(crate) fn backend(pool: &DynDatabasePool) -> anyhow::Result<Backend<'_>> {
    if let Some(p) = pool.as_sqlite() {
        Ok(Backend::Sqlite(p))
    } else if let Some(p) = pool.as_mysql() {
        Ok(Backend::Mysql(p))
    } else {
        anyhow::bail!("Database pool exposes no supported backend")
    }
}
