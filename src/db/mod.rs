//! Database layer
//!
//! Storage for the blog's two tables (`posts`, `contacts`) over either
//! SQLite (local development, single-file deployment) or MySQL
//! (production). The backend follows the configured database target.
//!
//! # Usage
//!
//! ```ignore
//! use penpost::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config.database).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
