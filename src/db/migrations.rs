//! Database migrations module
//!
//! Migrations are embedded in the binary as SQL strings, one variant per
//! backend, and recorded in a `_migrations` table so each runs once.
//!
//! # Usage
//!
//! ```ignore
//! use penpost::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config.database).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

use anyhow::{Context, Result};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for MySQL
    pub up_mysql: &'static str,
}

/// All migrations, in application order.
///
/// `posts.slug` is indexed but intentionally not UNIQUE: slug lookups
/// return the earliest post when several share a slug.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_contacts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS contacts (
                sno INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(80) NOT NULL,
                email VARCHAR(255) NOT NULL,
                phone_num VARCHAR(32) NOT NULL,
                msg TEXT NOT NULL,
                date VARCHAR(32) NOT NULL
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS contacts (
                sno BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(80) NOT NULL,
                email VARCHAR(255) NOT NULL,
                phone_num VARCHAR(32) NOT NULL,
                msg TEXT NOT NULL,
                date VARCHAR(32) NOT NULL
            );
        "#,
    },
    Migration {
        version: 2,
        name: "create_posts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS posts (
                sno INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                tagline VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                date VARCHAR(32) NOT NULL,
                img_file VARCHAR(255) NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_posts_slug ON posts(slug);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS posts (
                sno BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(255) NOT NULL,
                tagline VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                date VARCHAR(32) NOT NULL,
                img_file VARCHAR(255) NOT NULL
            );
            CREATE INDEX idx_posts_slug ON posts(slug);
        "#,
    },
];

/// Run all pending migrations, returning how many were applied
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_versions(pool).await?;

    let mut count = 0;
    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }
        tracing::info!(
            "Applying migration {}: {}",
            migration.version,
            migration.name
        );
        apply_migration(pool, migration)
            .await
            .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
        count += 1;
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

async fn get_applied_versions(pool: &DynDatabasePool) -> Result<Vec<i32>> {
    if let Some(sqlite) = pool.as_sqlite() {
        return get_applied_versions_sqlite(sqlite).await;
    }
    if let Some(mysql) = pool.as_mysql() {
        return get_applied_versions_mysql(mysql).await;
    }
    anyhow::bail!("Unsupported database pool")
}

async fn get_applied_versions_sqlite(pool: &SqlitePool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|r| r.get::<i64, _>("version") as i32).collect())
}

async fn get_applied_versions_mysql(pool: &MySqlPool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|r| r.get::<i32, _>("version")).collect())
}

async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => migration.up_sqlite,
        DatabaseDriver::Mysql => migration.up_mysql,
    };

    for statement in split_sql_statements(sql) {
        pool.execute(statement)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    let record = format!(
        "INSERT INTO _migrations (version, name) VALUES ({}, '{}')",
        migration.version, migration.name
    );
    pool.execute(&record).await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    if sql.len() > 100 {
        format!("{}...", &sql[..100])
    } else {
        sql.to_string()
    }
}

/// Split SQL into individual non-empty statements
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !is_comment_only(s))
        .collect()
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    s.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, MIGRATIONS.len());

        // Running again should apply 0 migrations
        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_contacts_table_created() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        let result = sqlx::query(
            "INSERT INTO contacts (name, email, phone_num, msg, date) VALUES (?, ?, ?, ?, ?)",
        )
        .bind("Ada")
        .bind("ada@example.com")
        .bind("5551234")
        .bind("Hello")
        .bind("2024-01-01 00:00:00")
        .execute(sqlite_pool)
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_posts_slug_not_unique() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        for title in ["first", "second"] {
            sqlx::query(
                "INSERT INTO posts (title, tagline, slug, content, date, img_file) VALUES (?, '', 'same', '', '', '')",
            )
            .bind(title)
            .execute(sqlite_pool)
            .await
            .expect("Duplicate slugs are accepted");
        }

        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE slug = 'same'")
            .fetch_one(sqlite_pool)
            .await
            .unwrap();
        assert_eq!(row.get::<i64, _>("count"), 2);
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (x INT);\n  -- comment only\n;\nCREATE INDEX i ON a(x);";
        let statements = split_sql_statements(sql);
        assert_eq!(statements, vec!["CREATE TABLE a (x INT)", "CREATE INDEX i ON a(x)"]);
    }

    #[test]
    fn test_is_comment_only() {
        assert!(is_comment_only("-- just a note\n  -- another"));
        assert!(!is_comment_only("-- note\nSELECT 1"));
    }
}
