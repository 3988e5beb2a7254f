//! Post repository
//!
//! Database operations for blog posts.
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL

use super::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::Post;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const POST_COLUMNS: &str = "sno, title, tagline, slug, content, date, img_file";

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and return it with its assigned id
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get post by id
    async fn get_by_id(&self, sno: i64) -> Result<Option<Post>>;

    /// Get the earliest post carrying `slug`
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// All posts in ascending id order
    async fn list(&self) -> Result<Vec<Post>>;

    /// Overwrite the editable columns of an existing post
    async fn update(&self, post: &Post) -> Result<()>;

    /// Delete a post, returning whether a row was removed
    async fn delete(&self, sno: i64) -> Result<bool>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => create_post_sqlite(pool, post).await,
            Backend::Mysql(pool) => create_post_mysql(pool, post).await,
        }
    }

    async fn get_by_id(&self, sno: i64) -> Result<Option<Post>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => get_post_by_id_sqlite(pool, sno).await,
            Backend::Mysql(pool) => get_post_by_id_mysql(pool, sno).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => get_post_by_slug_sqlite(pool, slug).await,
            Backend::Mysql(pool) => get_post_by_slug_mysql(pool, slug).await,
        }
    }

    async fn list(&self) -> Result<Vec<Post>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => list_posts_sqlite(pool).await,
            Backend::Mysql(pool) => list_posts_mysql(pool).await,
        }
    }

    async fn update(&self, post: &Post) -> Result<()> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => update_post_sqlite(pool, post).await,
            Backend::Mysql(pool) => update_post_mysql(pool, post).await,
        }
    }

    async fn delete(&self, sno: i64) -> Result<bool> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => delete_post_sqlite(pool, sno).await,
            Backend::Mysql(pool) => delete_post_mysql(pool, sno).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_post_sqlite(pool: &SqlitePool, post: &Post) -> Result<Post> {
    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, tagline, slug, content, date, img_file)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.title)
    .bind(&post.tagline)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.date)
    .bind(&post.img_file)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        sno: result.last_insert_rowid(),
        ..post.clone()
    })
}

async fn get_post_by_id_sqlite(pool: &SqlitePool, sno: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("SELECT {} FROM posts WHERE sno = ?", POST_COLUMNS))
        .bind(sno)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by id")?;
    Ok(row.as_ref().map(row_to_post_sqlite))
}

async fn get_post_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Post>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM posts WHERE slug = ? ORDER BY sno ASC LIMIT 1",
        POST_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by slug")?;
    Ok(row.as_ref().map(row_to_post_sqlite))
}

async fn list_posts_sqlite(pool: &SqlitePool) -> Result<Vec<Post>> {
    let rows = sqlx::query(&format!("SELECT {} FROM posts ORDER BY sno ASC", POST_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list posts")?;
    Ok(rows.iter().map(row_to_post_sqlite).collect())
}

async fn update_post_sqlite(pool: &SqlitePool, post: &Post) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, tagline = ?, slug = ?, content = ?, img_file = ?
        WHERE sno = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.tagline)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.img_file)
    .bind(post.sno)
    .execute(pool)
    .await
    .context("Failed to update post")?;
    Ok(())
}

async fn delete_post_sqlite(pool: &SqlitePool, sno: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE sno = ?")
        .bind(sno)
        .execute(pool)
        .await
        .context("Failed to delete post")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Post {
    Post {
        sno: row.get("sno"),
        title: row.get("title"),
        tagline: row.get("tagline"),
        slug: row.get("slug"),
        content: row.get("content"),
        date: row.get("date"),
        img_file: row.get("img_file"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_post_mysql(pool: &MySqlPool, post: &Post) -> Result<Post> {
    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, tagline, slug, content, date, img_file)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.title)
    .bind(&post.tagline)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.date)
    .bind(&post.img_file)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        sno: result.last_insert_id() as i64,
        ..post.clone()
    })
}

async fn get_post_by_id_mysql(pool: &MySqlPool, sno: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("SELECT {} FROM posts WHERE sno = ?", POST_COLUMNS))
        .bind(sno)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by id")?;
    Ok(row.as_ref().map(row_to_post_mysql))
}

async fn get_post_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Post>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM posts WHERE slug = ? ORDER BY sno ASC LIMIT 1",
        POST_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by slug")?;
    Ok(row.as_ref().map(row_to_post_mysql))
}

async fn list_posts_mysql(pool: &MySqlPool) -> Result<Vec<Post>> {
    let rows = sqlx::query(&format!("SELECT {} FROM posts ORDER BY sno ASC", POST_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list posts")?;
    Ok(rows.iter().map(row_to_post_mysql).collect())
}

async fn update_post_mysql(pool: &MySqlPool, post: &Post) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, tagline = ?, slug = ?, content = ?, img_file = ?
        WHERE sno = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.tagline)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.img_file)
    .bind(post.sno)
    .execute(pool)
    .await
    .context("Failed to update post")?;
    Ok(())
}

async fn delete_post_mysql(pool: &MySqlPool, sno: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE sno = ?")
        .bind(sno)
        .execute(pool)
        .await
        .context("Failed to delete post")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Post {
    Post {
        sno: row.get("sno"),
        title: row.get("title"),
        tagline: row.get("tagline"),
        slug: row.get("slug"),
        content: row.get("content"),
        date: row.get("date"),
        img_file: row.get("img_file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_repo() -> SqlxPostRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxPostRepository::new(pool)
    }

    fn post(title: &str, slug: &str) -> Post {
        Post {
            sno: 0,
            title: title.to_string(),
            tagline: format!("{} tagline", title),
            slug: slug.to_string(),
            content: format!("{} content", title),
            date: "2024-03-01 12:00:00".to_string(),
            img_file: "post-bg.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = setup_repo().await;

        let first = repo.create(&post("One", "one")).await.expect("Failed to create");
        let second = repo.create(&post("Two", "two")).await.expect("Failed to create");

        assert!(first.sno > 0);
        assert!(second.sno > first.sno);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_and_slug() {
        let repo = setup_repo().await;
        let created = repo.create(&post("Hello", "hello-world")).await.unwrap();

        let by_id = repo.get_by_id(created.sno).await.unwrap();
        assert_eq!(by_id, Some(created.clone()));

        let by_slug = repo.get_by_slug("hello-world").await.unwrap();
        assert_eq!(by_slug, Some(created));

        assert!(repo.get_by_slug("missing").await.unwrap().is_none());
        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_returns_earliest() {
        let repo = setup_repo().await;
        let first = repo.create(&post("First", "dup")).await.unwrap();
        repo.create(&post("Second", "dup")).await.unwrap();

        let found = repo.get_by_slug("dup").await.unwrap().unwrap();
        assert_eq!(found.sno, first.sno);
        assert_eq!(found.title, "First");
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let repo = setup_repo().await;
        for i in 0..4 {
            repo.create(&post(&format!("P{}", i), &format!("p{}", i))).await.unwrap();
        }

        let titles: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["P0", "P1", "P2", "P3"]);
    }

    #[tokio::test]
    async fn test_update_changes_only_target() {
        let repo = setup_repo().await;
        let mut target = repo.create(&post("Target", "target")).await.unwrap();
        let other = repo.create(&post("Other", "other")).await.unwrap();

        target.title = "Renamed".to_string();
        target.slug = "renamed".to_string();
        repo.update(&target).await.unwrap();

        assert_eq!(repo.get_by_id(target.sno).await.unwrap(), Some(target));
        assert_eq!(repo.get_by_id(other.sno).await.unwrap(), Some(other));
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let repo = setup_repo().await;
        let created = repo.create(&post("Gone", "gone")).await.unwrap();

        assert!(repo.delete(created.sno).await.unwrap());
        assert!(!repo.delete(created.sno).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
