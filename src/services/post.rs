//! Post service
//!
//! Business logic for blog posts: paginated listing for the front page,
//! slug lookup for the post page, and the admin create/update/delete flow.
//!
//! Slugs are not required to be unique. Lookups return the earliest post
//! with a matching slug.

use crate::db::repositories::PostRepository;
use crate::models::{timestamp_now, Post, PostInput};
use crate::services::pagination::{paginate, Paged};
use anyhow::Context;
use std::sync::Arc;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    posts_per_page: usize,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, posts_per_page: usize) -> Self {
        Self {
            repo,
            posts_per_page,
        }
    }

    /// One page of posts in publication order
    pub async fn list_page(&self, page: u32) -> Result<Paged<Post>, PostServiceError> {
        let posts = self.repo.list().await?;
        Ok(paginate(&posts, self.posts_per_page, page))
    }

    /// Every post, for the dashboard
    pub async fn list_all(&self) -> Result<Vec<Post>, PostServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Post, PostServiceError> {
        self.repo
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| PostServiceError::NotFound(slug.to_string()))
    }

    pub async fn get_by_id(&self, sno: i64) -> Result<Post, PostServiceError> {
        self.repo
            .get_by_id(sno)
            .await?
            .ok_or_else(|| PostServiceError::NotFound(sno.to_string()))
    }

    /// Store a new post, stamping it with the current time
    pub async fn create(&self, input: PostInput) -> Result<Post, PostServiceError> {
        let post = Post::new(input, timestamp_now());
        let created = self
            .repo
            .create(&post)
            .await
            .context("Failed to create post")?;
        tracing::info!("Created post {} ({})", created.sno, created.slug);
        Ok(created)
    }

    /// Overwrite the editable fields of an existing post. The date is kept.
    pub async fn update(&self, sno: i64, input: PostInput) -> Result<Post, PostServiceError> {
        let mut post = self.get_by_id(sno).await?;
        post.apply(input);
        self.repo
            .update(&post)
            .await
            .context("Failed to update post")?;
        tracing::info!("Updated post {}", sno);
        Ok(post)
    }

    /// Delete a post if it exists, reporting whether anything was removed
    pub async fn delete(&self, sno: i64) -> Result<bool, PostServiceError> {
        let removed = self.repo.delete(sno).await?;
        if removed {
            tracing::info!("Deleted post {}", sno);
        } else {
            tracing::debug!("Delete requested for missing post {}", sno);
        }
        Ok(removed)
    }
}
