//! View models
//!
//! Plain serializable structs handed to templates. Handlers build these from
//! service results so templates never see repositories or services.

use anyhow::Context;
use axum::response::Html;
use chrono::Datelike;
use serde::Serialize;
use tera::Context as TeraContext;

use crate::api::middleware::{AppError, AppState};
use crate::models::{ContactMessage, Post};
use crate::services::Paged;

/// A post as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub sno: i64,
    pub title: String,
    pub tagline: String,
    pub slug: String,
    pub date: String,
    pub img_file: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            sno: post.sno,
            title: post.title.clone(),
            tagline: post.tagline.clone(),
            slug: post.slug.clone(),
            date: post.date.clone(),
            img_file: post.img_file.clone(),
        }
    }
}

/// Front page listing
#[derive(Debug, Serialize)]
pub struct IndexView {
    pub posts: Vec<PostSummary>,
    pub page: u32,
    pub last_page: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl From<Paged<Post>> for IndexView {
    fn from(paged: Paged<Post>) -> Self {
        Self {
            posts: paged.items.iter().map(PostSummary::from).collect(),
            page: paged.page,
            last_page: paged.last_page,
            prev: paged.prev,
            next: paged.next,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub username: String,
    pub posts: Vec<PostSummary>,
    pub messages: Vec<ContactMessage>,
}

/// Editable fields of a post, empty for a new one
#[derive(Debug, Default, Serialize)]
pub struct PostForm {
    pub title: String,
    pub tagline: String,
    pub slug: String,
    pub img_file: String,
    pub content: String,
}

impl From<Post> for PostForm {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            tagline: post.tagline,
            slug: post.slug,
            img_file: post.img_file,
            content: post.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EditView {
    /// 0 for a post that has not been created yet
    pub sno: i64,
    pub post: PostForm,
}

#[derive(Debug, Default, Serialize)]
pub struct ContactView {
    pub sent: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub status: u16,
    pub message: String,
}

/// Pages with nothing but the site-wide variables
#[derive(Debug, Default, Serialize)]
pub struct PlainView {}

/// Render `template` with `view` plus the site-wide `blog` and `year` variables
pub fn render_page<V: Serialize>(
    state: &AppState,
    template: &str,
    view: &V,
) -> Result<Html<String>, AppError> {
    let mut context =
        TeraContext::from_serialize(view).context("Failed to build template context")?;
    context.insert("blog", state.blog.as_ref());
    context.insert("year", &chrono::Utc::now().year());

    Ok(Html(state.theme_engine.render(template, &context)?))
}
