//! Public pages: post listing, single post, about and contact

use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use crate::api::middleware::{AppError, AppState};
use crate::api::views::{render_page, ContactView, IndexView, PlainView, PostView};
use crate::models::NewContactMessage;
use crate::services::parse_page;

/// Build the public router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/contact", get(contact_form).post(submit_contact))
        .route("/post/{slug}", get(show_post))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// GET / - Paginated post listing
async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let page = parse_page(query.page.as_deref());
    let paged = state.post_service.list_page(page).await?;
    render_page(&state, "index.html", &IndexView::from(paged))
}

/// GET /about
async fn about(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_page(&state, "about.html", &PlainView::default())
}

/// GET /post/{slug}
async fn show_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let post = state.post_service.get_by_slug(&slug).await?;
    render_page(&state, "post.html", &PostView { post })
}

/// GET /contact
async fn contact_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_page(&state, "contact.html", &ContactView::default())
}

/// POST /contact - Store the message and mail it to the site owner
async fn submit_contact(
    State(state): State<AppState>,
    Form(input): Form<NewContactMessage>,
) -> Result<Html<String>, AppError> {
    state.contact_service.submit(input).await?;
    render_page(&state, "contact.html", &ContactView { sent: true })
}
