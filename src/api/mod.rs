//! API layer - HTTP handlers and routing
//!
//! - Public pages (listing, post, about, contact)
//! - Admin dashboard, login and post editing
//! - File uploads, served back under `/uploads`

pub mod admin;
pub mod middleware;
pub mod site;
pub mod upload;
pub mod views;


use axum::{middleware as axum_middleware, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use middleware::{AdminSession, AppError, AppState, RequireAdmin};

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.upload_config.path);

    Router::new()
        .merge(site::router())
        .merge(admin::router())
        .merge(upload::router())
        .nest_service("/uploads", uploads)
        .fallback(middleware::not_found)
        // Themed 404 page for handler-level and fallback misses
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::render_not_found,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
