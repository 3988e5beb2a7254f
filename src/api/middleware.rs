//! API middleware
//!
//! Contains:
//! - Shared application state
//! - `AppError`, the error type every handler returns
//! - Admin session extractors backed by the signed session cookie
//! - The layer that turns bare 404s into the themed error page

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::{BlogConfig, Config, UploadConfig};
use crate::db::repositories::{SqlxContactRepository, SqlxPostRepository};
use crate::db::DynDatabasePool;
use crate::services::session::find_cookie;
use crate::services::{
    Authenticator, ContactService, ContactServiceError, Mailer, PostService, PostServiceError,
    SessionSigner, StaticCredentials, UploadError,
};
use crate::theme::ThemeEngine;

/// Path every unauthorized admin request is sent back to
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub post_service: Arc<PostService>,
    pub contact_service: Arc<ContactService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub signer: Arc<SessionSigner>,
    pub theme_engine: Arc<ThemeEngine>,
    pub blog: Arc<BlogConfig>,
    pub upload_config: Arc<UploadConfig>,
    pub cookie_name: Arc<str>,
}

impl AppState {
    /// Wire repositories, services and the theme from configuration
    pub fn from_config(
        config: &Config,
        pool: DynDatabasePool,
        mailer: Arc<dyn Mailer>,
    ) -> anyhow::Result<Self> {
        let post_service = PostService::new(
            SqlxPostRepository::boxed(pool.clone()),
            config.blog.posts_per_page,
        );
        let contact_service = ContactService::new(SqlxContactRepository::boxed(pool), mailer);

        Ok(Self {
            post_service: Arc::new(post_service),
            contact_service: Arc::new(contact_service),
            authenticator: Arc::new(StaticCredentials::from_config(&config.admin)),
            signer: Arc::new(SessionSigner::from_config(&config.session)?),
            theme_engine: Arc::new(ThemeEngine::new(config.theme.path.as_deref())?),
            blog: Arc::new(config.blog.clone()),
            upload_config: Arc::new(config.upload.clone()),
            cookie_name: Arc::from(config.session.cookie_name.as_str()),
        })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Handler error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rendered as the themed 404 page
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Marks a 404 response that should be replaced by the themed error page
#[derive(Debug, Clone)]
pub struct NotFoundPage(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(message) => {
                let mut response = StatusCode::NOT_FOUND.into_response();
                response.extensions_mut().insert(NotFoundPage(message));
                response
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

impl From<PostServiceError> for AppError {
    fn from(e: PostServiceError) -> Self {
        match e {
            PostServiceError::NotFound(what) => AppError::NotFound(format!("No post {}", what)),
            PostServiceError::InternalError(e) => AppError::Internal(e),
        }
    }
}

impl From<ContactServiceError> for AppError {
    fn from(e: ContactServiceError) -> Self {
        match e {
            ContactServiceError::InternalError(e) => AppError::Internal(e),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::InvalidFilename(_) => AppError::BadRequest(e.to_string()),
            UploadError::InternalError(e) => AppError::Internal(e),
        }
    }
}

/// Replace marked 404 responses with the rendered `error.html`
pub async fn render_not_found(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(NotFoundPage(message)) = response.extensions().get::<NotFoundPage>().cloned() else {
        return response;
    };

    let view = crate::api::views::ErrorView {
        status: StatusCode::NOT_FOUND.as_u16(),
        message,
    };
    match crate::api::views::render_page(&state, "error.html", &view) {
        Ok(html) => (StatusCode::NOT_FOUND, html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            response
        }
    }
}

/// Fallback for unknown paths
pub async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}

// ============================================================================
// Session extractors
// ============================================================================

/// The admin session carried by the request, authorized or not
#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    identity: Option<String>,
    authorized: bool,
}

impl AdminSession {
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    fn from_parts(parts: &Parts, state: &AppState) -> Self {
        let identity = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookies| find_cookie(cookies, &state.cookie_name))
            .and_then(|token| state.signer.verify(token));

        let authorized = identity
            .as_deref()
            .is_some_and(|id| state.authenticator.is_authorized(id));

        Self {
            identity,
            authorized,
        }
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state))
    }
}

/// Extractor that only succeeds for an authorized admin.
///
/// Anyone else is redirected to the dashboard, which shows the login form.
/// Being an extractor, it runs before any form or multipart body is read.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub String);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = AdminSession::from_parts(parts, state);
        match (session.authorized, session.identity) {
            (true, Some(identity)) => Ok(Self(identity)),
            _ => {
                tracing::debug!("Unauthorized request to {}", parts.uri.path());
                Err(Redirect::to(DASHBOARD_PATH))
            }
        }
    }
}

/// Redirect to the dashboard
pub fn to_dashboard() -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}
