//! Admin dashboard: login, logout and post editing
//!
//! Every route except the dashboard itself requires an authorized session.
//! Unauthorized requests are redirected to the dashboard, which then shows
//! the login form.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use crate::api::middleware::{to_dashboard, AdminSession, AppError, AppState, RequireAdmin};
use crate::api::views::{render_page, DashboardView, EditView, PlainView, PostForm, PostSummary};
use crate::models::PostInput;
use crate::services::session::{expired_cookie, session_cookie};

/// Build the admin router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard).post(login))
        .route("/logout", get(logout))
        .route("/edit/{id}", get(edit_form).post(save_post))
        .route("/delete/{id}", get(delete_post).post(delete_post))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub uname: String,
    #[serde(default)]
    pub pass: String,
}

/// What the `{id}` segment of `/edit/{id}` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTarget {
    New,
    Existing(i64),
}

impl EditTarget {
    fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.parse::<i64>() {
            Ok(0) => Ok(Self::New),
            Ok(id) => Ok(Self::Existing(id)),
            Err(_) => Err(AppError::NotFound(format!("No post {}", raw))),
        }
    }
}

/// GET /dashboard - Post list for the admin, login form for anyone else
async fn dashboard(
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Response, AppError> {
    if !session.is_authorized() {
        return Ok(render_page(&state, "login.html", &PlainView::default())?.into_response());
    }

    let posts = state.post_service.list_all().await?;
    let messages = state.contact_service.list().await?;
    let view = DashboardView {
        username: session.identity().unwrap_or_default().to_string(),
        posts: posts.iter().map(PostSummary::from).collect(),
        messages,
    };
    Ok(render_page(&state, "dashboard.html", &view)?.into_response())
}

/// POST /dashboard - Login attempt
///
/// An already authorized session goes straight back to the dashboard.
async fn login(
    State(state): State<AppState>,
    session: AdminSession,
    Form(form): Form<LoginForm>,
) -> Response {
    if session.is_authorized() {
        return to_dashboard().into_response();
    }

    match state.authenticator.authenticate(&form.uname, &form.pass) {
        Some(identity) => {
            tracing::info!("Admin {} logged in", identity);
            let token = state.signer.sign(&identity);
            (
                [(header::SET_COOKIE, session_cookie(&state.cookie_name, &token))],
                to_dashboard(),
            )
                .into_response()
        }
        None => {
            tracing::info!("Failed login attempt for {:?}", form.uname);
            "Wrong username or password".into_response()
        }
    }
}

/// GET /logout - Drop the session cookie
async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, expired_cookie(&state.cookie_name))],
        to_dashboard(),
    )
}

/// GET /edit/{id} - Empty form for id 0, filled form otherwise
async fn edit_form(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let view = match EditTarget::parse(&id)? {
        EditTarget::New => EditView {
            sno: 0,
            post: PostForm::default(),
        },
        EditTarget::Existing(sno) => EditView {
            sno,
            post: state.post_service.get_by_id(sno).await?.into(),
        },
    };
    Ok(render_page(&state, "edit.html", &view)?.into_response())
}

/// POST /edit/{id} - Create (id 0) or update a post
async fn save_post(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Form(input): Form<PostInput>,
) -> Result<Redirect, AppError> {
    let sno = match EditTarget::parse(&id)? {
        EditTarget::New => state.post_service.create(input).await?.sno,
        EditTarget::Existing(sno) => state.post_service.update(sno, input).await?.sno,
    };
    Ok(Redirect::to(&format!("/edit/{}", sno)))
}

/// GET|POST /delete/{id} - Delete if present, always back to the dashboard
async fn delete_post(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    match id.parse::<i64>() {
        Ok(sno) => {
            state.post_service.delete(sno).await?;
        }
        Err(_) => tracing::debug!("Ignoring delete for non-numeric id {:?}", id),
    }
    Ok(to_dashboard())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_target_parse() {
        assert_eq!(EditTarget::parse("0").unwrap(), EditTarget::New);
        assert_eq!(EditTarget::parse("12").unwrap(), EditTarget::Existing(12));
        assert!(matches!(EditTarget::parse("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(EditTarget::parse(""), Err(AppError::NotFound(_))));
    }
}
