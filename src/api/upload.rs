//! Upload endpoint
//!
//! Admin-only single file upload. Accepts multipart/form-data with the file
//! in a field named `file1`; the form itself lives on the dashboard.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Redirect,
    routing::get,
    Router,
};

use crate::api::middleware::{to_dashboard, AppError, AppState, RequireAdmin};
use crate::services::save_upload;

/// Multipart field carrying the file
pub const UPLOAD_FIELD: &str = "file1";

/// Build the upload router
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/uploader",
        get(upload_form).post(upload_file).layer(DefaultBodyLimit::disable()),
    )
}

/// GET /uploader - The upload form is part of the dashboard
async fn upload_form(_admin: RequireAdmin) -> Redirect {
    to_dashboard()
}

/// POST /uploader
async fn upload_file(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    mut multipart: Multipart,
) -> Result<&'static str, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;

        save_upload(&state.upload_config.path, &filename, &data).await?;
        return Ok("Uploaded Successfully");
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}
