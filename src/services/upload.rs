//! Upload sink
//!
//! Writes admin-uploaded files into the upload directory under a sanitized
//! version of the client-supplied filename. Existing files are overwritten.

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_.\-]").unwrap_or_else(|e| panic!("invalid filename regex: {}", e))
});

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "AUX", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "PRN", "NUL",
];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Reduce a client filename to a safe, flat ASCII name.
///
/// Accented and compatibility characters are folded to ASCII through NFKD
/// decomposition; whatever has no ASCII form is dropped. Returns an empty
/// string when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> String {
    let ascii: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = DISALLOWED_CHARS.replace_all(&joined, "");
    let name = cleaned.trim_matches(|c| c == '.' || c == '_');

    let stem = name.split('.').next().unwrap_or_default().to_ascii_uppercase();
    if !name.is_empty() && WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
        format!("_{}", name)
    } else {
        name.to_string()
    }
}

/// Save `data` into `dir` under the sanitized `raw_name`, returning the path written
pub async fn save_upload(dir: &Path, raw_name: &str, data: &[u8]) -> Result<PathBuf, UploadError> {
    let filename = sanitize_filename(raw_name);
    if filename.is_empty() {
        return Err(UploadError::InvalidFilename(raw_name.to_string()));
    }

    if !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create upload dir: {:?}", dir))?;
    }

    let path = dir.join(&filename);
    fs::write(&path, data)
        .await
        .with_context(|| format!("Failed to save file: {:?}", path))?;

    tracing::info!("Saved upload {} ({} bytes)", filename, data.len());
    Ok(path)
}
