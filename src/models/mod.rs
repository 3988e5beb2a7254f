//! Data models
//!
//! Records stored by the blog and the form inputs that create them.

mod contact;
mod post;

pub use contact::{ContactMessage, NewContactMessage};
pub use post::{Post, PostInput};

/// Format used for the string timestamps stored with posts and messages
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time in [`TIMESTAMP_FORMAT`]
pub fn timestamp_now() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
