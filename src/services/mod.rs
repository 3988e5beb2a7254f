//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories:
//! - Pagination of the post listing
//! - Admin authentication and signed sessions
//! - Post CRUD and contact submissions
//! - Mail delivery and the upload sink

pub mod auth;
pub mod contact;
pub mod email;
pub mod pagination;
pub mod post;
pub mod session;
pub mod upload;

pub use auth::{Authenticator, StaticCredentials};
pub use contact::{ContactService, ContactServiceError};
pub use email::{DisabledMailer, Mailer, OutgoingMail, SmtpMailer};
pub use pagination::{paginate, parse_page, PageWindow, Paged};
pub use post::{PostService, PostServiceError};
pub use session::SessionSigner;
pub use upload::{sanitize_filename, save_upload, UploadError};
