//! Penpost - A small personal blog
//!
//! Paginated posts, a contact form relayed by mail, and a single-admin
//! dashboard for editing posts and uploading images.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
