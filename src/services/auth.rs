//! Administrator authentication
//!
//! The blog has exactly one administrator whose credentials live in the
//! configuration file. `Authenticator` keeps the handlers independent of
//! where those credentials come from.

use crate::config::AdminConfig;

/// Strategy for checking login credentials and session identities
pub trait Authenticator: Send + Sync {
    /// Check a login attempt, returning the identity to store in the session
    fn authenticate(&self, username: &str, password: &str) -> Option<String>;

    /// Whether a session identity grants admin access
    fn is_authorized(&self, identity: &str) -> bool;
}

/// Exact comparison against one configured username and password
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

impl Authenticator for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<String> {
        (username == self.username && password == self.password).then(|| self.username.clone())
    }

    fn is_authorized(&self, identity: &str) -> bool {
        !identity.is_empty() && identity == self.username
    }
}
