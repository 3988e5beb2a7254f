//! Signed session tokens
//!
//! The admin session is stateless: the cookie carries the identity and an
//! HMAC-SHA256 tag over it, so the server keeps nothing between requests.
//!
//! Token layout: `<base64url(identity)>.<hex(hmac(encoded identity))>`

use anyhow::{anyhow, Result};
use data_encoding::{BASE64URL_NOPAD, HEXLOWER};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::SessionConfig;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies session tokens with a server secret
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}

impl SessionSigner {
    pub fn new(secret: &[u8]) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| anyhow!("Invalid session secret: {}", e))?;
        Ok(Self { mac })
    }

    /// Build a signer from configuration.
    ///
    /// Without a configured secret a random one is generated, which logs
    /// everyone out whenever the process restarts.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        match config.secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Self::new(secret.as_bytes()),
            None => {
                tracing::warn!("session.secret not set; sessions will not survive a restart");
                let secret = format!(
                    "{}{}",
                    uuid::Uuid::new_v4().simple(),
                    uuid::Uuid::new_v4().simple()
                );
                Self::new(secret.as_bytes())
            }
        }
    }

    pub fn sign(&self, identity: &str) -> String {
        let encoded = BASE64URL_NOPAD.encode(identity.as_bytes());
        let tag = self.tag(&encoded);
        format!("{}.{}", encoded, HEXLOWER.encode(&tag))
    }

    /// Return the identity carried by `token` if its signature is valid
    pub fn verify(&self, token: &str) -> Option<String> {
        let (encoded, signature) = token.split_once('.')?;
        let signature = HEXLOWER.decode(signature.as_bytes()).ok()?;

        let mut mac = self.mac.clone();
        mac.update(encoded.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let identity = BASE64URL_NOPAD.decode(encoded.as_bytes()).ok()?;
        String::from_utf8(identity).ok()
    }

    fn tag(&self, encoded: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(encoded.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// `Set-Cookie` value carrying a session token for the browser session
pub fn session_cookie(name: &str, token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, token)
}

/// `Set-Cookie` value that removes the session cookie
pub fn expired_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

/// Find a cookie by name in a `Cookie` request header value
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new(b"test-secret").unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = signer();
        let token = signer.sign("admin");
        assert_eq!(signer.verify(&token), Some("admin".to_string()));
    }

    #[test]
    fn test_token_shape() {
        let token = signer().sign("admin");
        let (identity, signature) = token.split_once('.').unwrap();
        assert_eq!(identity, "YWRtaW4");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let signer = signer();
        assert_eq!(signer.verify(""), None);
        assert_eq!(signer.verify("no-dot"), None);
        assert_eq!(signer.verify("YWRtaW4."), None);
        assert_eq!(signer.verify("YWRtaW4.zz"), None);
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = signer().sign("admin");
        let other = SessionSigner::new(b"another-secret").unwrap();
        assert_eq!(other.verify(&token), None);
    }

    #[test]
    fn test_random_secret_from_config() {
        let config = SessionConfig {
            secret: None,
            cookie_name: "s".to_string(),
        };
        let first = SessionSigner::from_config(&config).unwrap();
        let second = SessionSigner::from_config(&config).unwrap();
        let token = first.sign("admin");
        assert_eq!(first.verify(&token), Some("admin".to_string()));
        assert_eq!(second.verify(&token), None);
    }

    #[test]
    fn test_configured_secret_is_stable() {
        let config = SessionConfig {
            secret: Some("fixed".to_string()),
            cookie_name: "s".to_string(),
        };
        let token = SessionSigner::from_config(&config).unwrap().sign("admin");
        let again = SessionSigner::from_config(&config).unwrap();
        assert_eq!(again.verify(&token), Some("admin".to_string()));
    }

    #[test]
    fn test_find_cookie() {
        let header = "theme=dark; penpost_session=abc.def; other=1";
        assert_eq!(find_cookie(header, "penpost_session"), Some("abc.def"));
        assert_eq!(find_cookie(header, "missing"), None);
        assert_eq!(find_cookie("", "penpost_session"), None);
    }

    #[test]
    fn test_cookie_strings() {
        assert!(session_cookie("s", "tok").starts_with("s=tok;"));
        assert!(expired_cookie("s").contains("Max-Age=0"));
    }
}
