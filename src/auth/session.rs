use async_trait::async_trait;
use axum::http::{header, HeaderMap};

use super::{SessionError, SessionKeys, SiweClaim};
use crate::config::SessionConfig;

/// Reads the caller's SIWE session from request cookies.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Returns the authenticated claim, or `None` when the request carries no
    /// usable session (missing cookie, bad signature, expired, no address).
    async fn verify(&self, headers: &HeaderMap) -> Option<SiweClaim>;
}

/// Session store backed by a signed token in a single cookie.
#[derive(Debug, Clone)]
pub struct CookieSessionStore {
    cookie_name: String,
    keys: SessionKeys,
    secure: bool,
}

impl CookieSessionStore {
    pub fn new(cookie_name: impl Into<String>, keys: SessionKeys) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            keys,
            secure: false,
        }
    }

    pub fn from_config(config: &SessionConfig, secure: bool) -> Result<Self, SessionError> {
        Ok(Self::new(config.cookie_name.clone(), SessionKeys::from_config(config)?).with_secure(secure))
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Build a `Set-Cookie` header value carrying the token.
    pub fn set_cookie_header(&self, token: &str) -> String {
        let mut cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", self.cookie_name, token);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[async_trait]
impl SessionVerifier for CookieSessionStore {
    async fn verify(&self, headers: &HeaderMap) -> Option<SiweClaim> {
        let token = extract_cookie(headers, &self.cookie_name)?;

        let claims = match self.keys.decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Rejected session cookie: {}", e);
                return None;
            }
        };

        claims.address()?;
        claims.siwe
    }
}

/// Find a cookie by name across all `Cookie` headers.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            if key == name && !value.is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        })
}
