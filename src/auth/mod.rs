pub mod session;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SessionConfig;

pub use session::{CookieSessionStore, SessionVerifier};

/// Minimum accepted length of the session signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Authentication claim written by the SIWE sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiweClaim {
    pub address: String,
    #[serde(default)]
    pub chain_id: u64,
}

/// Payload of the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siwe: Option<SiweClaim>,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(siwe: SiweClaim, ttl_hours: u64) -> Result<Self, SessionError> {
        let now = Utc::now();
        let exp = i64::try_from(ttl_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                SessionError::TokenGeneration(format!("Session lifetime of {} hours is out of range", ttl_hours))
            })?;

        Ok(Self {
            siwe: Some(siwe),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }

    /// The verified address, if the session carries a non-empty SIWE claim.
    pub fn address(&self) -> Option<&str> {
        self.siwe
            .as_ref()
            .map(|siwe| siwe.address.as_str())
            .filter(|address| !address.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("Session token generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: u64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl_hours", &self.ttl_hours)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn from_secret(secret: &str, ttl_hours: u64) -> Result<Self, SessionError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(SessionError::WeakSecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours,
        })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        Self::from_secret(&config.secret, config.ttl_hours)
    }

    /// Mint a session token for an address. Used by the CLI and tests; the
    /// production sign-in flow lives elsewhere.
    pub fn issue(&self, address: &str, chain_id: u64) -> Result<String, SessionError> {
        let claims = SessionClaims::new(
            SiweClaim {
                address: address.to_string(),
                chain_id,
            },
            self.ttl_hours,
        )?;
        self.encode(&claims)
    }

    pub fn encode(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| SessionError::TokenGeneration(e.to_string()))
    }

    /// Validate signature and expiry, returning the claims.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let validation = Validation::default();

        let token_data = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }
}
