//! Credential types
//!
//! The parsed service-account key and the cached access token.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Parsed service-account key payload
///
/// Only the fields the resolver needs are kept; the raw key file carries
/// more (project id, key id, cert URLs) which is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email, used as the JWT issuer
    pub client_email: String,
    /// PEM-encoded RSA private key for signing the assertion
    pub private_key: String,
    /// Token endpoint the signed assertion is exchanged at
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a key from its raw JSON payload
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse service account key: {e}")))?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<()> {
        if self.client_email.is_empty() {
            return Err(Error::missing_field("service_account_key.client_email"));
        }
        if self.private_key.is_empty() {
            return Err(Error::missing_field("service_account_key.private_key"));
        }
        if self.token_uri.is_empty() {
            return Err(Error::missing_field("service_account_key.token_uri"));
        }
        Ok(())
    }
}

/// Cached access token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}
