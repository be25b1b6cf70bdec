//! Credential resolver
//!
//! Resolves a raw service-account key payload (inline JSON or a file path)
//! into a bearer-token provider for the Search Console API: a signed RS256
//! assertion is exchanged at the key's token endpoint for an access token,
//! which is cached and refreshed on expiry.

use super::types::{CachedToken, ServiceAccountKey};
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// OAuth scope for Search Console read access
pub const WEBMASTERS_SCOPE: &str = "https://www.googleapis.com/auth/webmasters";

/// Assertion lifetime in seconds (the token endpoint rejects anything longer)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Resolves credentials into an authenticated token provider
pub struct CredentialResolver {
    key: ServiceAccountKey,
    scope: String,
    http_client: Client,
}

impl CredentialResolver {
    /// Create a resolver from a raw credential payload.
    ///
    /// A payload starting with `{` is treated as the key JSON itself;
    /// anything else as a path to the key file.
    pub fn new(raw_payload: &str, http_client: Client) -> Result<Self> {
        let json = if raw_payload.trim_start().starts_with('{') {
            raw_payload.to_string()
        } else {
            read_key_file(raw_payload)?
        };
        let key = ServiceAccountKey::from_json(&json)?;
        Ok(Self {
            key,
            scope: WEBMASTERS_SCOPE.to_string(),
            http_client,
        })
    }

    /// Override the OAuth scope (defaults to the webmasters scope)
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// The service account email from the parsed key
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Validate the key and produce a token provider.
    ///
    /// The signing key is checked eagerly so a malformed PEM fails the run
    /// before any query is issued; the network exchange happens lazily on
    /// the first token request.
    pub fn resolve(self) -> Result<TokenProvider> {
        let encoding_key =
            EncodingKey::from_rsa_pem(self.key.private_key.as_bytes()).map_err(|e| {
                Error::config(format!("Invalid private key in service account: {e}"))
            })?;

        debug!(client_email = %self.key.client_email, "Resolved service account credentials");

        Ok(TokenProvider {
            key: self.key,
            scope: self.scope,
            encoding_key,
            cached_token: Arc::new(RwLock::new(None)),
            http_client: self.http_client,
        })
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("client_email", &self.key.client_email)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Provides valid bearer tokens, refreshing through the token endpoint as
/// the cached one expires
pub struct TokenProvider {
    key: ServiceAccountKey,
    scope: String,
    encoding_key: EncodingKey,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    http_client: Client,
}

impl TokenProvider {
    /// Get a valid access token, exchanging a fresh assertion if necessary
    pub async fn token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Double-check after acquiring write lock (another task might have refreshed)
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.exchange_assertion().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Sign an assertion and exchange it for an access token
    async fn exchange_assertion(&self) -> Result<CachedToken> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| Error::JwtGeneration {
                message: format!("Failed to sign assertion: {e}"),
            })?;

        let form = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &assertion),
        ];

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenExchange {
                message: format!("Token exchange failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        debug!("Obtained access token");
        Ok(token_response.into_cached_token())
    }

    /// Clear the cached token (useful for testing or forced refresh)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("client_email", &self.key.client_email)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Claims for the service-account assertion
#[derive(Debug, Serialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

/// Read a key file, mapping failures to configuration errors
fn read_key_file(path: &str) -> Result<String> {
    let path = Path::new(path);
    std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read service account key file {}: {e}",
            path.display()
        ))
    })
}
