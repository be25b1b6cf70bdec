//! Authenticated service handle
//!
//! Owns the HTTP transport and token provider; read-only after
//! construction and shared by every page fetch of a run.

use super::types::{ApiResponse, QuerySpec};
use crate::auth::TokenProvider;
use crate::error::Result;
use crate::http::HttpClient;
use async_trait::async_trait;
use tracing::debug;

/// Production base URL for the webmasters v3 API
pub const WEBMASTERS_BASE_URL: &str = "https://www.googleapis.com/webmasters/v3";

/// Executes search-analytics queries against one site
#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Execute a bounded range query
    async fn query(&self, spec: &QuerySpec) -> Result<ApiResponse>;
}

/// Authenticated handle bound to a single site
pub struct ServiceHandle {
    http: HttpClient,
    tokens: TokenProvider,
    query_url: String,
    site_url: String,
}

impl ServiceHandle {
    /// Create a handle for the given site against the production API
    pub fn new(http: HttpClient, tokens: TokenProvider, site_url: impl Into<String>) -> Self {
        Self::with_base_url(http, tokens, site_url, WEBMASTERS_BASE_URL)
    }

    /// Create a handle against a custom base URL (used by tests)
    pub fn with_base_url(
        http: HttpClient,
        tokens: TokenProvider,
        site_url: impl Into<String>,
        base_url: &str,
    ) -> Self {
        let site_url = site_url.into();
        let encoded: String = url::form_urlencoded::byte_serialize(site_url.as_bytes()).collect();
        let query_url = format!(
            "{}/sites/{encoded}/searchAnalytics/query",
            base_url.trim_end_matches('/')
        );
        Self {
            http,
            tokens,
            query_url,
            site_url,
        }
    }

    /// The site this handle is bound to
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// The fully built query endpoint URL
    pub fn query_url(&self) -> &str {
        &self.query_url
    }
}

#[async_trait]
impl AnalyticsService for ServiceHandle {
    async fn query(&self, spec: &QuerySpec) -> Result<ApiResponse> {
        let token = self.tokens.token().await?;
        debug!(
            site = %self.site_url,
            start_row = spec.start_row,
            row_limit = spec.row_limit,
            "Executing search analytics query"
        );
        self.http.post_json(&self.query_url, spec, &token).await
    }
}

impl std::fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("site_url", &self.site_url)
            .field("query_url", &self.query_url)
            .finish_non_exhaustive()
    }
}
