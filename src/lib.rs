// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_self)]
#![allow(clippy::match_same_arms)]

//! # Google Search Console Connector
//!
//! Extracts search analytics data from the Google Search Console API
//! into flat, newline-delimited JSON records.
//!
//! ## Features
//!
//! - **Service Account Auth**: RS256-signed JWT assertions exchanged for
//!   OAuth2 access tokens, cached until expiry
//! - **Offset Pagination**: Pages through `searchAnalytics/query` results
//!   with stuck-cursor detection
//! - **Incremental Sync**: Date-based checkpointing, only fetching days
//!   newer than the last completed run
//! - **Resilient HTTP**: Retry with exponential backoff and client-side
//!   rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use gsc_connector::auth::CredentialResolver;
//! use gsc_connector::config::ConnectorConfig;
//! use gsc_connector::http::HttpClient;
//! use gsc_connector::service::ServiceHandle;
//! use gsc_connector::stream::{DateWindow, SearchAnalyticsStream};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> gsc_connector::Result<()> {
//!     let config = ConnectorConfig::from_file("config.json")?;
//!
//!     let http = HttpClient::new();
//!     let tokens = CredentialResolver::new(&config.service_account_key, http.inner().clone())?
//!         .resolve()?;
//!     let service = Arc::new(ServiceHandle::new(http, tokens, &config.site_url));
//!
//!     let window = DateWindow::for_run(None, config.start_date, chrono::Utc::now().date_naive());
//!     let stream = SearchAnalyticsStream::new(service, config.dimensions.clone(), config.row_limit, window);
//!
//!     let mut records = Box::pin(stream.records());
//!     while let Some(record) = records.next().await {
//!         println!("{}", serde_json::to_string(&record?)?);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Connector configuration
pub mod config;

/// Service account credential resolution and token caching
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Search Console API client
pub mod service;

/// Row reshaping into canonical records
pub mod record;

/// Offset pagination with loop detection
pub mod pagination;

/// The paginated extraction stream
pub mod stream;

/// State management and checkpointing
pub mod state;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
