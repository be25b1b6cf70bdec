//! HTTP transport
//!
//! A thin client over reqwest that owns the concerns the extraction loop
//! delegates to the transport: timeouts, bounded retries with exponential
//! backoff for transient failures, and rate limiting against the API's
//! per-site quotas.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
