//! Credential and service resolution
//!
//! Turns a service-account key payload into an authenticated handle for the
//! Search Console API. Failure here is a configuration error, never a
//! transient fault: construction must terminate the run before any record
//! is emitted.

mod resolver;
mod types;

pub use resolver::{CredentialResolver, TokenProvider, WEBMASTERS_SCOPE};
pub use types::{CachedToken, ServiceAccountKey};

#[cfg(test)]
pub mod tests;
