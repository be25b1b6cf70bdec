//! Search analytics service
//!
//! The wire contract for the searchanalytics query endpoint and the
//! authenticated handle that executes queries. The `AnalyticsService`
//! trait is the seam between the extraction loop and the network; tests
//! script against it without a server.

mod handle;
mod types;

pub use handle::{AnalyticsService, ServiceHandle, WEBMASTERS_BASE_URL};
pub use types::{ApiResponse, QuerySpec, ResultRow};

#[cfg(test)]
mod tests;
