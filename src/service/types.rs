//! Wire types for the searchanalytics query endpoint

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single bounded range query, serialized as the request body.
///
/// Immutable per request; the extraction loop builds a fresh spec each
/// page with an advanced `start_row`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    /// Inclusive range start
    pub start_date: NaiveDate,
    /// Inclusive range end
    pub end_date: NaiveDate,
    /// Ordered dimension list; result keys align positionally with it
    pub dimensions: Vec<String>,
    /// Rows requested for this page
    pub row_limit: u32,
    /// Row offset of this page
    pub start_row: u32,
}

/// One row of the query response.
///
/// `keys` carries one value per requested dimension, in request order.
/// The metric fields arrive as JSON numbers; the API reports counts as
/// integers but is not contractually bound to, so they are kept as f64
/// until reshaping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultRow {
    #[serde(default)]
    pub keys: Vec<String>,
    pub clicks: f64,
    pub impressions: f64,
    pub ctr: f64,
    pub position: f64,
}

/// Query response body. The API omits `rows` entirely for ranges with no
/// traffic, so it defaults to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub rows: Vec<ResultRow>,
}
