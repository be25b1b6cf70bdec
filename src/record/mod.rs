//! Canonical record reshaping
//!
//! Turns heterogeneous API result rows into the fixed record shape emitted
//! downstream: dimension keys zipped positionally against the configured
//! dimension list, the `date` dimension parsed to a real date, clicks and
//! impressions copied verbatim, ctr rescaled to a percentage and rounded
//! to two decimals, position rounded to two decimals.
//!
//! Reshaping is pure: the same row and dimension list always produce the
//! same record. A key-count mismatch or an unparseable date is a
//! `DataShape` error and aborts the run.

use crate::error::{Error, Result};
use crate::service::ResultRow;
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Dimension name whose values are parsed as dates
pub const DATE_DIMENSION: &str = "date";

/// A dimension value in a canonical record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionValue {
    /// The `date` dimension, parsed
    Date(NaiveDate),
    /// Any other dimension, kept as text
    Text(String),
}

impl Serialize for DimensionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Date(d) => d.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// The externally emitted unit: one reshaped analytics row.
///
/// Dimension entries keep the configured order; serialization produces a
/// flat JSON object with the dimensions first, then the metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    /// Ordered (dimension name, value) pairs
    pub dimensions: Vec<(String, DimensionValue)>,
    /// Click count, copied verbatim
    pub clicks: u64,
    /// Impression count, copied verbatim
    pub impressions: u64,
    /// Click-through rate as a percentage, rounded to 2 decimals
    pub ctr: f64,
    /// Average rank, rounded to 2 decimals
    pub position: f64,
}

impl CanonicalRecord {
    /// Look up a dimension value by name
    pub fn dimension(&self, name: &str) -> Option<&DimensionValue> {
        self.dimensions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dimensions.len() + 4))?;
        for (name, value) in &self.dimensions {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("clicks", &self.clicks)?;
        map.serialize_entry("impressions", &self.impressions)?;
        map.serialize_entry("ctr", &self.ctr)?;
        map.serialize_entry("position", &self.position)?;
        map.end()
    }
}

/// Reshape one result row against the configured dimension list.
///
/// `offset` is the page offset the row was fetched at, used only for
/// error diagnostics.
pub fn reshape(row: &ResultRow, dimensions: &[String], offset: u32) -> Result<CanonicalRecord> {
    if row.keys.len() != dimensions.len() {
        return Err(Error::data_shape(
            offset,
            format!(
                "expected {} keys for dimensions {:?}, got {}",
                dimensions.len(),
                dimensions,
                row.keys.len()
            ),
        ));
    }

    let mut values = Vec::with_capacity(dimensions.len());
    for (name, key) in dimensions.iter().zip(&row.keys) {
        let value = if name == DATE_DIMENSION {
            let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").map_err(|e| {
                Error::data_shape(offset, format!("unparseable date dimension '{key}': {e}"))
            })?;
            DimensionValue::Date(date)
        } else {
            DimensionValue::Text(key.clone())
        };
        values.push((name.clone(), value));
    }

    Ok(CanonicalRecord {
        dimensions: values,
        clicks: row.clicks as u64,
        impressions: row.impressions as u64,
        ctr: round2(row.ctr * 100.0),
        position: round2(row.position),
    })
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
