//! Connector configuration
//!
//! The connector is configured with a JSON object:
//!
//! ```json
//! {
//!     "site_url": "https://example.com/",
//!     "service_account_key": "{...}",
//!     "start_date": "2024-01-01",
//!     "dimensions": ["date", "page", "query"],
//!     "row_limit": 25000
//! }
//! ```
//!
//! `service_account_key` is either the raw service-account JSON (a value
//! starting with `{`) or a filesystem path to it. `dimensions` is required
//! and order-significant: result row keys are matched positionally against
//! it. There is no default dimension set.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Page size ceiling enforced by the Search Console API.
pub const MAX_ROW_LIMIT: u32 = 25_000;

/// Connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Target property identifier, e.g. `https://example.com/` or
    /// `sc-domain:example.com`
    pub site_url: String,

    /// Raw service-account key JSON, or a path to the key file
    pub service_account_key: String,

    /// Earliest date to request when no prior checkpoint exists
    pub start_date: NaiveDate,

    /// Ordered dimension list; determines the record's attribute keys and
    /// the API's column layout
    pub dimensions: Vec<String>,

    /// Rows per page (the API maximum is 25000)
    #[serde(default = "default_row_limit")]
    pub row_limit: u32,
}

fn default_row_limit() -> u32 {
    MAX_ROW_LIMIT
}

impl ConnectorConfig {
    /// Parse config from a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Validate field constraints
    pub fn validate(&self) -> Result<()> {
        if self.site_url.trim().is_empty() {
            return Err(Error::missing_field("site_url"));
        }
        if self.service_account_key.trim().is_empty() {
            return Err(Error::missing_field("service_account_key"));
        }
        if self.dimensions.is_empty() {
            return Err(Error::invalid_value(
                "dimensions",
                "at least one dimension is required",
            ));
        }
        for (i, dim) in self.dimensions.iter().enumerate() {
            if dim.trim().is_empty() {
                return Err(Error::invalid_value(
                    "dimensions",
                    format!("dimension at position {i} is empty"),
                ));
            }
            if self.dimensions[..i].contains(dim) {
                return Err(Error::invalid_value(
                    "dimensions",
                    format!("duplicate dimension '{dim}'"),
                ));
            }
        }
        if self.row_limit == 0 {
            return Err(Error::invalid_value("row_limit", "must be positive"));
        }
        if self.row_limit > MAX_ROW_LIMIT {
            return Err(Error::invalid_value(
                "row_limit",
                format!("exceeds API maximum of {MAX_ROW_LIMIT}"),
            ));
        }
        Ok(())
    }
}

/// JSON schema for the connector configuration, printed by the `spec` command
pub fn config_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "required": ["site_url", "service_account_key", "start_date", "dimensions"],
        "properties": {
            "site_url": {
                "type": "string",
                "description": "Search Console property, e.g. https://example.com/ or sc-domain:example.com"
            },
            "service_account_key": {
                "type": "string",
                "description": "Service-account key JSON, or a path to the key file"
            },
            "start_date": {
                "type": "string",
                "format": "date",
                "description": "Earliest date to request when no checkpoint exists (YYYY-MM-DD)"
            },
            "dimensions": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "uniqueItems": true,
                "description": "Ordered dimension list, e.g. [\"date\", \"page\", \"query\"]"
            },
            "row_limit": {
                "type": "integer",
                "minimum": 1,
                "maximum": MAX_ROW_LIMIT,
                "default": MAX_ROW_LIMIT,
                "description": "Rows requested per page"
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config_json() -> String {
        serde_json::json!({
            "site_url": "https://example.com/",
            "service_account_key": "{\"type\": \"service_account\"}",
            "start_date": "2024-01-01",
            "dimensions": ["date", "page", "query"]
        })
        .to_string()
    }

    #[test]
    fn test_config_parses_with_default_row_limit() {
        let config = ConnectorConfig::from_json(&valid_config_json()).unwrap();
        assert_eq!(config.site_url, "https://example.com/");
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(config.dimensions, vec!["date", "page", "query"]);
        assert_eq!(config.row_limit, MAX_ROW_LIMIT);
    }

    #[test]
    fn test_config_rejects_missing_site_url() {
        let json = serde_json::json!({
            "site_url": "",
            "service_account_key": "key.json",
            "start_date": "2024-01-01",
            "dimensions": ["date"]
        })
        .to_string();
        let err = ConnectorConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "site_url"));
    }

    #[test]
    fn test_config_rejects_empty_dimensions() {
        let json = serde_json::json!({
            "site_url": "https://example.com/",
            "service_account_key": "key.json",
            "start_date": "2024-01-01",
            "dimensions": []
        })
        .to_string();
        let err = ConnectorConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "dimensions"));
    }

    #[test]
    fn test_config_rejects_duplicate_dimensions() {
        let json = serde_json::json!({
            "site_url": "https://example.com/",
            "service_account_key": "key.json",
            "start_date": "2024-01-01",
            "dimensions": ["date", "page", "date"]
        })
        .to_string();
        let err = ConnectorConfig::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate dimension 'date'"));
    }

    #[test]
    fn test_config_rejects_zero_row_limit() {
        let json = serde_json::json!({
            "site_url": "https://example.com/",
            "service_account_key": "key.json",
            "start_date": "2024-01-01",
            "dimensions": ["date"],
            "row_limit": 0
        })
        .to_string();
        let err = ConnectorConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "row_limit"));
    }

    #[test]
    fn test_config_rejects_oversized_row_limit() {
        let json = serde_json::json!({
            "site_url": "https://example.com/",
            "service_account_key": "key.json",
            "start_date": "2024-01-01",
            "dimensions": ["date"],
            "row_limit": 25_001
        })
        .to_string();
        let err = ConnectorConfig::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("exceeds API maximum"));
    }

    #[test]
    fn test_config_rejects_bad_date() {
        let json = serde_json::json!({
            "site_url": "https://example.com/",
            "service_account_key": "key.json",
            "start_date": "01/01/2024",
            "dimensions": ["date"]
        })
        .to_string();
        assert!(ConnectorConfig::from_json(&json).is_err());
    }

    #[test]
    fn test_config_schema_lists_required_fields() {
        let schema = config_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"site_url"));
        assert!(required.contains(&"service_account_key"));
        assert!(required.contains(&"start_date"));
        assert!(required.contains(&"dimensions"));
    }
}
