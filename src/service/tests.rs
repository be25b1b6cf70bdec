//! Tests for the service wire types and handle

use super::*;
use chrono::NaiveDate;
use serde_json::json;

fn spec() -> QuerySpec {
    QuerySpec {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        dimensions: vec!["date".to_string(), "query".to_string()],
        row_limit: 25_000,
        start_row: 50_000,
    }
}

#[test]
fn test_query_spec_serializes_camel_case() {
    let value = serde_json::to_value(spec()).unwrap();
    assert_eq!(
        value,
        json!({
            "startDate": "2024-01-01",
            "endDate": "2024-01-31",
            "dimensions": ["date", "query"],
            "rowLimit": 25_000,
            "startRow": 50_000
        })
    );
}

#[test]
fn test_response_deserializes_rows() {
    let response: ApiResponse = serde_json::from_value(json!({
        "rows": [
            {
                "keys": ["2024-01-01", "shoes"],
                "clicks": 10,
                "impressions": 200,
                "ctr": 0.05,
                "position": 3.456
            }
        ],
        "responseAggregationType": "byProperty"
    }))
    .unwrap();

    assert_eq!(response.rows.len(), 1);
    let row = &response.rows[0];
    assert_eq!(row.keys, vec!["2024-01-01", "shoes"]);
    assert_eq!(row.clicks, 10.0);
    assert_eq!(row.impressions, 200.0);
    assert_eq!(row.ctr, 0.05);
    assert_eq!(row.position, 3.456);
}

#[test]
fn test_response_defaults_missing_rows_to_empty() {
    let response: ApiResponse = serde_json::from_value(json!({})).unwrap();
    assert!(response.rows.is_empty());

    let response: ApiResponse =
        serde_json::from_value(json!({"responseAggregationType": "auto"})).unwrap();
    assert!(response.rows.is_empty());
}

#[test]
fn test_handle_percent_encodes_site_url() {
    let http = crate::http::HttpClient::with_config(
        crate::http::HttpClientConfig::builder().no_rate_limit().build(),
    );
    let key_json = crate::auth::tests::test_key_json("https://oauth2.googleapis.com/token");
    let tokens = crate::auth::CredentialResolver::new(&key_json, http.inner().clone())
        .unwrap()
        .resolve()
        .unwrap();

    let handle = ServiceHandle::new(http, tokens, "https://example.com/");
    assert_eq!(
        handle.query_url(),
        "https://www.googleapis.com/webmasters/v3/sites/https%3A%2F%2Fexample.com%2F/searchAnalytics/query"
    );
    assert_eq!(handle.site_url(), "https://example.com/");
}

#[test]
fn test_handle_encodes_domain_property() {
    let http = crate::http::HttpClient::with_config(
        crate::http::HttpClientConfig::builder().no_rate_limit().build(),
    );
    let key_json = crate::auth::tests::test_key_json("https://oauth2.googleapis.com/token");
    let tokens = crate::auth::CredentialResolver::new(&key_json, http.inner().clone())
        .unwrap()
        .resolve()
        .unwrap();

    let handle = ServiceHandle::with_base_url(
        http,
        tokens,
        "sc-domain:example.com",
        "http://localhost:9999/v3/",
    );
    assert_eq!(
        handle.query_url(),
        "http://localhost:9999/v3/sites/sc-domain%3Aexample.com/searchAnalytics/query"
    );
}
