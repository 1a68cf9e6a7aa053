//! Common types used throughout itc-reports
//!
//! This module contains the HTTP method type, the query parameter map used
//! to select reports, and the filter names and values the reports API
//! recognizes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Header name to value map
pub type HeaderMap = std::collections::HashMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    /// Whether parameters travel in the request body rather than the URL
    pub fn encodes_body(self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Key to multi-value parameter map.
///
/// Keys are kept sorted so the encoded form is stable; values under a key
/// keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all values under `key` with `value`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), vec![value.into()]);
        self
    }

    /// Append `value` to the values under `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Builder-style [`set`](Self::set)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// First value under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values under `key`
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map_or(&[], Vec::as_slice)
    }

    /// Remove every value under `key`
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(key, value)` pairs in encoding order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Encode as `application/x-www-form-urlencoded`, sorted by key
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}

// ============================================================================
// Report Filters
// ============================================================================

/// Filter names and values understood by the reports endpoints.
///
/// The client passes these through untouched; the API validates them.
pub mod filters {
    pub const VENDOR_NUMBER: &str = "filter[vendorNumber]";
    pub const VERSION: &str = "filter[version]";

    /// Sales report frequency
    pub const FREQUENCY: &str = "filter[frequency]";
    pub const DAILY: &str = "DAILY";
    pub const WEEKLY: &str = "WEEKLY";
    pub const MONTHLY: &str = "MONTHLY";
    pub const YEARLY: &str = "YEARLY";

    /// Sales report sub-type
    pub const REPORT_SUB_TYPE: &str = "filter[reportSubType]";
    pub const SUMMARY: &str = "SUMMARY";
    pub const DETAILED: &str = "DETAILED";
    pub const OPT_IN: &str = "OPT_IN";

    /// Report type, shared by sales and finance reports
    pub const REPORT_TYPE: &str = "filter[reportType]";
    pub const SALES: &str = "SALES";
    pub const PRE_ORDER: &str = "PRE_ORDER";
    pub const NEWSSTAND: &str = "NEWSTAND";
    pub const SUBSCRIPTION: &str = "SUBSCRIPTION";
    pub const SUBSCRIPTION_EVENT: &str = "SUBSCRIPTION_EVENT";
    pub const SUBSCRIBER: &str = "SUBSCRIBER";
    pub const FINANCIAL: &str = "FINANCIAL";

    /// `YYYY-MM-DD` for sales, `YYYY-MM` for finance
    pub const REPORT_DATE: &str = "filter[reportDate]";

    /// Finance report region code
    pub const REGION_CODE: &str = "filter[regionCode]";
}
