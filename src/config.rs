//! Client configuration
//!
//! `ClientConfig` holds the three knobs a report client exposes: how many
//! attempts a request gets, how long to wait between them, and the
//! `User-Agent` sent with each request. Every field has a default and can be
//! overridden on its own, either with the builder or from JSON.

use crate::error::{Error, Result};
use crate::http::ExecutorConfig;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempts per request when not overridden
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Pause between attempts when not overridden
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// User agent sent when not overridden
pub const DEFAULT_USER_AGENT: &str = "itc-reports/v1";

/// Configuration for a [`ReportClient`](crate::http::ReportClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Total attempts per request, including the first (default 3)
    pub retry_count: u32,
    /// Delay between attempts (default 1s)
    #[serde(rename = "retry_interval_ms", with = "duration_millis")]
    pub retry_interval: Duration,
    /// `User-Agent` header value (default `itc-reports/v1`)
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry_count: DEFAULT_RETRY_COUNT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject values no client can work with
    pub fn validate(&self) -> Result<()> {
        if self.retry_count == 0 {
            return Err(Error::invalid_value(
                "retry_count",
                "must allow at least one attempt",
            ));
        }
        if HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(Error::invalid_value(
                "user_agent",
                "not a valid HTTP header value",
            ));
        }
        Ok(())
    }

    /// Retry settings for the executor
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig::new(self.retry_count, self.retry_interval)
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set total attempts per request
    pub fn retry_count(mut self, count: u32) -> Self {
        self.config.retry_count = count;
        self
    }

    /// Set the delay between attempts
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.config.retry_interval = interval;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
