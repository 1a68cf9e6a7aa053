//! Authenticated report client
//!
//! Provides the request layer for the reports API:
//! - URL construction with query or form-body parameter encoding
//! - A fresh bearer token on every attempt
//! - Fixed-delay retries through [`RetryingExecutor`]
//! - Any status other than 200 treated as a failed attempt

use super::body::ReportBody;
use super::retry::{RetryPolicy, RetryingExecutor};
use crate::auth::{Credentials, TokenIssuer};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{HeaderMap, Method, QueryParams};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Production host of the reports API
pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com/";

/// A single request before encoding and authentication
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL
    pub path: String,
    /// Operation-specific headers
    pub headers: HeaderMap,
    /// Query string for GET/DELETE, form body for POST/PUT/PATCH
    pub params: QueryParams,
}

impl RequestSpec {
    /// Create a request for `path`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the parameters
    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }
}

/// Reports API client with token management and retries
pub struct ReportClient {
    client: Client,
    base_url: Url,
    config: ClientConfig,
    issuer: TokenIssuer,
    executor: RetryingExecutor,
}

impl ReportClient {
    /// Create a client against the production API
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Self::with_base_url(credentials, config, DEFAULT_BASE_URL)
    }

    /// Create a client against another host (staging, mock servers)
    pub fn with_base_url(
        credentials: Credentials,
        config: ClientConfig,
        base_url: &str,
    ) -> Result<Self> {
        Self::with_issuer(TokenIssuer::new(credentials), config, base_url)
    }

    /// Create a client around an existing token issuer
    pub fn with_issuer(issuer: TokenIssuer, config: ClientConfig, base_url: &str) -> Result<Self> {
        config.validate()?;

        // `Url::join` drops the last segment unless the base ends with a slash
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        let client = Client::builder().build()?;
        let executor = RetryingExecutor::new(config.executor_config());

        Ok(Self {
            client,
            base_url,
            config,
            issuer,
            executor,
        })
    }

    /// Replace the retry policy (default: retry every failure)
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.executor = self.executor.with_policy(policy);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.executor.policy()
    }

    /// Resolve the request URL, appending the query string for non-body methods
    pub fn build_url(&self, spec: &RequestSpec) -> Result<Url> {
        let mut url = self.base_url.join(spec.path.trim_start_matches('/'))?;
        if !spec.method.encodes_body() && !spec.params.is_empty() {
            url.set_query(Some(&spec.params.encode()));
        }
        Ok(url)
    }

    /// Send `spec` with retries and return the unread body of the 200 response
    pub async fn execute(&self, cancel: &CancellationToken, spec: RequestSpec) -> Result<ReportBody> {
        let url = self.build_url(&spec)?;
        let body = (spec.method.encodes_body() && !spec.params.is_empty())
            .then(|| spec.params.encode());

        debug!("Requesting {} {}", spec.method, url);

        let response = self
            .executor
            .run(cancel, || self.attempt(&spec, &url, body.as_deref()))
            .await?;

        debug!("Request succeeded: {} {}", spec.method, url);
        Ok(ReportBody::new(response))
    }

    /// One authenticated attempt
    async fn attempt(&self, spec: &RequestSpec, url: &Url, body: Option<&str>) -> Result<Response> {
        let token = self.issuer.current_token().await?;

        let mut req = self
            .client
            .request(spec.method.into(), url.clone())
            .bearer_auth(token)
            .header(USER_AGENT, self.config.user_agent.as_str());

        for (key, value) in &spec.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = body {
            req = req
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.to_string());
        }

        let response = req.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read error body from {}: {}", url, e);
                    format!("<unreadable body: {e}>")
                }
            };
            return Err(Error::request_failed(url.as_str(), status.as_u16(), body));
        }

        Ok(response)
    }
}

impl std::fmt::Debug for ReportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .field("issuer", &self.issuer)
            .field("retry_policy", &self.executor.policy())
            .finish_non_exhaustive()
    }
}
