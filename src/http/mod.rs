//! HTTP client module
//!
//! Provides the authenticated report client and its retry executor.
//!
//! # Features
//!
//! - **Automatic Retries**: Fixed-interval retries, every failure retried by default
//! - **Cancellation**: Attempts and retry waits abort when the caller's token fires
//! - **Authentication**: Bearer token from the auth module on each attempt
//! - **Streaming Bodies**: Successful responses are returned unread

mod body;
mod client;
mod retry;

pub use body::ReportBody;
pub use client::{ReportClient, RequestSpec, DEFAULT_BASE_URL};
pub use retry::{ExecutorConfig, RetryPolicy, RetryingExecutor};
