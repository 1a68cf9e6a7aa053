// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # itc-reports
//!
//! Client for the App Store Connect reporting API: download sales and
//! finance report documents with automatically refreshed ES256 tokens and
//! fixed-interval retries.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use itc_reports::{filters, ClientConfig, Credentials, QueryParams, ReportClient, Result};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credentials = Credentials::from_key_file("2X9R4HXF34", "issuer-id", "AuthKey.p8")?;
//!     let client = ReportClient::new(credentials, ClientConfig::default())?;
//!
//!     let params = QueryParams::new()
//!         .with(filters::FREQUENCY, filters::DAILY)
//!         .with(filters::REPORT_SUB_TYPE, filters::SUMMARY)
//!         .with(filters::REPORT_TYPE, filters::SALES)
//!         .with(filters::VENDOR_NUMBER, "85012345");
//!
//!     let cancel = CancellationToken::new();
//!     let mut report = client.fetch_sales_report(&cancel, &params).await?;
//!     let mut file = tokio::fs::File::create("sales.gzip").await?;
//!     report.copy_to(&mut file, &cancel).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ ReportClient: fetch_sales_report / fetch_finance_report  │
//! └──────────────────────────────────────────────────────────┘
//!          │                    │                   │
//!   ┌──────┴──────┐   ┌─────────┴────────┐   ┌──────┴──────┐
//!   │ TokenIssuer │   │ RetryingExecutor │   │ ReportBody  │
//!   │ ES256, 20m  │   │ N tries, fixed   │   │ lazy stream │
//!   └─────────────┘   └──────────────────┘   └─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types, query parameters and report filters
pub mod types;

/// Token signing and caching
pub mod auth;

/// Client configuration
pub mod config;

/// Report client, retry executor and response bodies
pub mod http;

/// Sales and finance report endpoints
pub mod reports;

/// Command-line interface
pub mod cli;

/// Test doubles (mock clock)
pub mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{Credentials, TokenIssuer};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use http::{ReportBody, ReportClient, RetryPolicy};
pub use reports::ReportsApi;
pub use types::{filters, QueryParams};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
