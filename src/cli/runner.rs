//! CLI runner
//!
//! Downloads the sales report and then the finance report, streaming each
//! body into its output file.

use super::commands::Cli;
use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{ReportBody, ReportClient, DEFAULT_BASE_URL};
use crate::reports::ReportsApi;
use crate::types::{filters, QueryParams};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Check required arguments are present and non-empty
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("key_id", self.cli.key_id.as_str()),
            ("issuer_id", self.cli.issuer_id.as_str()),
            ("vendor_number", self.cli.vendor_number.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }
        if self.cli.private_key.as_os_str().is_empty() {
            return Err(Error::missing_field("private_key"));
        }
        Ok(())
    }

    /// Client configuration from the retry and user agent flags
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .retry_count(self.cli.retry_count)
            .retry_interval(std::time::Duration::from_millis(self.cli.retry_interval_ms))
            .user_agent(self.cli.user_agent.clone())
            .build()
    }

    /// Load the key and build the client
    pub fn build_client(&self) -> Result<ReportClient> {
        let credentials = Credentials::from_key_file(
            self.cli.key_id.clone(),
            self.cli.issuer_id.clone(),
            &self.cli.private_key,
        )?;
        let base_url = self.cli.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        ReportClient::with_base_url(credentials, self.client_config(), base_url)
    }

    /// Filters for the sales and trends summary report
    pub fn sales_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .set(filters::FREQUENCY, self.cli.frequency.as_filter_value())
            .set(filters::REPORT_SUB_TYPE, filters::SUMMARY)
            .set(filters::REPORT_TYPE, filters::SALES)
            .set(filters::VENDOR_NUMBER, self.cli.vendor_number.as_str());
        if let Some(date) = &self.cli.sales_date {
            params.set(filters::REPORT_DATE, date.as_str());
        }
        if let Some(version) = &self.cli.report_version {
            params.set(filters::VERSION, version.as_str());
        }
        params
    }

    /// Filters for the finance report
    pub fn finance_params(&self) -> QueryParams {
        let date = self
            .cli
            .finance_date
            .clone()
            .unwrap_or_else(|| previous_month(Utc::now().date_naive()));

        let mut params = QueryParams::new();
        params
            .set(filters::REGION_CODE, self.cli.region_code.as_str())
            .set(filters::REPORT_DATE, date)
            .set(filters::VENDOR_NUMBER, self.cli.vendor_number.as_str());
        params
    }

    /// Run against the real API
    pub async fn run(&self, cancel: &CancellationToken) -> Result<()> {
        self.validate()?;
        let client = self.build_client()?;
        self.run_with(&client, cancel).await
    }

    /// Run against any reports implementation
    pub async fn run_with<A>(&self, api: &A, cancel: &CancellationToken) -> Result<()>
    where
        A: ReportsApi + ?Sized,
    {
        info!("Requesting sales and trends report");
        let body = api
            .fetch_sales_report(cancel, &self.sales_params())
            .await
            .context("failed to download sales and trends report")?;
        let written = save_report(body, &self.cli.sales_out, cancel)
            .await
            .with_context(|| {
                format!(
                    "failed to save sales and trends report to {}",
                    self.cli.sales_out.display()
                )
            })?;
        info!(
            "Sales and trends report saved to {} ({} bytes)",
            self.cli.sales_out.display(),
            written
        );

        info!("Requesting finance report");
        let body = api
            .fetch_finance_report(cancel, &self.finance_params())
            .await
            .context("failed to download finance report")?;
        let written = save_report(body, &self.cli.finance_out, cancel)
            .await
            .with_context(|| {
                format!(
                    "failed to save finance report to {}",
                    self.cli.finance_out.display()
                )
            })?;
        info!(
            "Finance report saved to {} ({} bytes)",
            self.cli.finance_out.display(),
            written
        );

        Ok(())
    }
}

/// Stream `body` into `path`, removing the file if the copy fails or is cancelled
async fn save_report(mut body: ReportBody, path: &Path, cancel: &CancellationToken) -> Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    match body.copy_to(&mut file, cancel).await {
        Ok(written) => Ok(written),
        Err(e) => {
            drop(file);
            if let Err(remove_err) = tokio::fs::remove_file(path).await {
                warn!(
                    "Could not remove partial file {}: {}",
                    path.display(),
                    remove_err
                );
            }
            Err(e)
        }
    }
}

/// `YYYY-MM` of the month before `today`
pub fn previous_month(today: NaiveDate) -> String {
    let last_of_previous = today - Duration::days(i64::from(today.day()));
    last_of_previous.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Frequency;
    use clap::Parser;

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec![
            "itc-reports",
            "--key-id",
            "KEY",
            "--issuer-id",
            "ISS",
            "--vendor-number",
            "85000000",
            "--private-key",
            "AuthKey.p8",
        ];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    #[test]
    fn test_previous_month() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(previous_month(d(2024, 3, 15)), "2024-02");
        assert_eq!(previous_month(d(2024, 3, 1)), "2024-02");
        assert_eq!(previous_month(d(2024, 1, 31)), "2023-12");
    }

    #[test]
    fn test_sales_params() {
        let runner = Runner::new(cli(&["--frequency", "monthly", "--sales-date", "2024-05"]));
        let params = runner.sales_params();
        assert_eq!(params.get(filters::FREQUENCY), Some("MONTHLY"));
        assert_eq!(params.get(filters::REPORT_SUB_TYPE), Some("SUMMARY"));
        assert_eq!(params.get(filters::REPORT_TYPE), Some("SALES"));
        assert_eq!(params.get(filters::VENDOR_NUMBER), Some("85000000"));
        assert_eq!(params.get(filters::REPORT_DATE), Some("2024-05"));
        assert!(!params.contains(filters::VERSION));
    }

    #[test]
    fn test_finance_params() {
        let runner = Runner::new(cli(&["--finance-date", "2018-11", "--region-code", "EU"]));
        let params = runner.finance_params();
        assert_eq!(params.get(filters::REGION_CODE), Some("EU"));
        assert_eq!(params.get(filters::REPORT_DATE), Some("2018-11"));
        assert_eq!(params.get(filters::VENDOR_NUMBER), Some("85000000"));
    }

    #[test]
    fn test_finance_params_default_date() {
        let runner = Runner::new(cli(&[]));
        let expected = previous_month(Utc::now().date_naive());
        assert_eq!(
            runner.finance_params().get(filters::REPORT_DATE),
            Some(expected.as_str())
        );
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut args = cli(&[]);
        args.issuer_id = "  ".to_string();
        let err = Runner::new(args).validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "issuer_id"));
    }

    #[test]
    fn test_client_config_from_flags() {
        let runner = Runner::new(cli(&[
            "--retry-count",
            "7",
            "--retry-interval-ms",
            "250",
            "--user-agent",
            "nightly/1",
        ]));
        let config = runner.client_config();
        assert_eq!(config.retry_count, 7);
        assert_eq!(config.retry_interval, std::time::Duration::from_millis(250));
        assert_eq!(config.user_agent, "nightly/1");
    }

    #[test]
    fn test_build_client_missing_key_file() {
        let runner = Runner::new(cli(&[]));
        assert!(matches!(
            runner.build_client().unwrap_err(),
            Error::FileNotFound { .. }
        ));
        assert_eq!(runner.cli.frequency, Frequency::Daily);
    }
}
