//! CLI argument parsing

use crate::config::{DEFAULT_RETRY_COUNT, DEFAULT_USER_AGENT};
use crate::types::filters;
use clap::Parser;
use std::path::PathBuf;

/// Download App Store Connect sales and finance reports
#[derive(Parser, Debug, Clone)]
#[command(name = "itc-reports")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API key ID
    #[arg(long)]
    pub key_id: String,

    /// Issuer ID of the API key
    #[arg(long)]
    pub issuer_id: String,

    /// Vendor number whose reports are downloaded
    #[arg(long)]
    pub vendor_number: String,

    /// Path to the .p8 private key associated with the key ID
    #[arg(long)]
    pub private_key: PathBuf,

    /// File to save the sales and trends report to
    #[arg(long, default_value = "sales.gzip")]
    pub sales_out: PathBuf,

    /// File to save the finance report to
    #[arg(long, default_value = "finance.gzip")]
    pub finance_out: PathBuf,

    /// Sales report frequency
    #[arg(long, value_enum, default_value = "daily")]
    pub frequency: Frequency,

    /// Sales report date (YYYY-MM-DD); latest available when omitted
    #[arg(long)]
    pub sales_date: Option<String>,

    /// Sales report format version (e.g. 1_0)
    #[arg(long)]
    pub report_version: Option<String>,

    /// Finance report region code
    #[arg(long, default_value = "US")]
    pub region_code: String,

    /// Finance report fiscal month (YYYY-MM); defaults to the previous month
    #[arg(long)]
    pub finance_date: Option<String>,

    /// Attempts per request
    #[arg(long, default_value_t = DEFAULT_RETRY_COUNT)]
    pub retry_count: u32,

    /// Delay between attempts in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub retry_interval_ms: u64,

    /// User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// API host override
    #[arg(long, hide = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Sales report frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Value of the `filter[frequency]` parameter
    pub fn as_filter_value(self) -> &'static str {
        match self {
            Frequency::Daily => filters::DAILY,
            Frequency::Weekly => filters::WEEKLY,
            Frequency::Monthly => filters::MONTHLY,
            Frequency::Yearly => filters::YEARLY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 9] = [
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

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(REQUIRED).unwrap();
        assert_eq!(cli.key_id, "KEY");
        assert_eq!(cli.sales_out, PathBuf::from("sales.gzip"));
        assert_eq!(cli.finance_out, PathBuf::from("finance.gzip"));
        assert_eq!(cli.frequency, Frequency::Daily);
        assert_eq!(cli.region_code, "US");
        assert_eq!(cli.retry_count, 3);
        assert_eq!(cli.retry_interval_ms, 1000);
        assert_eq!(cli.user_agent, "itc-reports/v1");
        assert!(cli.finance_date.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_overrides() {
        let mut args = REQUIRED.to_vec();
        args.extend([
            "--frequency",
            "weekly",
            "--finance-date",
            "2018-11",
            "--retry-count",
            "5",
            "-v",
        ]);
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.frequency, Frequency::Weekly);
        assert_eq!(cli.finance_date.as_deref(), Some("2018-11"));
        assert_eq!(cli.retry_count, 5);
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_missing_required() {
        assert!(Cli::try_parse_from(["itc-reports", "--key-id", "KEY"]).is_err());
    }

    #[test]
    fn test_frequency_filter_values() {
        assert_eq!(Frequency::Daily.as_filter_value(), "DAILY");
        assert_eq!(Frequency::Yearly.as_filter_value(), "YEARLY");
    }
}
