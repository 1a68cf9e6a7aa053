//! Sales and finance report endpoints
//!
//! Both endpoints answer `GET` with a gzip-compressed report document. The
//! filters in [`crate::types::filters`] select which report is returned.

use crate::error::Result;
use crate::http::{ReportBody, ReportClient, RequestSpec};
use crate::types::{filters, QueryParams};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// API version segment shared by the report endpoints
pub const REPORTS_VERSION: &str = "v1";

/// Sales and trends reports resource
pub const SALES_REPORTS: &str = "salesReports";

/// Financial reports resource
pub const FINANCE_REPORTS: &str = "financeReports";

/// Media type of report downloads
pub const GZIP_ACCEPT: &str = "application/a-gzip";

/// Report download operations
#[async_trait]
pub trait ReportsApi: Send + Sync {
    /// Download a sales and trends report
    async fn fetch_sales_report(
        &self,
        cancel: &CancellationToken,
        params: &QueryParams,
    ) -> Result<ReportBody>;

    /// Download a financial report.
    ///
    /// `filter[reportType]` is always sent as `FINANCIAL`; a caller value
    /// for that key is replaced.
    async fn fetch_finance_report(
        &self,
        cancel: &CancellationToken,
        params: &QueryParams,
    ) -> Result<ReportBody>;
}

/// Path of a report resource relative to the API root
pub fn report_path(resource: &str) -> String {
    format!("{REPORTS_VERSION}/{resource}")
}

/// Request for the sales endpoint
pub fn sales_report_request(params: &QueryParams) -> RequestSpec {
    RequestSpec::get(report_path(SALES_REPORTS))
        .header("Accept", GZIP_ACCEPT)
        .params(params.clone())
}

/// Request for the finance endpoint, with the report type forced
pub fn finance_report_request(params: &QueryParams) -> RequestSpec {
    let mut params = params.clone();
    params.set(filters::REPORT_TYPE, filters::FINANCIAL);

    RequestSpec::get(report_path(FINANCE_REPORTS))
        .header("Accept", GZIP_ACCEPT)
        .params(params)
}

impl ReportClient {
    /// Download a sales and trends report
    pub async fn fetch_sales_report(
        &self,
        cancel: &CancellationToken,
        params: &QueryParams,
    ) -> Result<ReportBody> {
        self.execute(cancel, sales_report_request(params)).await
    }

    /// Download a financial report, forcing `filter[reportType]=FINANCIAL`
    pub async fn fetch_finance_report(
        &self,
        cancel: &CancellationToken,
        params: &QueryParams,
    ) -> Result<ReportBody> {
        self.execute(cancel, finance_report_request(params)).await
    }
}

#[async_trait]
impl ReportsApi for ReportClient {
    async fn fetch_sales_report(
        &self,
        cancel: &CancellationToken,
        params: &QueryParams,
    ) -> Result<ReportBody> {
        ReportClient::fetch_sales_report(self, cancel, params).await
    }

    async fn fetch_finance_report(
        &self,
        cancel: &CancellationToken,
        params: &QueryParams,
    ) -> Result<ReportBody> {
        ReportClient::fetch_finance_report(self, cancel, params).await
    }
}
