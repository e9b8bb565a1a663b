//! Domain models for the reporting server.

use utoipa::ToSchema;

pub mod api_key;
pub mod job_params;
pub mod license;
pub mod report;

// Re-export commonly used types
pub use api_key::{ApiKeyCredential, ApiKeyRole, AuthenticatedUser};
pub use job_params::{JobParams, LayoutDimensions, LayoutParams};
pub use license::{License, LicenseCheck, LicenseStatus, LicenseType};
pub use report::{
    GenerateResponse, NewReport, Report, ReportApiJson, ReportMeta, ReportOutput, ReportStatus,
};

/// Largest page size accepted by the jobs list.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination parameters for the jobs list.
#[derive(Debug, Clone, Default, serde::Deserialize, ToSchema)]
pub struct ListJobsParams {
    /// Zero-based page number (default: 0)
    pub page: Option<u64>,
    /// Items per page (default: 10, max: 100)
    pub size: Option<u64>,
    /// Comma-separated report ids to restrict the list to
    pub ids: Option<String>,
}

fn default_size() -> u64 {
    10
}

impl ListJobsParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(0)
    }

    /// Clamp size to maximum allowed value.
    pub fn clamped_size(&self) -> u64 {
        self.size.unwrap_or(default_size()).clamp(1, MAX_PAGE_SIZE)
    }

    /// Parsed id filter, ignoring empty entries.
    pub fn id_list(&self) -> Option<Vec<String>> {
        self.ids.as_ref().map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}
