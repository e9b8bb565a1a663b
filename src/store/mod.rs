//! Persistence seam for report records.
//!
//! Handlers only see [`ReportingStore`]; the server wires either the
//! process-local [`MemoryReportStore`] or the PostgreSQL-backed
//! [`crate::db::DbReportStore`].

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::Report;

pub use memory::MemoryReportStore;

/// Default prefix of report index names.
pub const DEFAULT_INDEX_PREFIX: &str = ".reporting";

/// Store failures. All of them surface as server errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(String),

    #[error("Stored report {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Report {0} already exists")]
    Conflict(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Filter and page for listing reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReportsQuery {
    /// Owner to match; `None` matches anonymous reports.
    pub user: Option<String>,
    /// Zero-based page.
    pub page: u64,
    pub size: u64,
    pub ids: Option<Vec<String>>,
}

#[async_trait]
pub trait ReportingStore: Send + Sync {
    /// Persist a new report, assigning its index. Returns the stored record.
    async fn add_report(&self, report: Report) -> Result<Report, StoreError>;

    async fn get_report(&self, id: &str) -> Result<Option<Report>, StoreError>;

    /// Reports matching the query, newest first.
    async fn list_reports(&self, query: &ListReportsQuery) -> Result<Vec<Report>, StoreError>;

    async fn count_reports(&self, user: Option<&str>) -> Result<u64, StoreError>;

    /// Returns false when no report had that id.
    async fn delete_report(&self, id: &str) -> Result<bool, StoreError>;
}

/// Weekly index name: `<prefix>-<date of the week's Sunday>`.
pub fn index_name(prefix: &str, at: DateTime<Utc>) -> String {
    let date = at.date_naive();
    let week_start = date - Duration::days(i64::from(date.weekday().num_days_from_sunday()));
    format!("{}-{}", prefix, week_start.format("%Y-%m-%d"))
}
