//! Process-local report store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ListReportsQuery, ReportingStore, StoreError, index_name};
use crate::models::Report;

/// Keeps reports in memory. Used in development and tests.
pub struct MemoryReportStore {
    index_prefix: String,
    reports: RwLock<Vec<Report>>,
}

impl MemoryReportStore {
    pub fn new(index_prefix: impl Into<String>) -> Self {
        Self {
            index_prefix: index_prefix.into(),
            reports: RwLock::new(Vec::new()),
        }
    }

    /// Replace a stored report wholesale (e.g. after a worker updates it).
    pub async fn put_report(&self, report: Report) {
        let mut reports = self.reports.write().await;
        match reports.iter_mut().find(|r| r.id == report.id) {
            Some(existing) => *existing = report,
            None => reports.push(report),
        }
    }
}

impl Default for MemoryReportStore {
    fn default() -> Self {
        Self::new(super::DEFAULT_INDEX_PREFIX)
    }
}

#[async_trait]
impl ReportingStore for MemoryReportStore {
    async fn add_report(&self, mut report: Report) -> Result<Report, StoreError> {
        let mut reports = self.reports.write().await;
        if reports.iter().any(|r| r.id == report.id) {
            return Err(StoreError::Conflict(report.id));
        }
        report.index = index_name(&self.index_prefix, report.created_at);
        reports.push(report.clone());
        Ok(report)
    }

    async fn get_report(&self, id: &str) -> Result<Option<Report>, StoreError> {
        let reports = self.reports.read().await;
        Ok(reports.iter().find(|r| r.id == id).cloned())
    }

    async fn list_reports(&self, query: &ListReportsQuery) -> Result<Vec<Report>, StoreError> {
        let reports = self.reports.read().await;
        let mut matching: Vec<&Report> = reports
            .iter()
            .filter(|r| r.is_owned_by(query.user.as_deref()))
            .filter(|r| match &query.ids {
                Some(ids) => ids.contains(&r.id),
                None => true,
            })
            .collect();
        // Ids are UUIDv7, so they order reports created in the same instant
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(matching
            .into_iter()
            .skip(query.page.saturating_mul(query.size) as usize)
            .take(query.size as usize)
            .cloned()
            .collect())
    }

    async fn count_reports(&self, user: Option<&str>) -> Result<u64, StoreError> {
        let reports = self.reports.read().await;
        Ok(reports.iter().filter(|r| r.is_owned_by(user)).count() as u64)
    }

    async fn delete_report(&self, id: &str) -> Result<bool, StoreError> {
        let mut reports = self.reports.write().await;
        let before = reports.len();
        reports.retain(|r| r.id != id);
        Ok(reports.len() != before)
    }
}
