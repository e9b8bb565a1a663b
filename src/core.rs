//! Reporting core: the collaborators request handlers depend on.
//!
//! Handlers receive a `web::Data<ReportingCore>` and reach the store, the
//! export-type registry, and the license through it, so tests can build a
//! core around any [`ReportingStore`].

use std::sync::Arc;

use crate::config::Config;
use crate::export_types::ExportTypesRegistry;
use crate::models::License;
use crate::store::{DEFAULT_INDEX_PREFIX, ReportingStore};

/// Settings stamped onto every new report.
#[derive(Debug, Clone)]
pub struct ReportingSettings {
    /// Prefix for public paths (e.g. `/kbn`); empty when served at the root.
    pub base_path: String,
    pub index_prefix: String,
    pub kibana_name: Option<String>,
    pub kibana_id: Option<String>,
    pub version: String,
    pub max_attempts: i32,
    /// Processing timeout in milliseconds.
    pub job_timeout_ms: i64,
}

impl Default for ReportingSettings {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            index_prefix: DEFAULT_INDEX_PREFIX.to_string(),
            kibana_name: None,
            kibana_id: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_attempts: 1,
            job_timeout_ms: 120_000,
        }
    }
}

impl ReportingSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_path: config.base_path.clone(),
            index_prefix: config.index_prefix.clone(),
            kibana_name: config.kibana_name.clone(),
            kibana_id: config.kibana_id.clone(),
            version: config.version.clone(),
            max_attempts: config.max_attempts,
            job_timeout_ms: config.job_timeout_ms,
        }
    }
}

#[derive(Clone)]
pub struct ReportingCore {
    settings: ReportingSettings,
    export_types: Arc<ExportTypesRegistry>,
    store: Arc<dyn ReportingStore>,
    license: Option<License>,
}

impl ReportingCore {
    pub fn new(
        settings: ReportingSettings,
        export_types: ExportTypesRegistry,
        store: Arc<dyn ReportingStore>,
        license: Option<License>,
    ) -> Self {
        Self {
            settings,
            export_types: Arc::new(export_types),
            store,
            license,
        }
    }

    pub fn settings(&self) -> &ReportingSettings {
        &self.settings
    }

    pub fn export_types(&self) -> &ExportTypesRegistry {
        &self.export_types
    }

    pub fn store(&self) -> Arc<dyn ReportingStore> {
        Arc::clone(&self.store)
    }

    /// Current license; `None` when license information is unavailable.
    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    /// Public download path for a report id.
    pub fn download_path(&self, report_id: &str) -> String {
        format!(
            "{}/api/reporting/jobs/download/{}",
            self.settings.base_path, report_id
        )
    }
}
