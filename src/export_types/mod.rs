//! Export types: the report formats that can be requested.
//!
//! Each export type turns validated job params into the payload a worker
//! later renders. The registry maps the `{exportType}` path segment of the
//! generate route to an implementation.

mod csv_searchsource;
mod png;
mod printable_pdf;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value as JsonValue, json};

use crate::models::{JobParams, LicenseType};

pub use csv_searchsource::CsvSearchSource;
pub use png::Png;
pub use printable_pdf::PrintablePdf;

/// Licenses that allow screenshot-based exports.
const SCREENSHOT_LICENSES: &[LicenseType] = &[
    LicenseType::Trial,
    LicenseType::Standard,
    LicenseType::Gold,
    LicenseType::Platinum,
    LicenseType::Enterprise,
];

/// Values shared by all job factories for one request.
#[derive(Debug, Clone)]
pub struct JobContext {
    /// Server version stamped into the payload.
    pub version: String,
    /// Time the job is considered to have been requested.
    pub now: DateTime<Utc>,
}

/// Job factory failures; all are client errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExportTypeError {
    #[error("jobParams.{0} is required")]
    MissingParam(&'static str),

    #[error("jobParams.{0} is invalid: {1}")]
    InvalidParam(&'static str, String),

    #[error("Found invalid URL(s), all URLs must be relative: {0}")]
    InvalidUrls(String),
}

/// A report format.
pub trait ExportType: Send + Sync {
    /// Key used in the generate route path.
    fn id(&self) -> &'static str;

    /// Human readable name, used in license messages.
    fn name(&self) -> &'static str;

    /// Job type recorded on the report.
    fn job_type(&self) -> &'static str;

    /// File extension of the generated output.
    fn job_content_extension(&self) -> &'static str;

    fn valid_license_types(&self) -> &'static [LicenseType];

    /// Build the report payload from job params.
    fn create_job(
        &self,
        params: &JobParams,
        ctx: &JobContext,
    ) -> Result<Map<String, JsonValue>, ExportTypeError>;
}

/// Registry errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("export type with id {0} has already been registered")]
    Duplicate(String),
}

/// Export types by id.
#[derive(Clone, Default)]
pub struct ExportTypesRegistry {
    types: Vec<Arc<dyn ExportType>>,
}

impl ExportTypesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in PDF, PNG and CSV export types.
    pub fn with_defaults() -> Self {
        let types: [Arc<dyn ExportType>; 3] = [
            Arc::new(PrintablePdf),
            Arc::new(Png),
            Arc::new(CsvSearchSource),
        ];
        Self {
            types: types.into(),
        }
    }

    pub fn register<T: ExportType + 'static>(&mut self, export_type: T) -> Result<(), RegistryError> {
        if self.get_by_id(export_type.id()).is_some() {
            return Err(RegistryError::Duplicate(export_type.id().to_string()));
        }
        self.types.push(Arc::new(export_type));
        Ok(())
    }

    pub fn get_by_id(&self, id: &str) -> Option<Arc<dyn ExportType>> {
        self.types.iter().find(|t| t.id() == id).cloned()
    }

    pub fn get_by_job_type(&self, job_type: &str) -> Option<Arc<dyn ExportType>> {
        self.types.iter().find(|t| t.job_type() == job_type).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ExportType>> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// The decoded job params plus request metadata.
///
/// Unmodelled keys come first so typed fields and metadata win on a clash.
/// `browserTimezone` is always present, null when not given.
fn base_payload(params: &JobParams, ctx: &JobContext) -> Map<String, JsonValue> {
    let mut payload = params.extra.clone();
    let mut put = |key: &str, value: Option<JsonValue>| {
        if let Some(value) = value {
            payload.insert(key.into(), value);
        }
    };
    put("title", params.title.as_ref().map(|v| json!(v)));
    put("objectType", params.object_type.as_ref().map(|v| json!(v)));
    put("browserTimezone", Some(json!(params.browser_timezone)));
    put("layout", params.layout.as_ref().map(|v| json!(v)));
    put("relativeUrls", params.relative_urls.as_ref().map(|v| json!(v)));
    put("relativeUrl", params.relative_url.as_ref().map(|v| json!(v)));
    put("searchSource", params.search_source.clone());
    put("columns", params.columns.as_ref().map(|v| json!(v)));
    put(
        "forceNow",
        Some(json!(ctx.now.to_rfc3339_opts(SecondsFormat::Millis, true))),
    );
    put("version", Some(json!(ctx.version)));
    payload
}

/// A URL is absolute if it names a host (`//host/...`) or a scheme (`http:`).
fn is_relative_url(url: &str) -> bool {
    if url.starts_with("//") {
        return false;
    }
    let scheme_end = url.find(':');
    let path_start = url.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (Some(colon), Some(slash)) if slash < colon => true,
        (Some(0), _) => true,
        (Some(colon), _) => !url[..colon]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        (None, _) => true,
    }
}

/// Reject any URL that is not relative to the server.
fn validate_urls<'a>(urls: impl IntoIterator<Item = &'a str>) -> Result<(), ExportTypeError> {
    let invalid: Vec<&str> = urls.into_iter().filter(|u| !is_relative_url(u)).collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ExportTypeError::InvalidUrls(invalid.join(" ")))
    }
}
