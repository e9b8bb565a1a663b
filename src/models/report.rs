//! Report domain models and DTOs.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Waiting to be claimed by a worker.
    Pending,
    /// A worker is generating the output.
    Processing,
    /// Output is available.
    Completed,
    /// Output is available but generation reported warnings.
    CompletedWithWarnings,
    /// Generation failed.
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::CompletedWithWarnings => "completed_with_warnings",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "completed_with_warnings" => Some(Self::CompletedWithWarnings),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// True when output can be downloaded.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed | Self::CompletedWithWarnings)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Searchable metadata copied from the job params.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportMeta {
    #[serde(rename = "objectType", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(rename = "layout", skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<String>,
}

/// Generated output of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fields supplied when creating a report.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub jobtype: String,
    pub created_by: Option<String>,
    pub payload: Map<String, JsonValue>,
    pub meta: ReportMeta,
    pub max_attempts: i32,
    pub timeout: i64,
    pub browser_timezone: Option<String>,
    pub kibana_name: Option<String>,
    pub kibana_id: Option<String>,
}

/// A report-generation job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    /// Index the record lives in; assigned by the store.
    pub index: String,
    pub jobtype: String,
    pub created_at: DateTime<Utc>,
    /// Username of the submitter; `None` when security is disabled.
    pub created_by: Option<String>,
    pub payload: Map<String, JsonValue>,
    pub meta: ReportMeta,
    pub status: ReportStatus,
    pub attempts: i32,
    pub max_attempts: i32,
    /// Processing timeout in milliseconds.
    pub timeout: i64,
    pub browser_timezone: Option<String>,
    pub kibana_name: Option<String>,
    pub kibana_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub output: Option<ReportOutput>,
}

impl Report {
    /// Create a pending report with a fresh id and no attempts.
    pub fn new(new: NewReport) -> Self {
        Self {
            id: Uuid::now_v7().simple().to_string(),
            index: String::new(),
            jobtype: new.jobtype,
            created_at: Utc::now(),
            created_by: new.created_by,
            payload: new.payload,
            meta: new.meta,
            status: ReportStatus::Pending,
            attempts: 0,
            max_attempts: new.max_attempts,
            timeout: new.timeout,
            browser_timezone: new.browser_timezone,
            kibana_name: new.kibana_name,
            kibana_id: new.kibana_id,
            started_at: None,
            completed_at: None,
            output: None,
        }
    }

    /// True if `user` submitted this report (`None` matches anonymous reports).
    pub fn is_owned_by(&self, user: Option<&str>) -> bool {
        self.created_by.as_deref() == user
    }

    /// Public representation: request headers are dropped from the payload
    /// and output content is never included.
    pub fn to_api_json(&self) -> ReportApiJson {
        let mut payload = self.payload.clone();
        payload.remove("headers");

        ReportApiJson {
            id: self.id.clone(),
            index: self.index.clone(),
            kibana_name: self.kibana_name.clone(),
            kibana_id: self.kibana_id.clone(),
            jobtype: self.jobtype.clone(),
            created_at: format_timestamp(self.created_at),
            created_by: match &self.created_by {
                Some(user) => JsonValue::String(user.clone()),
                None => JsonValue::Bool(false),
            },
            meta: self.meta.clone(),
            timeout: self.timeout,
            max_attempts: self.max_attempts,
            started_at: self.started_at.map(format_timestamp),
            completed_at: self.completed_at.map(format_timestamp),
            payload,
            output: self.output.as_ref().map(|o| ReportOutput {
                content: None,
                ..o.clone()
            }),
            status: self.status,
            attempts: self.attempts,
            browser_timezone: self.browser_timezone.clone(),
        }
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Report as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportApiJson {
    pub id: String,
    pub index: String,
    pub kibana_name: Option<String>,
    pub kibana_id: Option<String>,
    pub jobtype: String,
    pub created_at: String,
    /// Username, or `false` for anonymous submissions.
    #[schema(value_type = Object)]
    pub created_by: JsonValue,
    pub meta: ReportMeta,
    pub timeout: i64,
    pub max_attempts: i32,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    #[schema(value_type = Object)]
    pub payload: Map<String, JsonValue>,
    pub output: Option<ReportOutput>,
    pub status: ReportStatus,
    pub attempts: i32,
    pub browser_timezone: Option<String>,
}

/// Response after enqueueing a report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Download path for the report output.
    pub path: String,
    pub job: ReportApiJson,
}
