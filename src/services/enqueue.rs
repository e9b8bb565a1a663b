//! Validation and persistence of report-generation requests.

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::core::ReportingCore;
use crate::error::{AppError, AppResult};
use crate::export_types::JobContext;
use crate::models::{AuthenticatedUser, JobParams, NewReport, Report, ReportMeta};
use crate::rison;
use crate::services::check_license;

/// Message returned when neither the query string nor the body carry job params.
pub const MISSING_JOB_PARAMS: &str =
    "A jobParams RISON string is required in the querystring or POST body";

/// Pick the job params string from the body, falling back to the query string.
/// Empty strings count as absent.
pub fn select_job_params<'a>(
    body: Option<&'a str>,
    query: Option<&'a str>,
) -> AppResult<&'a str> {
    body.filter(|s| !s.is_empty())
        .or_else(|| query.filter(|s| !s.is_empty()))
        .ok_or_else(|| AppError::BadRequest(MISSING_JOB_PARAMS.to_string()))
}

/// Decode a RISON job params string.
pub fn parse_job_params(raw: &str) -> AppResult<JobParams> {
    let value = rison::decode_object(raw).map_err(|e| {
        warn!(error = %e, "Rejected job params");
        AppError::BadRequest(format!("invalid rison: {}", raw))
    })?;

    JobParams::from_value(value.into())
        .map_err(|e| AppError::BadRequest(format!("invalid jobParams: {}", e)))
}

/// Check that `tz` names a known IANA time zone.
pub fn validate_timezone(tz: &str) -> AppResult<()> {
    tz.parse::<Tz>()
        .map(|_| ())
        .map_err(|_| AppError::BadRequest(format!("Invalid timezone \"{}\".", tz)))
}

/// Validate job params against an export type and persist a pending report.
pub async fn enqueue_job(
    core: &ReportingCore,
    export_type_id: &str,
    params: JobParams,
    user: Option<&AuthenticatedUser>,
) -> AppResult<Report> {
    let export_type = core
        .export_types()
        .get_by_id(export_type_id)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid export-type of {}", export_type_id)))?;

    let license = check_license(core.license(), export_type.as_ref());
    if !license.enable_links {
        return Err(AppError::Forbidden(license.message.unwrap_or_default()));
    }

    if let Some(tz) = params.browser_timezone.as_deref() {
        validate_timezone(tz)?;
    }

    let settings = core.settings();
    let ctx = JobContext {
        version: settings.version.clone(),
        now: Utc::now(),
    };
    let payload = export_type
        .create_job(&params, &ctx)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let report = Report::new(NewReport {
        jobtype: export_type.job_type().to_string(),
        created_by: user.map(|u| u.username.clone()),
        payload,
        meta: ReportMeta {
            object_type: params.object_type.clone(),
            layout_id: params.layout_id().map(str::to_string),
        },
        max_attempts: settings.max_attempts,
        timeout: settings.job_timeout_ms,
        browser_timezone: params.browser_timezone.clone(),
        kibana_name: settings.kibana_name.clone(),
        kibana_id: settings.kibana_id.clone(),
    });

    let report = core.store().add_report(report).await?;

    info!(
        report_id = %report.id,
        jobtype = %report.jobtype,
        index = %report.index,
        user = report.created_by.as_deref().unwrap_or("<anonymous>"),
        "Report enqueued"
    );

    Ok(report)
}
