//! Job inspection handlers: list, count, info, download, delete.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::ReportingUser;
use crate::core::ReportingCore;
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::models::{ListJobsParams, Report, ReportApiJson, ReportStatus};
use crate::store::ListReportsQuery;

/// Seconds a client should wait before polling an unfinished report again.
pub const RETRY_AFTER_SECS: u32 = 30;

/// Response for the delete endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteReportResponse {
    pub deleted: bool,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Report {} not found", id))
}

/// Load a report visible to the caller. Reports owned by other users are
/// reported as missing.
async fn find_owned(core: &ReportingCore, caller: &ReportingUser, id: &str) -> AppResult<Report> {
    core.store()
        .get_report(id)
        .await?
        .filter(|report| report.is_owned_by(caller.username()))
        .ok_or_else(|| not_found(id))
}

/// List the caller's reports, newest first.
#[utoipa::path(
    get,
    path = "/api/reporting/jobs/list",
    tag = "Jobs",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page (default 0)"),
        ("size" = Option<u64>, Query, description = "Results per page (default 10, max 100)"),
        ("ids" = Option<String>, Query, description = "Comma-separated report ids")
    ),
    responses(
        (status = 200, description = "Reports of the caller", body = Vec<ReportApiJson>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn list_jobs(
    caller: ReportingUser,
    core: web::Data<ReportingCore>,
    query: web::Query<ListJobsParams>,
) -> AppResult<HttpResponse> {
    let reports = core
        .store()
        .list_reports(&ListReportsQuery {
            user: caller.username().map(str::to_string),
            page: query.page(),
            size: query.clamped_size(),
            ids: query.id_list(),
        })
        .await?;

    let jobs: Vec<ReportApiJson> = reports.iter().map(Report::to_api_json).collect();
    Ok(HttpResponse::Ok().json(jobs))
}

/// Count the caller's reports.
#[utoipa::path(
    get,
    path = "/api/reporting/jobs/count",
    tag = "Jobs",
    responses(
        (status = 200, description = "Number of reports, as plain text", body = String),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn count_jobs(
    caller: ReportingUser,
    core: web::Data<ReportingCore>,
) -> AppResult<HttpResponse> {
    let count = core.store().count_reports(caller.username()).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(count.to_string()))
}

/// Get a single report.
#[utoipa::path(
    get,
    path = "/api/reporting/jobs/info/{id}",
    tag = "Jobs",
    params(
        ("id" = String, Path, description = "Report id")
    ),
    responses(
        (status = 200, description = "Report", body = ReportApiJson),
        (status = 404, description = "Report not found", body = ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn job_info(
    caller: ReportingUser,
    core: web::Data<ReportingCore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let report = find_owned(&core, &caller, &path).await?;
    Ok(HttpResponse::Ok().json(report.to_api_json()))
}

/// Download the output of a report.
#[utoipa::path(
    get,
    path = "/api/reporting/jobs/download/{id}",
    tag = "Jobs",
    params(
        ("id" = String, Path, description = "Report id")
    ),
    responses(
        (status = 200, description = "Report output"),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 500, description = "Report generation failed", body = ErrorResponse),
        (status = 503, description = "Report is not ready yet; see Retry-After", body = ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn download_job(
    caller: ReportingUser,
    core: web::Data<ReportingCore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let report = find_owned(&core, &caller, &path).await?;

    match report.status {
        ReportStatus::Pending | ReportStatus::Processing => {
            Ok(HttpResponse::ServiceUnavailable()
                .insert_header((header::RETRY_AFTER, RETRY_AFTER_SECS.to_string()))
                .json(ErrorResponse {
                    error: "NOT_READY".to_string(),
                    message: format!("Report {} is {}", report.id, report.status),
                }))
        }
        ReportStatus::Failed => {
            let reason = report
                .output
                .as_ref()
                .and_then(|o| o.error.clone())
                .unwrap_or_else(|| "unknown error".to_string());
            Err(AppError::Internal(format!(
                "Reporting generation failed: {}",
                reason
            )))
        }
        ReportStatus::Completed | ReportStatus::CompletedWithWarnings => {
            let output = report.output.clone().unwrap_or_default();
            let extension = core
                .export_types()
                .get_by_job_type(&report.jobtype)
                .map(|t| t.job_content_extension())
                .unwrap_or("bin");
            let title = report
                .payload
                .get("title")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or("report")
                .replace('"', "'");

            Ok(HttpResponse::Ok()
                .content_type(
                    output
                        .content_type
                        .unwrap_or_else(|| "application/octet-stream".to_string()),
                )
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}.{}\"", title, extension),
                ))
                .body(output.content.unwrap_or_default()))
        }
    }
}

/// Delete a report.
#[utoipa::path(
    delete,
    path = "/api/reporting/jobs/delete/{id}",
    tag = "Jobs",
    params(
        ("id" = String, Path, description = "Report id")
    ),
    responses(
        (status = 200, description = "Report deleted", body = DeleteReportResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn delete_job(
    caller: ReportingUser,
    core: web::Data<ReportingCore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let report = find_owned(&core, &caller, &path).await?;
    if !core.store().delete_report(&report.id).await? {
        return Err(not_found(&report.id));
    }

    info!(report_id = %report.id, "Report deleted");
    Ok(HttpResponse::Ok().json(DeleteReportResponse { deleted: true }))
}

/// Configure job routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .route("/list", web::get().to(list_jobs))
            .route("/count", web::get().to(count_jobs))
            .route("/info/{id}", web::get().to(job_info))
            .route("/download/{id}", web::get().to(download_job))
            .route("/delete/{id}", web::delete().to(delete_job)),
    );
}
