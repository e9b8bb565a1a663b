//! Report generation handler.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::ReportingUser;
use crate::core::ReportingCore;
use crate::error::AppResult;
use crate::models::GenerateResponse;
use crate::services::enqueue::select_job_params;
use crate::services::{enqueue_job, parse_job_params};

/// Query string of a generate request.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    /// RISON-encoded job params
    #[serde(rename = "jobParams")]
    pub job_params: Option<String>,
}

/// JSON body of a generate request.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateBody {
    /// RISON-encoded job params; takes precedence over the query string
    #[serde(rename = "jobParams")]
    pub job_params: Option<String>,
}

/// Enqueue a report for the given export type.
#[utoipa::path(
    post,
    path = "/api/reporting/generate/{export_type}",
    tag = "Reporting",
    params(
        ("export_type" = String, Path, description = "Export type id (printablePdf, PNG, csv_searchsource)"),
        ("jobParams" = Option<String>, Query, description = "RISON-encoded job params")
    ),
    request_body(content = GenerateBody, description = "Optional body carrying jobParams"),
    responses(
        (status = 200, description = "Report enqueued", body = GenerateResponse),
        (status = 400, description = "Invalid job params or export type", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 403, description = "License or role does not allow reporting", body = crate::error::ErrorResponse),
        (status = 500, description = "Report could not be stored", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn generate_report(
    caller: ReportingUser,
    core: web::Data<ReportingCore>,
    path: web::Path<String>,
    query: web::Query<GenerateQuery>,
    body: Option<web::Json<GenerateBody>>,
) -> AppResult<HttpResponse> {
    let export_type = path.into_inner();
    let body_params = body.as_ref().and_then(|b| b.job_params.as_deref());
    let raw = select_job_params(body_params, query.job_params.as_deref())?;
    let params = parse_job_params(raw)?;

    let report = enqueue_job(&core, &export_type, params, caller.user.as_ref()).await?;

    Ok(HttpResponse::Ok().json(GenerateResponse {
        path: core.download_path(&report.id),
        job: report.to_api_json(),
    }))
}

/// Configure generate routes (mounted under both the public and internal scopes).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/generate/{export_type}").route(web::post().to(generate_report)));
}
