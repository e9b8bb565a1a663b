//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, get, web};
use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reporting Server",
        version = "0.1.0",
        description = "Queues PDF, PNG and CSV report jobs from RISON-encoded job parameters"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        api::health::health,
        api::generate::generate_report,
        api::jobs::list_jobs,
        api::jobs::count_jobs,
        api::jobs::job_info,
        api::jobs::download_job,
        api::jobs::delete_job,
    ),
    components(
        schemas(
            error::ErrorResponse,
            api::health::HealthResponse,
            api::generate::GenerateBody,
            api::jobs::DeleteReportResponse,
            models::GenerateResponse,
            models::ReportApiJson,
            models::ReportMeta,
            models::ReportOutput,
            models::ReportStatus,
            models::ListJobsParams,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Reporting", description = "Report generation"),
        (name = "Jobs", description = "Inspect, download and delete reports")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add API key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-API-Key"),
                    ),
                ),
            );
        }
    }
}

/// Serve the OpenAPI document.
#[get("/docs/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure documentation routes.
pub fn configure_docs_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}
