//! Health check endpoint.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::ReportingCore;

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    version: String,
    /// Number of registered export types.
    export_types: usize,
    timestamp: String,
}

/// Health check endpoint.
///
/// Returns 200 if the service is running.
#[utoipa::path(
    get,
    path = "/api/reporting/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health(core: web::Data<ReportingCore>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        version: core.settings().version.clone(),
        export_types: core.export_types().len(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
