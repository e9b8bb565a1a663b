//! API endpoint modules.

pub mod generate;
pub mod health;
pub mod jobs;
pub mod openapi;

pub use generate::configure_routes as configure_generate_routes;
pub use health::configure_health_routes;
pub use jobs::configure_routes as configure_job_routes;
pub use openapi::{ApiDoc, configure_docs_routes};

use actix_web::web;

use crate::error::AppError;

/// Public reporting scope.
pub const PUBLIC_SCOPE: &str = "/api/reporting";

/// Internal reporting scope; only generation is exposed there.
pub const INTERNAL_SCOPE: &str = "/internal/reporting";

/// Query strings that fail to parse get the same JSON 400 as other bad requests.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("invalid query: {}", err)).into())
}

/// Mount every reporting route under its scope.
pub fn configure_reporting(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(PUBLIC_SCOPE)
            .app_data(query_config())
            .configure(configure_health_routes)
            .configure(configure_docs_routes)
            .configure(configure_generate_routes)
            .configure(configure_job_routes),
    )
    .service(
        web::scope(INTERNAL_SCOPE)
            .app_data(query_config())
            .configure(configure_generate_routes),
    );
}
