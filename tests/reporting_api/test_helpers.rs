//! Shared test helpers for the reporting API tests.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};
use async_trait::async_trait;
use reporting_lib::api;
use reporting_lib::auth::{AdminKey, Credentials};
use reporting_lib::core::{ReportingCore, ReportingSettings};
use reporting_lib::export_types::ExportTypesRegistry;
use reporting_lib::models::{License, LicenseType, Report};
use reporting_lib::services::api_key::{hash_key, parse_credentials};
use reporting_lib::store::{ListReportsQuery, MemoryReportStore, ReportingStore, StoreError};
use serde_json::Value;

/// Admin key used in tests.
pub const TEST_ADMIN_KEY: &str = "test-admin-key";
/// Contributor key for user `elastic`.
pub const ELASTIC_KEY: &str = "rpt_elastic_test_key";
/// Contributor key for user `kibana`.
pub const KIBANA_KEY: &str = "rpt_kibana_test_key";
/// Viewer key for user `reader`.
pub const VIEWER_KEY: &str = "rpt_reader_test_key";

/// RISON job params for a valid printable PDF request.
pub const PDF_JOB_PARAMS: &str = "(browserTimezone:America/New_York,layout:(dimensions:(height:720,width:1080),id:preserve_layout),objectType:'canvas workpad',relativeUrls:!('/app/canvas#/export/workpad/pdf/workpad-1/page/1'),title:'My Canvas Workpad')";

/// RISON job params for a valid PNG request.
pub const PNG_JOB_PARAMS: &str =
    "(browserTimezone:UTC,objectType:visualization,relativeUrl:'/app/visualize#/edit/1',title:Traffic)";

/// Store double whose writes always fail.
pub struct FailingStore;

#[async_trait]
impl ReportingStore for FailingStore {
    async fn add_report(&self, _report: Report) -> Result<Report, StoreError> {
        Err(StoreError::Database("connection reset by peer".to_string()))
    }

    async fn get_report(&self, _id: &str) -> Result<Option<Report>, StoreError> {
        Err(StoreError::Database("connection reset by peer".to_string()))
    }

    async fn list_reports(&self, _query: &ListReportsQuery) -> Result<Vec<Report>, StoreError> {
        Err(StoreError::Database("connection reset by peer".to_string()))
    }

    async fn count_reports(&self, _user: Option<&str>) -> Result<u64, StoreError> {
        Err(StoreError::Database("connection reset by peer".to_string()))
    }

    async fn delete_report(&self, _id: &str) -> Result<bool, StoreError> {
        Err(StoreError::Database("connection reset by peer".to_string()))
    }
}

/// Credentials with three users and the admin key.
pub fn secured_credentials() -> Credentials {
    let spec = format!(
        "elastic:{}:contributor,kibana:{}:contributor,reader:{}:viewer",
        hash_key(ELASTIC_KEY),
        hash_key(KIBANA_KEY),
        hash_key(VIEWER_KEY)
    );
    Credentials::new(
        true,
        parse_credentials(&spec).expect("valid test credentials"),
        AdminKey::new(Some(TEST_ADMIN_KEY.to_string())),
    )
}

/// Core around `store` with a trial license.
pub fn test_core(store: Arc<dyn ReportingStore>) -> ReportingCore {
    core_with(store, ReportingSettings::default(), Some(License::active(LicenseType::Trial)))
}

pub fn core_with(
    store: Arc<dyn ReportingStore>,
    settings: ReportingSettings,
    license: Option<License>,
) -> ReportingCore {
    ReportingCore::new(settings, ExportTypesRegistry::with_defaults(), store, license)
}

/// Create a test reporting app.
pub async fn create_test_app(
    core: ReportingCore,
    credentials: Credentials,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(core))
            .app_data(web::Data::new(credentials))
            .configure(api::configure_reporting),
    )
    .await
}

/// App with security disabled over a fresh memory store.
pub async fn anonymous_app() -> (
    impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    Arc<MemoryReportStore>,
) {
    let store = Arc::new(MemoryReportStore::default());
    let app = create_test_app(test_core(store.clone()), Credentials::disabled()).await;
    (app, store)
}

/// App with API keys required over a fresh memory store.
pub async fn secured_app() -> (
    impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    Arc<MemoryReportStore>,
) {
    let store = Arc::new(MemoryReportStore::default());
    let app = create_test_app(test_core(store.clone()), secured_credentials()).await;
    (app, store)
}

/// URI of a generate request with job params in the query string.
pub fn generate_uri(export_type: &str, job_params: &str) -> String {
    format!(
        "/api/reporting/generate/{}?jobParams={}",
        export_type,
        urlencoding::encode(job_params)
    )
}

/// Send a request and return status and JSON body.
pub async fn call_json<S>(app: &S, req: actix_http::Request) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Enqueue a report as `api_key` (or anonymously) and return its id.
pub async fn generate_as<S>(app: &S, api_key: Option<&str>, export_type: &str, job_params: &str) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = test::TestRequest::post().uri(&generate_uri(export_type, job_params));
    if let Some(key) = api_key {
        req = req.insert_header(("X-API-Key", key));
    }
    let (status, body) = call_json(app, req.to_request()).await;
    assert_eq!(status, 200, "generate failed: {}", body);
    body["job"]["id"]
        .as_str()
        .expect("job id in response")
        .to_string()
}
