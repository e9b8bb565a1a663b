//! Authentication tests for the reporting routes.

use actix_web::test;
use reporting_lib::store::ReportingStore;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_missing_key_rejected() {
    let (app, store) = secured_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", PDF_JOB_PARAMS))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 401);
    assert_eq!(body["message"], "Sorry, you aren't authenticated");
    assert_eq!(store.count_reports(Some("elastic")).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_unknown_key_rejected() {
    let (app, _) = secured_app().await;

    let req = test::TestRequest::get()
        .uri("/api/reporting/jobs/list")
        .insert_header(("X-API-Key", "rpt_not_a_real_key"))
        .to_request();
    let (status, _) = call_json(&app, req).await;

    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_viewer_forbidden() {
    let (app, _) = secured_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", PDF_JOB_PARAMS))
        .insert_header(("X-API-Key", VIEWER_KEY))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 403);
    assert_eq!(body["message"], "Sorry, you don't have access to Reporting");
}

#[actix_rt::test]
async fn test_authenticated_report_records_creator() {
    let (app, store) = secured_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", PDF_JOB_PARAMS))
        .insert_header(("X-API-Key", ELASTIC_KEY))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200, "unexpected body: {}", body);
    assert_eq!(body["job"]["created_by"], "elastic");
    assert_eq!(store.count_reports(Some("elastic")).await.unwrap(), 1);
}

#[actix_rt::test]
async fn test_admin_key_authenticates_as_admin() {
    let (app, _) = secured_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("PNG", PNG_JOB_PARAMS))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200, "unexpected body: {}", body);
    assert_eq!(body["job"]["created_by"], "admin");
}

#[actix_rt::test]
async fn test_health_needs_no_key() {
    let (app, _) = secured_app().await;

    let req = test::TestRequest::get()
        .uri("/api/reporting/health")
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["export_types"], 3);
}

#[actix_rt::test]
async fn test_openapi_document_served() {
    let (app, _) = secured_app().await;

    let req = test::TestRequest::get()
        .uri("/api/reporting/docs/openapi.json")
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200);
    assert!(body["paths"]["/api/reporting/generate/{export_type}"].is_object());
}
