//! Tests for POST /api/reporting/generate/{exportType}.

use std::sync::Arc;

use actix_web::test;
use reporting_lib::core::ReportingSettings;
use reporting_lib::models::{License, LicenseStatus, LicenseType};
use reporting_lib::store::ReportingStore;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_missing_job_params_rejected() {
    let (app, store) = anonymous_app().await;

    let req = test::TestRequest::post()
        .uri("/api/reporting/generate/printablePdf")
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        "A jobParams RISON string is required in the querystring or POST body"
    );

    let req = test::TestRequest::post()
        .uri("/api/reporting/generate/printablePdf")
        .set_json(json!({}))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 400);

    assert_eq!(store.count_reports(None).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_invalid_rison_in_query_rejected() {
    let (app, _) = anonymous_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", "foo:"))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert_eq!(body["message"], "invalid rison: foo:");
}

#[actix_rt::test]
async fn test_repeated_job_params_query_rejected() {
    let (app, store) = anonymous_app().await;

    for prefix in ["/api/reporting", "/internal/reporting"] {
        let req = test::TestRequest::post()
            .uri(&format!(
                "{}/generate/PNG?jobParams=(title:a)&jobParams=(title:b)",
                prefix
            ))
            .to_request();
        let (status, body) = call_json(&app, req).await;

        assert_eq!(status, 400);
        assert_eq!(body["error"], "BAD_REQUEST");
        assert!(body["message"].as_str().unwrap().starts_with("invalid query:"));
    }
    assert_eq!(store.count_reports(None).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_invalid_rison_in_body_rejected() {
    let (app, _) = anonymous_app().await;

    let req = test::TestRequest::post()
        .uri("/api/reporting/generate/printablePdf")
        .set_json(json!({ "jobParams": "foo:" }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 400);
    assert_eq!(body["message"], "invalid rison: foo:");
}

#[actix_rt::test]
async fn test_deeply_nested_job_params_rejected() {
    let (app, store) = anonymous_app().await;

    // Stays under the default 32 KB JSON body limit of the test app.
    let levels = 10_000;
    let job_params = format!("(title:{}1{})", "!(".repeat(levels), ")".repeat(levels));
    let req = test::TestRequest::post()
        .uri("/api/reporting/generate/printablePdf")
        .set_json(json!({ "jobParams": job_params }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid rison: (title:!(!(")
    );
    assert_eq!(store.count_reports(None).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_unknown_export_type_rejected() {
    let (app, store) = anonymous_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("TonyHawksProSkater2", PDF_JOB_PARAMS))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 400);
    assert_eq!(body["message"], "Invalid export-type of TonyHawksProSkater2");
    assert_eq!(store.count_reports(None).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_invalid_timezone_rejected() {
    let (app, store) = anonymous_app().await;
    let params = PDF_JOB_PARAMS.replace("America/New_York", "America/Amsterdam");

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", &params))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 400);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("America/Amsterdam"),
        "unexpected message: {}",
        body
    );
    assert_eq!(store.count_reports(None).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_absolute_url_rejected() {
    let (app, _) = anonymous_app().await;
    let params = "(objectType:dashboard,relativeUrls:!('https://evil.example/app'),title:x)";

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", params))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 400);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Found invalid URL(s), all URLs must be relative")
    );
}

#[actix_rt::test]
async fn test_store_failure_returns_500() {
    let app = create_test_app(
        test_core(Arc::new(FailingStore)),
        reporting_lib::auth::Credentials::disabled(),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", PDF_JOB_PARAMS))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "DATABASE_ERROR");
    // Store details stay server-side
    assert!(!body["message"].as_str().unwrap().contains("connection reset"));
}

#[actix_rt::test]
async fn test_valid_pdf_request_enqueues_report() {
    let (app, store) = anonymous_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", PDF_JOB_PARAMS))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200, "unexpected body: {}", body);
    let job = &body["job"];
    let id = job["id"].as_str().unwrap();
    assert_eq!(job["status"], "pending");
    assert_eq!(job["attempts"], 0);
    assert_eq!(job["jobtype"], "printable_pdf");
    assert_eq!(job["created_by"], json!(false));
    assert_eq!(job["meta"]["objectType"], "canvas workpad");
    assert_eq!(job["meta"]["layout"], "preserve_layout");
    assert_eq!(job["payload"]["title"], "My Canvas Workpad");
    assert_eq!(job["payload"]["browserTimezone"], "America/New_York");
    assert!(job["index"].as_str().unwrap().starts_with(".reporting-"));
    assert_eq!(
        body["path"],
        format!("/api/reporting/jobs/download/{}", id)
    );

    let stored = store.get_report(id).await.unwrap().unwrap();
    assert_eq!(stored.jobtype, "printable_pdf");
    assert!(stored.created_by.is_none());
}

#[actix_rt::test]
async fn test_unmodelled_job_params_reach_payload() {
    let (app, store) = anonymous_app().await;

    let req = test::TestRequest::post()
        .uri("/api/reporting/generate/printablePdf")
        .set_json(json!({
            "jobParams": "(objectType:dashboard,relativeUrls:!('/app/a'),spaceId:marketing,title:T)"
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200, "unexpected body: {}", body);
    let payload = &body["job"]["payload"];
    assert_eq!(payload["spaceId"], "marketing");
    assert_eq!(payload["relativeUrls"], json!(["/app/a"]));
    assert_eq!(payload["objects"], json!([{ "relativeUrl": "/app/a" }]));
    assert_eq!(payload["title"], "T");

    let id = body["job"]["id"].as_str().unwrap();
    let stored = store.get_report(id).await.unwrap().unwrap();
    assert_eq!(stored.payload["spaceId"], "marketing");
}

#[actix_rt::test]
async fn test_body_params_take_precedence_over_query() {
    let (app, _) = anonymous_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("printablePdf", "foo:"))
        .set_json(json!({ "jobParams": PDF_JOB_PARAMS }))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200, "unexpected body: {}", body);
    assert_eq!(body["job"]["jobtype"], "printable_pdf");
}

#[actix_rt::test]
async fn test_png_and_csv_export_types() {
    let (app, _) = anonymous_app().await;

    let req = test::TestRequest::post()
        .uri(&generate_uri("PNG", PNG_JOB_PARAMS))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "unexpected body: {}", body);
    assert_eq!(body["job"]["jobtype"], "PNG");
    assert_eq!(body["job"]["payload"]["relativeUrl"], "/app/visualize#/edit/1");

    let csv = "(columns:!('@timestamp',message),objectType:search,searchSource:(index:'logs-*',query:(language:kuery,query:'')),title:Logs)";
    let req = test::TestRequest::post()
        .uri(&generate_uri("csv_searchsource", csv))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "unexpected body: {}", body);
    assert_eq!(body["job"]["jobtype"], "csv_searchsource");
}

#[actix_rt::test]
async fn test_internal_route_and_base_path() {
    let store = Arc::new(reporting_lib::store::MemoryReportStore::default());
    let settings = ReportingSettings {
        base_path: "/kbn".to_string(),
        ..Default::default()
    };
    let app = create_test_app(
        core_with(store, settings, Some(License::active(LicenseType::Trial))),
        reporting_lib::auth::Credentials::disabled(),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!(
            "/internal/reporting/generate/PNG?jobParams={}",
            urlencoding::encode(PNG_JOB_PARAMS)
        ))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 200, "unexpected body: {}", body);
    let id = body["job"]["id"].as_str().unwrap();
    assert_eq!(body["path"], format!("/kbn/api/reporting/jobs/download/{}", id));
}

#[actix_rt::test]
async fn test_license_restrictions() {
    let cases = [
        (
            Some(License::active(LicenseType::Basic)),
            "Your basic license does not support PDF Reporting. Please upgrade your license.",
        ),
        (
            Some(License {
                license_type: LicenseType::Gold,
                status: LicenseStatus::Expired,
            }),
            "You cannot use Reporting because your gold license has expired.",
        ),
        (
            None,
            "You cannot use Reporting because license information is not available at this time.",
        ),
    ];

    for (license, message) in cases {
        let store = Arc::new(reporting_lib::store::MemoryReportStore::default());
        let app = create_test_app(
            core_with(store.clone(), ReportingSettings::default(), license),
            reporting_lib::auth::Credentials::disabled(),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&generate_uri("printablePdf", PDF_JOB_PARAMS))
            .to_request();
        let (status, body) = call_json(&app, req).await;

        assert_eq!(status, 403);
        assert_eq!(body["message"], message);
        assert_eq!(store.count_reports(None).await.unwrap(), 0);
    }
}

#[actix_rt::test]
async fn test_basic_license_allows_csv() {
    let store = Arc::new(reporting_lib::store::MemoryReportStore::default());
    let app = create_test_app(
        core_with(
            store,
            ReportingSettings::default(),
            Some(License::active(LicenseType::Basic)),
        ),
        reporting_lib::auth::Credentials::disabled(),
    )
    .await;

    let csv = "(objectType:search,searchSource:(index:'logs-*'),title:Logs)";
    let req = test::TestRequest::post()
        .uri(&generate_uri("csv_searchsource", csv))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 200);
}
