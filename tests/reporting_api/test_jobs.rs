//! Tests for the /api/reporting/jobs routes.

use actix_web::test;
use chrono::Utc;
use reporting_lib::models::{ReportOutput, ReportStatus};
use reporting_lib::store::ReportingStore;
use serde_json::Value;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_list_and_count_are_scoped_to_caller() {
    let (app, _) = secured_app().await;
    let first = generate_as(&app, Some(ELASTIC_KEY), "printablePdf", PDF_JOB_PARAMS).await;
    let second = generate_as(&app, Some(ELASTIC_KEY), "PNG", PNG_JOB_PARAMS).await;
    generate_as(&app, Some(KIBANA_KEY), "PNG", PNG_JOB_PARAMS).await;

    let req = test::TestRequest::get()
        .uri("/api/reporting/jobs/list?page=0&size=10")
        .insert_header(("X-API-Key", ELASTIC_KEY))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|job| job["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/reporting/jobs/list?ids={}", first))
        .insert_header(("X-API-Key", ELASTIC_KEY))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/reporting/jobs/count")
        .insert_header(("X-API-Key", ELASTIC_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"2");
}

#[actix_rt::test]
async fn test_info_hides_other_users_reports() {
    let (app, _) = secured_app().await;
    let id = generate_as(&app, Some(ELASTIC_KEY), "printablePdf", PDF_JOB_PARAMS).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/reporting/jobs/info/{}", id))
        .insert_header(("X-API-Key", ELASTIC_KEY))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], id.as_str());
    assert!(body["payload"].get("headers").is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/api/reporting/jobs/info/{}", id))
        .insert_header(("X-API-Key", KIBANA_KEY))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], format!("Report {} not found", id));
}

#[actix_rt::test]
async fn test_download_pending_report_asks_to_retry() {
    let (app, _) = anonymous_app().await;
    let id = generate_as(&app, None, "printablePdf", PDF_JOB_PARAMS).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/reporting/jobs/download/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 503);
    assert_eq!(
        resp.headers().get("retry-after").unwrap().to_str().unwrap(),
        "30"
    );
}

#[actix_rt::test]
async fn test_download_completed_report() {
    let (app, store) = anonymous_app().await;
    let id = generate_as(&app, None, "printablePdf", PDF_JOB_PARAMS).await;

    let mut report = store.get_report(&id).await.unwrap().unwrap();
    report.status = ReportStatus::Completed;
    report.completed_at = Some(Utc::now());
    report.output = Some(ReportOutput {
        content_type: Some("application/pdf".to_string()),
        size: Some(8),
        content: Some("%PDF-1.7".to_string()),
        error: None,
    });
    store.put_report(report).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/reporting/jobs/download/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "application/pdf"
    );
    assert_eq!(
        resp.headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap(),
        "inline; filename=\"My Canvas Workpad.pdf\""
    );
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"%PDF-1.7");

    // Content never leaks into the job JSON
    let req = test::TestRequest::get()
        .uri(&format!("/api/reporting/jobs/info/{}", id))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["status"], "completed");
    assert_eq!(body["output"]["size"], 8);
    assert_eq!(body["output"].get("content"), None::<&Value>);
}

#[actix_rt::test]
async fn test_download_failed_report() {
    let (app, store) = anonymous_app().await;
    let id = generate_as(&app, None, "PNG", PNG_JOB_PARAMS).await;

    let mut report = store.get_report(&id).await.unwrap().unwrap();
    report.status = ReportStatus::Failed;
    report.output = Some(ReportOutput {
        error: Some("browser crashed".to_string()),
        ..Default::default()
    });
    store.put_report(report).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/reporting/jobs/download/{}", id))
        .to_request();
    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, 500);
    assert_eq!(body["message"], "Reporting generation failed: browser crashed");
}

#[actix_rt::test]
async fn test_download_missing_report() {
    let (app, _) = anonymous_app().await;

    let req = test::TestRequest::get()
        .uri("/api/reporting/jobs/download/does-not-exist")
        .to_request();
    let (status, _) = call_json(&app, req).await;

    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_delete_report() {
    let (app, store) = secured_app().await;
    let id = generate_as(&app, Some(ELASTIC_KEY), "PNG", PNG_JOB_PARAMS).await;

    // Another user cannot delete it
    let req = test::TestRequest::delete()
        .uri(&format!("/api/reporting/jobs/delete/{}", id))
        .insert_header(("X-API-Key", KIBANA_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 404);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/reporting/jobs/delete/{}", id))
        .insert_header(("X-API-Key", ELASTIC_KEY))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["deleted"], true);
    assert!(store.get_report(&id).await.unwrap().is_none());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/reporting/jobs/delete/{}", id))
        .insert_header(("X-API-Key", ELASTIC_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 404);
}
