//! HTTP API tests driving the router directly.

#![cfg(feature = "http-server")]

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use capacity_planner::http::{create_router, AppState};
use capacity_planner::jira::{InMemoryIssueSource, Issue};
use capacity_planner::services::{BaselineStore, ProbeOptions};

mod support;

use support::{baseline_workbook_bytes, IterationHours};

const BOUNDARY: &str = "capacity-test-boundary";

fn app(dir: &Path) -> Router {
    let source = InMemoryIssueSource::new()
        .with_issues(
            "26_04_01",
            vec![Issue::new("CAP-1").assigned_to("Ada").with_remaining(30_500)],
        )
        .with_issues(
            "26_04_02",
            vec![Issue::new("CAP-2").assigned_to("Ada").with_remaining(3600)],
        );

    create_router(AppState::new(
        Arc::new(source),
        BaselineStore::new(dir),
        ProbeOptions::default(),
    ))
}

fn multipart_body(pi: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(pi) = pi {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"pi\"\r\n\r\n{}\r\n",
                BOUNDARY, pi
            )
            .as_bytes(),
        );
    }
    if let Some((name, contents)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/baselines")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn workbook() -> Vec<u8> {
    baseline_workbook_bytes(
        &["Ada"],
        &[
            IterationHours { label: "ITE_2026_04_01", hours: &[8.0] },
            IterationHours { label: "ITE_2026_04_02", hours: &[8.0] },
        ],
    )
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path()).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["issueSource"].as_str().unwrap().starts_with("in-memory"));
}

#[tokio::test]
async fn test_report_without_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path()).oneshot(get("/v1/capacity/26_04")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["pi"], "26_04");
    assert_eq!(body["iterations"], serde_json::json!(["26_04_01", "26_04_02"]));
    assert!(body["baselineCapacity"].is_null());
    assert_eq!(body["members"][0]["capacity"]["26_04_01"], 30_500);
    assert_eq!(body["members"][0]["allocation"]["26_04_01"]["baseline"], 288_000);
    assert_eq!(body["probe"]["stopReason"], "exhausted");
}

#[tokio::test]
async fn test_invalid_pi_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(dir.path())
        .oneshot(get("/v1/capacity/26.04"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_upload_rejects_non_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let request = upload_request(multipart_body(Some("26_04"), Some(("plan.txt", b"hello"))));

    let response = app(dir.path()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_UPLOAD");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_requires_pi_and_file() {
    let dir = tempfile::tempdir().unwrap();

    let no_pi = upload_request(multipart_body(None, Some(("plan.xlsx", b"data"))));
    let response = app(dir.path()).oneshot(no_pi).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let no_file = upload_request(multipart_body(Some("26_04"), None));
    let response = app(dir.path()).oneshot(no_file).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_then_report_uses_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let contents = workbook();

    let response = app(dir.path())
        .oneshot(upload_request(multipart_body(
            Some("26_04"),
            Some(("plan.xlsx", &contents)),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let stored = json_body(response).await;
    assert_eq!(stored["filename"], "PI_CAPA_2026_04.xlsx");
    assert!(dir.path().join("PI_CAPA_2026_04.xlsx").is_file());

    let report = json_body(
        app(dir.path())
            .oneshot(get("/v1/capacity/26_04"))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(report["baselineCapacity"]["source"], "PI_CAPA_2026_04.xlsx");
    let sprint_1 = &report["members"][0]["allocation"]["26_04_01"];
    assert_eq!(sprint_1["baseline"], 28_800);
    assert_eq!(sprint_1["band"], "red");
    assert_eq!(sprint_1["defaulted"], false);
    assert_eq!(report["members"][0]["allocation"]["26_04_02"]["band"], "normal");
}

#[tokio::test]
async fn test_get_baseline() {
    let dir = tempfile::tempdir().unwrap();

    let response = app(dir.path()).oneshot(get("/v1/baselines/26_04")).await.unwrap();
    let missing = json_body(response).await;
    assert!(missing.is_null());

    std::fs::write(dir.path().join("PI_CAPA_2026_04.xlsx"), workbook()).unwrap();
    let response = app(dir.path()).oneshot(get("/v1/baselines/26_04")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let baseline = json_body(response).await;
    assert_eq!(baseline["members"], serde_json::json!(["Ada"]));
    assert_eq!(baseline["capacity"]["Ada"]["26_04_02"], 28_800);
}
