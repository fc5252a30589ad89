//! End-to-end ingestion flow against a mocked platform
//!
//! authenticate → upload slot → upload → poll, wired exactly as the binary
//! wires it.

mod support;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use scanbridge_core::{ActivityPoller, IngestionWorkflow, PollPolicy, UploadOrchestrator};
use scanbridge_domain::{
    AuthError, Config, IngestionReport, PollError, ScanBridgeError, UploadError,
};
use scanbridge_infra::{GraphQlClient, HttpClient, PresignedUploader};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use support::*;

async fn run(config: &Config, file: &Path) -> Result<IngestionReport, ScanBridgeError> {
    let mut client = GraphQlClient::new(config)?;
    client.authenticate(&config.credentials()).await?;
    let client = Arc::new(client);

    let uploader = Arc::new(PresignedUploader::new(HttpClient::from_settings(&config.retry)?));
    let workflow = IngestionWorkflow::new(
        UploadOrchestrator::new(client.clone(), uploader),
        ActivityPoller::new(client, PollPolicy::from(config.poll)),
    );

    workflow.run(file).await
}

async fn system_activity_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| String::from_utf8_lossy(&request.body).contains("SystemActivity"))
        .count()
}

#[tokio::test]
async fn uploads_then_polls_through_visibility_race() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_slot(&server).await;
    mount_storage(&server, 200).await;

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("SystemActivity"))
        .respond_with(move |_req: &Request| {
            if calls_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(200).set_body_json(activity_not_found())
            } else {
                ResponseTemplate::new(200).set_body_json(activity_found())
            }
        })
        .mount(&server)
        .await;

    let (_dir, file) = scan_file();
    let config = config_for(&server, &file);

    let report = run(&config, &file).await.expect("ingestion succeeds");

    assert_eq!(report.slot.id, "u1");
    assert_eq!(report.slot.system_activity_id, "a1");
    assert_eq!(report.activity.status, "IN_PROGRESS");
    assert_eq!(report.activity.file_upload_id(), Some("u1"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let uploads: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.method.as_str() == "PUT")
        .collect();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].url.path(), UPLOAD_PATH);
    assert_eq!(uploads[0].body, std::fs::read(&file).unwrap());
}

#[tokio::test]
async fn rejected_upload_never_polls() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_slot(&server).await;
    mount_storage(&server, 403).await;

    let (_dir, file) = scan_file();
    let config = config_for(&server, &file);

    let err = run(&config, &file).await.unwrap_err();

    assert!(matches!(err, ScanBridgeError::Upload(UploadError::Rejected { status: 403, .. })));
    assert_eq!(system_activity_requests(&server).await, 0);
}

#[tokio::test]
async fn poll_budget_exhaustion_reports_timeout() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_upload_slot(&server).await;
    mount_storage(&server, 200).await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("SystemActivity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_not_found()))
        .mount(&server)
        .await;

    let (_dir, file) = scan_file();
    let mut config = config_for(&server, &file);
    config.poll.max_attempts = 3;

    let err = run(&config, &file).await.unwrap_err();

    assert_eq!(err.label(), "poll_timeout");
    match err {
        ScanBridgeError::Poll(PollError::Timeout { attempts, last_error }) => {
            assert_eq!(attempts, 3);
            assert!(last_error.unwrap().contains("Resource not found"));
        }
        other => panic!("expected poll timeout, got {other:?}"),
    }
    assert_eq!(system_activity_requests(&server).await, 3);
}

#[tokio::test]
async fn failed_authentication_stops_before_any_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let (_dir, file) = scan_file();
    let config = config_for(&server, &file);

    let err = run(&config, &file).await.unwrap_err();

    assert_eq!(
        err,
        ScanBridgeError::Auth(AuthError::BadStatus { status: 401, body: "invalid_client".into() })
    );
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn throttled_slot_request_is_retried_transparently() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_storage(&server, 200).await;

    let slot_calls = Arc::new(AtomicUsize::new(0));
    let slot_calls_clone = slot_calls.clone();
    let upload_url = format!("{}{}", server.uri(), UPLOAD_PATH);
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("RequestSecurityScanUpload"))
        .respond_with(move |_req: &Request| {
            if slot_calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429)
            } else {
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "data": {"requestSecurityScanUpload": {"upload": {
                        "id": "u1", "url": upload_url.clone(), "systemActivityId": "a1"
                    }}}
                }))
            }
        })
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("SystemActivity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_found()))
        .mount(&server)
        .await;

    let (_dir, file) = scan_file();
    let config = config_for(&server, &file);

    let report = run(&config, &file).await.expect("ingestion succeeds");

    assert_eq!(report.slot.id, "u1");
    assert_eq!(slot_calls.load(Ordering::SeqCst), 2);
}
