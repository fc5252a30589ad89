//! Shared fixtures for integration tests that talk to a mocked platform.

use std::path::{Path, PathBuf};

use scanbridge_domain::Config;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth/token";
pub const GRAPHQL_PATH: &str = "/graphql";
pub const UPLOAD_PATH: &str = "/bucket/state-current.json";

/// Configuration pointing every endpoint at `server`, with short delays.
pub fn config_for(server: &MockServer, upload_file: &Path) -> Config {
    let mut config = Config {
        client_id: "integration-client".into(),
        client_secret: "integration-secret".into(),
        auth_url: format!("{}{}", server.uri(), TOKEN_PATH),
        query_url: format!("{}{}", server.uri(), GRAPHQL_PATH),
        upload_file: upload_file.display().to_string(),
        ..Config::default()
    };
    config.retry.delay_ms = 10;
    config.poll.interval_secs = 0;
    config
}

/// Write a scan result file and keep its directory alive.
pub fn scan_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("state-current.json");
    std::fs::write(&file, r#"{"integrationId":"scanbridge","dataSources":[]}"#).expect("scan file");
    (dir, file)
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-int"})))
        .mount(server)
        .await;
}

pub async fn mount_upload_slot(server: &MockServer) {
    let upload_url = format!("{}{}", server.uri(), UPLOAD_PATH);
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("RequestSecurityScanUpload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"requestSecurityScanUpload": {"upload": {
                "id": "u1", "url": upload_url, "systemActivityId": "a1"
            }}}
        })))
        .mount(server)
        .await;
}

pub async fn mount_storage(server: &MockServer, status: u16) {
    Mock::given(method("PUT"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub fn activity_found() -> Value {
    json!({
        "data": {"systemActivity": {
            "id": "a1",
            "status": "IN_PROGRESS",
            "statusInfo": null,
            "result": {
                "dataSources": {"incoming": 1, "handled": 1},
                "findings": {"incoming": 4, "handled": 4},
                "events": {"incoming": 0, "handled": 0},
                "tags": {"incoming": 0, "handled": 0},
                "unresolvedAssets": {"count": 0, "ids": []}
            },
            "context": {"fileUploadId": "u1"}
        }}
    })
}

pub fn activity_not_found() -> Value {
    json!({"data": null, "errors": [{"message": "Resource not found"}]})
}
