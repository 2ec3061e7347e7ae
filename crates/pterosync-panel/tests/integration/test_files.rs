//! Integration tests for the file-management endpoints
//!
//! Covers directory listing, folder creation and signed upload URL requests
//! through the [`IPanelApi`] adapter.

use std::time::Duration;

use pterosync_core::domain::{RemotePath, SyncError};
use pterosync_core::ports::{CreateFolderOutcome, DirectoryEntry, IPanelApi};
use pterosync_panel::{PanelClient, PanelProvider};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

// ============================================================================
// list_directory
// ============================================================================

#[tokio::test]
async fn test_list_directory_maps_entries() {
    let (server, provider) = common::setup_panel_mock().await;
    common::mount_listing(&server, "/", &[("cfg", false), ("server.cfg", true)]).await;

    let entries = provider
        .list_directory(&common::test_target(), &RemotePath::root())
        .await
        .expect("listing succeeds");

    assert_eq!(
        entries,
        vec![
            DirectoryEntry {
                name: "cfg".to_string(),
                is_directory: true,
            },
            DirectoryEntry {
                name: "server.cfg".to_string(),
                is_directory: false,
            },
        ]
    );
}

#[tokio::test]
async fn test_list_directory_sends_credentials() {
    let (server, provider) = common::setup_panel_mock().await;

    Mock::given(method("GET"))
        .and(path(common::files_endpoint("list")))
        .and(query_param("directory", "/cfg/sub"))
        .and(header("authorization", format!("Bearer {}", common::API_KEY).as_str()))
        .and(header("accept", "application/vnd.pterodactyl.v1+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let entries = provider
        .list_directory(&common::test_target(), &RemotePath::new("cfg/sub").unwrap())
        .await
        .expect("listing succeeds");

    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_list_directory_not_found_is_status_error() {
    let (server, provider) = common::setup_panel_mock().await;

    Mock::given(method("GET"))
        .and(path(common::files_endpoint("list")))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = provider
        .list_directory(&common::test_target(), &RemotePath::new("missing").unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_list_directory_non_json_is_malformed() {
    let (server, provider) = common::setup_panel_mock().await;

    Mock::given(method("GET"))
        .and(path(common::files_endpoint("list")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = provider
        .list_directory(&common::test_target(), &RemotePath::root())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::MalformedResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_list_directory_timeout_is_transient() {
    let server = MockServer::start().await;
    let client = PanelClient::with_timeout(server.uri(), common::API_KEY, Duration::from_millis(100))
        .expect("client builds");
    let provider = PanelProvider::new(client);

    Mock::given(method("GET"))
        .and(path(common::files_endpoint("list")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = provider
        .list_directory(&common::test_target(), &RemotePath::root())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::NetworkTimeout(_)), "got {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unreachable_panel_is_network_error() {
    // Nothing listens on port 1
    let client = PanelClient::new("http://127.0.0.1:1", common::API_KEY).expect("client builds");
    let provider = PanelProvider::new(client);

    let err = provider
        .list_directory(&common::test_target(), &RemotePath::root())
        .await
        .unwrap_err();

    assert!(err.is_transient(), "got {err:?}");
}

// ============================================================================
// create_folder
// ============================================================================

#[tokio::test]
async fn test_create_folder_created() {
    let (server, provider) = common::setup_panel_mock().await;

    Mock::given(method("POST"))
        .and(path(common::files_endpoint("create-folder")))
        .and(body_json(serde_json::json!({"name": "sub", "root": "/cfg"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = provider
        .create_folder(&common::test_target(), &RemotePath::new("cfg").unwrap(), "sub")
        .await
        .expect("create succeeds");

    assert_eq!(outcome, CreateFolderOutcome::Created);
}

#[tokio::test]
async fn test_create_folder_at_root_uses_slash() {
    let (server, provider) = common::setup_panel_mock().await;

    Mock::given(method("POST"))
        .and(path(common::files_endpoint("create-folder")))
        .and(body_json(serde_json::json!({"name": "cfg", "root": "/"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = provider
        .create_folder(&common::test_target(), &RemotePath::root(), "cfg")
        .await
        .expect("create succeeds");

    assert_eq!(outcome, CreateFolderOutcome::Created);
}

#[tokio::test]
async fn test_create_folder_already_exists() {
    let (server, provider) = common::setup_panel_mock().await;

    Mock::given(method("POST"))
        .and(path(common::files_endpoint("create-folder")))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errors": [{"code": "BadRequestHttpException", "detail": "already exists"}]
        })))
        .mount(&server)
        .await;

    let outcome = provider
        .create_folder(&common::test_target(), &RemotePath::root(), "cfg")
        .await
        .expect("already-exists is not an error");

    assert_eq!(outcome, CreateFolderOutcome::AlreadyExists);
}

#[tokio::test]
async fn test_create_folder_server_error() {
    let (server, provider) = common::setup_panel_mock().await;

    Mock::given(method("POST"))
        .and(path(common::files_endpoint("create-folder")))
        .respond_with(ResponseTemplate::new(500).set_body_string("daemon offline"))
        .mount(&server)
        .await;

    let err = provider
        .create_folder(&common::test_target(), &RemotePath::root(), "cfg")
        .await
        .unwrap_err();

    match err {
        SyncError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "daemon offline");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

// ============================================================================
// request_upload_url
// ============================================================================

#[tokio::test]
async fn test_request_upload_url() {
    let (server, provider) = common::setup_panel_mock().await;
    common::mount_upload_url(&server, "/cfg/sub", "tok123").await;

    let directory = RemotePath::new("cfg/sub").unwrap();
    let destination = provider
        .request_upload_url(&common::test_target(), &directory)
        .await
        .expect("upload url");

    assert_eq!(
        destination.url,
        format!("{}/upload/file?token=tok123", server.uri())
    );
    assert_eq!(destination.directory, directory);
}

#[tokio::test]
async fn test_request_upload_url_forbidden() {
    let (server, provider) = common::setup_panel_mock().await;

    Mock::given(method("GET"))
        .and(path(common::files_endpoint("upload")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = provider
        .request_upload_url(&common::test_target(), &RemotePath::root())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
}
