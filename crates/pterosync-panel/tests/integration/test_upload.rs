//! Integration tests for multipart uploads to signed destinations

use std::io::Write;
use std::time::Duration;

use pterosync_core::domain::{LocalFile, RemotePath, SyncError};
use pterosync_core::ports::{IPanelApi, UploadDestination};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pterosync_panel::{PanelClient, PanelProvider};

use crate::common;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create test file");
    file.write_all(content).expect("write test file");
    path
}

fn destination(server: &MockServer, directory: &str) -> UploadDestination {
    UploadDestination {
        url: format!("{}/upload/file?token=tok123", server.uri()),
        directory: RemotePath::new(directory).unwrap(),
    }
}

async fn mount_upload_target(server: &MockServer, directory: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .and(query_param("token", "tok123"))
        .and(query_param("directory", directory))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_upload_file_streams_multipart() {
    let (server, provider) = common::setup_panel_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let local = write_file(&dir, "server.cfg", b"hostname \"Retake\"\n");

    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .and(query_param("token", "tok123"))
        .and(query_param("directory", "/cfg"))
        .and(body_string_contains("name=\"files\""))
        .and(body_string_contains("filename=\"server.cfg\""))
        .and(body_string_contains("hostname \"Retake\""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let file = LocalFile::new(local, RemotePath::new("cfg/server.cfg").unwrap()).unwrap();
    provider
        .upload_file(&destination(&server, "cfg"), &file)
        .await
        .expect("upload succeeds");
}

#[tokio::test]
async fn test_upload_file_omits_api_key() {
    let (server, provider) = common::setup_panel_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let local = write_file(&dir, "a.txt", b"x");
    mount_upload_target(&server, "/", 200).await;

    let file = LocalFile::new(local, RemotePath::new("a.txt").unwrap()).unwrap();
    provider
        .upload_file(&destination(&server, ""), &file)
        .await
        .expect("upload succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_upload_file_no_content_is_success() {
    let (server, provider) = common::setup_panel_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let local = write_file(&dir, "empty.txt", b"");
    mount_upload_target(&server, "/maps", 204).await;

    let file = LocalFile::new(local, RemotePath::new("maps/empty.txt").unwrap()).unwrap();
    provider
        .upload_file(&destination(&server, "maps"), &file)
        .await
        .expect("204 is success");
}

#[tokio::test]
async fn test_upload_file_rejected() {
    let (server, provider) = common::setup_panel_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let local = write_file(&dir, "big.vpk", b"payload");
    mount_upload_target(&server, "/maps", 413).await;

    let file = LocalFile::new(local, RemotePath::new("maps/big.vpk").unwrap()).unwrap();
    let err = provider
        .upload_file(&destination(&server, "maps"), &file)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(413));
}

#[tokio::test]
async fn test_upload_missing_local_file() {
    let (server, provider) = common::setup_panel_mock().await;
    let dir = tempfile::tempdir().unwrap();
    mount_upload_target(&server, "/", 200).await;

    let file = LocalFile::new(
        dir.path().join("vanished.txt"),
        RemotePath::new("vanished.txt").unwrap(),
    )
    .unwrap();
    let err = provider
        .upload_file(&destination(&server, ""), &file)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::LocalIo { .. }), "got {err:?}");
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_slow_upload_outlives_request_timeout() {
    let server = MockServer::start().await;
    let client = PanelClient::with_timeout(server.uri(), common::API_KEY, Duration::from_millis(200))
        .unwrap()
        .with_upload_timeout(Duration::from_secs(5));
    let provider = PanelProvider::new(client);
    let dir = tempfile::tempdir().unwrap();
    let local = write_file(&dir, "de_dust2.vpk", &vec![7u8; 256 * 1024]);

    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(800)))
        .expect(1)
        .mount(&server)
        .await;

    let file = LocalFile::new(local, RemotePath::new("maps/de_dust2.vpk").unwrap()).unwrap();
    provider
        .upload_file(&destination(&server, "maps"), &file)
        .await
        .expect("transfer longer than the request timeout succeeds");
}

#[tokio::test]
async fn test_upload_timeout_is_transient() {
    let server = MockServer::start().await;
    let client = PanelClient::with_timeout(server.uri(), common::API_KEY, Duration::from_millis(100))
        .unwrap()
        .with_upload_timeout(Duration::from_millis(300));
    let provider = PanelProvider::new(client);
    let dir = tempfile::tempdir().unwrap();
    let local = write_file(&dir, "a.txt", b"x");

    Mock::given(method("POST"))
        .and(path("/upload/file"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let file = LocalFile::new(local, RemotePath::new("a.txt").unwrap()).unwrap();
    let err = provider
        .upload_file(&destination(&server, ""), &file)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::NetworkTimeout(_)), "got {err:?}");
    assert!(err.is_transient());
}
