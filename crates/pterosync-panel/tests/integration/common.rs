//! Shared test helpers for panel API integration tests
//!
//! Provides wiremock-based mock server setup for panel endpoints. Each helper
//! mounts the necessary mock endpoints on a running [`MockServer`].

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pterosync_core::domain::RemoteTarget;
use pterosync_panel::{PanelClient, PanelProvider};

pub const SERVER_ID: &str = "1a7ce997";
pub const API_KEY: &str = "ptlc_test_key";

/// Starts a mock server and returns it with a provider pointing at it.
pub async fn setup_panel_mock() -> (MockServer, PanelProvider) {
    let server = MockServer::start().await;
    let client = PanelClient::new(server.uri(), API_KEY).expect("client builds");
    (server, PanelProvider::new(client))
}

/// A target whose identifier matches the mounted endpoints.
pub fn test_target() -> RemoteTarget {
    RemoteTarget {
        uuid: "1a7ce997-259b-452e-8b4e-cecc464142ca".to_string(),
        identifier: SERVER_ID.to_string(),
        name: "CS2 Retake".to_string(),
        image: "docker.io/sples1/k4ryuu-cs2:latest".to_string(),
    }
}

/// Path of a file endpoint for [`SERVER_ID`].
pub fn files_endpoint(endpoint: &str) -> String {
    format!("/api/client/servers/{SERVER_ID}/files/{endpoint}")
}

/// Mounts a directory listing returning `(name, is_file)` entries.
pub async fn mount_listing(server: &MockServer, directory: &str, entries: &[(&str, bool)]) {
    let data: Vec<serde_json::Value> = entries
        .iter()
        .map(|(name, is_file)| {
            serde_json::json!({
                "object": "file_object",
                "attributes": {
                    "name": name,
                    "mode": if *is_file { "-rw-r--r--" } else { "drwxr-xr-x" },
                    "size": 0,
                    "is_file": is_file,
                    "is_symlink": false
                }
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(files_endpoint("list")))
        .and(query_param("directory", directory))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"object": "list", "data": data})),
        )
        .mount(server)
        .await;
}

/// Mounts the upload-URL endpoint for `directory`, returning a signed URL on
/// the same mock server.
pub async fn mount_upload_url(server: &MockServer, directory: &str, token: &str) {
    Mock::given(method("GET"))
        .and(path(files_endpoint("upload")))
        .and(query_param("directory", directory))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "signed_url",
            "attributes": {
                "url": format!("{}/upload/file?token={}", server.uri(), token)
            }
        })))
        .mount(server)
        .await;
}

/// Builds a server listing page.
pub fn server_page(
    servers: &[(&str, &str, &str)],
    current_page: u32,
    total_pages: u32,
) -> serde_json::Value {
    let data: Vec<serde_json::Value> = servers
        .iter()
        .map(|(identifier, name, image)| {
            serde_json::json!({
                "object": "server",
                "attributes": {
                    "server_owner": true,
                    "identifier": identifier,
                    "uuid": format!("{identifier}-0000-0000-0000-000000000000"),
                    "name": name,
                    "docker_image": image
                }
            })
        })
        .collect();

    serde_json::json!({
        "object": "list",
        "data": data,
        "meta": {
            "pagination": {
                "total": servers.len(),
                "count": servers.len(),
                "per_page": 50,
                "current_page": current_page,
                "total_pages": total_pages,
                "links": {}
            }
        }
    })
}
