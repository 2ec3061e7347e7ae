//! Server file-management endpoints
//!
//! - [`list_directory`] - `GET /servers/{id}/files/list`
//! - [`create_folder`] - `POST /servers/{id}/files/create-folder`
//! - [`request_upload_url`] - `GET /servers/{id}/files/upload`

use pterosync_core::domain::{RemotePath, SyncError};
use pterosync_core::ports::{CreateFolderOutcome, DirectoryEntry, UploadDestination};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{read_json, send, unexpected_status, PanelClient};

// ============================================================================
// Panel response types for deserialization
// ============================================================================

/// Panel list envelope: `{ "object": "list", "data": [...] }`
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    pub data: Vec<Wrapped<T>>,
}

/// Panel object wrapper: `{ "object": "...", "attributes": {...} }`
#[derive(Debug, Deserialize)]
pub(crate) struct Wrapped<T> {
    pub attributes: T,
}

/// Attributes of a single file-list entry
#[derive(Debug, Deserialize)]
struct FileAttributes {
    name: String,
    is_file: bool,
}

/// Attributes of the signed upload URL response
#[derive(Debug, Deserialize)]
struct UploadUrlAttributes {
    url: String,
}

/// Body of the create-folder request
#[derive(Debug, Serialize)]
struct CreateFolderRequest<'a> {
    name: &'a str,
    root: String,
}

fn files_path(identifier: &str, endpoint: &str) -> String {
    format!("/servers/{identifier}/files/{endpoint}")
}

// ============================================================================
// list_directory
// ============================================================================

/// Lists a remote directory
///
/// Anything the panel does not flag as a file is reported as a directory.
///
/// # Errors
/// [`SyncError::UnexpectedStatus`] for any non-200 answer,
/// [`SyncError::MalformedResponse`] for a body that is not the listing JSON
pub async fn list_directory(
    client: &PanelClient,
    identifier: &str,
    directory: &RemotePath,
) -> Result<Vec<DirectoryEntry>, SyncError> {
    debug!(server = identifier, directory = %directory, "Listing directory");

    let response = send(
        client
            .request(Method::GET, &files_path(identifier, "list"))
            .query(&[("directory", directory.to_wire())]),
    )
    .await?;

    if response.status() != StatusCode::OK {
        return Err(unexpected_status(response).await);
    }

    let listing: ListEnvelope<FileAttributes> = read_json(response).await?;
    Ok(listing
        .data
        .into_iter()
        .map(|entry| DirectoryEntry {
            name: entry.attributes.name,
            is_directory: !entry.attributes.is_file,
        })
        .collect())
}

// ============================================================================
// create_folder
// ============================================================================

/// Creates folder `name` inside `parent`
///
/// The panel answers `204 No Content` on creation and `400 Bad Request` when
/// the folder already exists. Only that 400 is treated as "already exists";
/// every other non-success status is an error.
pub async fn create_folder(
    client: &PanelClient,
    identifier: &str,
    parent: &RemotePath,
    name: &str,
) -> Result<CreateFolderOutcome, SyncError> {
    debug!(server = identifier, parent = %parent, name, "Creating folder");

    let body = CreateFolderRequest {
        name,
        root: parent.to_wire(),
    };

    let response = send(
        client
            .request(Method::POST, &files_path(identifier, "create-folder"))
            .json(&body),
    )
    .await?;

    let status = response.status();
    if status.is_success() {
        Ok(CreateFolderOutcome::Created)
    } else if status == StatusCode::BAD_REQUEST {
        Ok(CreateFolderOutcome::AlreadyExists)
    } else {
        Err(unexpected_status(response).await)
    }
}

// ============================================================================
// request_upload_url
// ============================================================================

/// Requests a signed upload URL scoped to `directory`
pub async fn request_upload_url(
    client: &PanelClient,
    identifier: &str,
    directory: &RemotePath,
) -> Result<UploadDestination, SyncError> {
    debug!(server = identifier, directory = %directory, "Requesting upload URL");

    let response = send(
        client
            .request(Method::GET, &files_path(identifier, "upload"))
            .query(&[("directory", directory.to_wire())]),
    )
    .await?;

    if response.status() != StatusCode::OK {
        return Err(unexpected_status(response).await);
    }

    let signed: Wrapped<UploadUrlAttributes> = read_json(response).await?;
    Ok(UploadDestination {
        url: signed.attributes.url,
        directory: directory.clone(),
    })
}
