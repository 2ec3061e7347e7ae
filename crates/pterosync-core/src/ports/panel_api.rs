//! Panel API port (driven/secondary port)
//!
//! This module defines the interface the sync engine uses to talk to the
//! panel's file-management API. The production implementation is the reqwest
//! adapter in `pterosync-panel`; tests use in-memory fakes.
//!
//! ## Design Notes
//!
//! - Methods return [`SyncError`] rather than `anyhow::Error` because the
//!   engine's retry and failure policy depends on the error kind.
//! - Methods perform exactly one logical request each. Retry, timeout
//!   classification and cancellation are handled by the caller.
//! - Uses `#[async_trait]` for async trait methods.

use serde::{Deserialize, Serialize};

use crate::domain::{LocalFile, RemotePath, RemoteTarget, SyncError};

// ============================================================================
// Port DTOs
// ============================================================================

/// A single entry from a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name (no path)
    pub name: String,
    /// Whether the entry is a directory (anything that is not a file)
    pub is_directory: bool,
}

/// How the remote answered a folder creation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateFolderOutcome {
    /// The folder was created by this request
    Created,
    /// The remote reported that the folder already exists
    AlreadyExists,
}

/// A short-lived, pre-authorized upload destination
///
/// Scoped to one remote directory. Destinations expire quickly, so a failed
/// transfer must request a fresh one rather than reuse this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDestination {
    /// Signed URL accepting a multipart upload
    pub url: String,
    /// Remote directory the destination is scoped to
    pub directory: RemotePath,
}

// ============================================================================
// IPanelApi trait
// ============================================================================

/// Port trait for the panel's file-management operations
///
/// ## Implementation Notes
///
/// - `create_folder` must map only the remote's explicit "already exists"
///   answer to [`CreateFolderOutcome::AlreadyExists`]; every other non-success
///   status is [`SyncError::UnexpectedStatus`].
/// - `upload_file` must open the local file itself and release the handle
///   when the transfer finishes, successfully or not.
#[async_trait::async_trait]
pub trait IPanelApi: Send + Sync {
    /// Lists every server visible to the credential
    async fn list_targets(&self) -> Result<Vec<RemoteTarget>, SyncError>;

    /// Lists the entries of a remote directory
    ///
    /// # Arguments
    /// * `target` - Server to query
    /// * `directory` - Directory to list (`/` for the server root)
    async fn list_directory(
        &self,
        target: &RemoteTarget,
        directory: &RemotePath,
    ) -> Result<Vec<DirectoryEntry>, SyncError>;

    /// Creates a single folder `name` inside `parent`
    ///
    /// The parent must already exist.
    async fn create_folder(
        &self,
        target: &RemoteTarget,
        parent: &RemotePath,
        name: &str,
    ) -> Result<CreateFolderOutcome, SyncError>;

    /// Requests a signed upload destination scoped to `directory`
    async fn request_upload_url(
        &self,
        target: &RemoteTarget,
        directory: &RemotePath,
    ) -> Result<UploadDestination, SyncError>;

    /// Streams a local file to a previously obtained destination
    async fn upload_file(
        &self,
        destination: &UploadDestination,
        file: &LocalFile,
    ) -> Result<(), SyncError>;
}
