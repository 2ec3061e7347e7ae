//! PanelProvider - IPanelApi implementation for the panel HTTP API
//!
//! Wraps the [`PanelClient`] and delegates to the [`files`], [`servers`] and
//! [`upload`] modules to fulfil the [`IPanelApi`] port contract.
//!
//! Each method performs a single request. Retry and cancellation live in the
//! sync engine, which knows which operations are idempotent.

use pterosync_core::domain::{LocalFile, RemotePath, RemoteTarget, SyncError};
use pterosync_core::ports::{CreateFolderOutcome, DirectoryEntry, IPanelApi, UploadDestination};
use tracing::debug;

use crate::client::PanelClient;
use crate::{files, servers, upload};

/// Panel-backed implementation of [`IPanelApi`]
#[derive(Debug, Clone)]
pub struct PanelProvider {
    client: PanelClient,
}

impl PanelProvider {
    /// Creates a new `PanelProvider` wrapping the given [`PanelClient`]
    pub fn new(client: PanelClient) -> Self {
        Self { client }
    }

    /// Returns the wrapped client
    pub fn client(&self) -> &PanelClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl IPanelApi for PanelProvider {
    async fn list_targets(&self) -> Result<Vec<RemoteTarget>, SyncError> {
        debug!("PanelProvider::list_targets");
        servers::list_servers(&self.client).await
    }

    async fn list_directory(
        &self,
        target: &RemoteTarget,
        directory: &RemotePath,
    ) -> Result<Vec<DirectoryEntry>, SyncError> {
        files::list_directory(&self.client, &target.identifier, directory).await
    }

    async fn create_folder(
        &self,
        target: &RemoteTarget,
        parent: &RemotePath,
        name: &str,
    ) -> Result<CreateFolderOutcome, SyncError> {
        files::create_folder(&self.client, &target.identifier, parent, name).await
    }

    async fn request_upload_url(
        &self,
        target: &RemoteTarget,
        directory: &RemotePath,
    ) -> Result<UploadDestination, SyncError> {
        files::request_upload_url(&self.client, &target.identifier, directory).await
    }

    async fn upload_file(
        &self,
        destination: &UploadDestination,
        file: &LocalFile,
    ) -> Result<(), SyncError> {
        upload::upload_file(&self.client, destination, file).await
    }
}
