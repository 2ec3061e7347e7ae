//! Remote folder materializer
//!
//! Walks a [`DirectoryPlan`] in order and makes sure each directory exists on
//! one target. Each directory moves through
//! `Unchecked -> Exists`, `Unchecked -> Missing -> Created` or
//! `Unchecked -> Missing -> CreateFailed`. The last is terminal for the
//! whole target: later directories depend on it.

use pterosync_core::domain::{DomainError, RemotePath, RemoteTarget, SyncError};
use pterosync_core::ports::{CreateFolderOutcome, IPanelApi};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::planner::DirectoryPlan;
use crate::retry::RetryPolicy;

/// Result of an existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderPresence {
    /// The parent listing contains a directory with this name
    Exists,
    /// The parent listing succeeded and has no such directory
    NotFound,
    /// The listing failed; creation is attempted anyway
    Unknown,
}

/// How a planned directory ended up existing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderOutcome {
    Created,
    AlreadyExisted,
}

/// Folder counts for one target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeSummary {
    pub created: usize,
    pub existing: usize,
}

/// A directory could not be created; the target's run stops here
#[derive(Debug, Error)]
#[error("failed to create folder {directory}: {source}")]
pub struct MaterializeError {
    /// The directory that failed
    pub directory: RemotePath,
    /// Progress made before the failure
    pub summary: MaterializeSummary,
    #[source]
    pub source: SyncError,
}

/// Ensures planned directories exist on a target
pub struct Materializer<'a> {
    api: &'a dyn IPanelApi,
    retry: RetryPolicy,
    cancel: &'a CancellationToken,
}

impl<'a> Materializer<'a> {
    pub fn new(api: &'a dyn IPanelApi, retry: RetryPolicy, cancel: &'a CancellationToken) -> Self {
        Self { api, retry, cancel }
    }

    /// Materializes every directory of `plan` on `target`, strictly in order
    ///
    /// # Errors
    /// Stops at the first directory that cannot be created. An
    /// "already exists" answer is not a failure.
    #[tracing::instrument(skip_all, fields(server = %target.name))]
    pub async fn materialize(
        &self,
        target: &RemoteTarget,
        plan: &DirectoryPlan,
    ) -> Result<MaterializeSummary, MaterializeError> {
        let mut summary = MaterializeSummary::default();

        for directory in plan {
            match self.ensure_folder(target, directory).await {
                Ok(FolderOutcome::Created) => summary.created += 1,
                Ok(FolderOutcome::AlreadyExisted) => summary.existing += 1,
                Err(source) => {
                    if !matches!(source, SyncError::Cancelled) {
                        error!(
                            server = %target.name,
                            path = %directory,
                            error = %source,
                            "Failed to create folder"
                        );
                    }
                    return Err(MaterializeError {
                        directory: directory.clone(),
                        summary,
                        source,
                    });
                }
            }
        }

        debug!(
            server = %target.name,
            created = summary.created,
            existing = summary.existing,
            "Folders materialized"
        );
        Ok(summary)
    }

    /// Makes sure `directory` exists, creating it if the check says otherwise
    pub async fn ensure_folder(
        &self,
        target: &RemoteTarget,
        directory: &RemotePath,
    ) -> Result<FolderOutcome, SyncError> {
        if self.check_presence(target, directory).await == FolderPresence::Exists {
            info!(server = %target.name, path = %directory, "Folder already exists");
            return Ok(FolderOutcome::AlreadyExisted);
        }

        let parent = directory.parent().unwrap_or_else(RemotePath::root);
        let name = directory.file_name().ok_or_else(|| {
            DomainError::InvalidRemotePath("the root directory cannot be created".to_string())
        })?;

        let outcome = self
            .retry
            .run("create_folder", self.cancel, || {
                self.api.create_folder(target, &parent, name)
            })
            .await?;

        match outcome {
            CreateFolderOutcome::Created => {
                info!(server = %target.name, path = %directory, "Created folder");
                Ok(FolderOutcome::Created)
            }
            CreateFolderOutcome::AlreadyExists => {
                info!(server = %target.name, path = %directory, "Folder already exists");
                Ok(FolderOutcome::AlreadyExisted)
            }
        }
    }

    /// Looks for `directory` in its parent's listing
    ///
    /// Never fails: a listing error yields [`FolderPresence::Unknown`].
    pub async fn check_presence(
        &self,
        target: &RemoteTarget,
        directory: &RemotePath,
    ) -> FolderPresence {
        let (Some(parent), Some(name)) = (directory.parent(), directory.file_name()) else {
            return FolderPresence::Exists;
        };

        let listing = self
            .retry
            .run("list_directory", self.cancel, || {
                self.api.list_directory(target, &parent)
            })
            .await;

        match listing {
            Ok(entries) if entries.iter().any(|e| e.is_directory && e.name == name) => {
                FolderPresence::Exists
            }
            Ok(_) => FolderPresence::NotFound,
            Err(SyncError::Cancelled) => FolderPresence::Unknown,
            Err(err) => {
                warn!(
                    server = %target.name,
                    path = %directory,
                    error = %err,
                    "Folder existence check failed, attempting creation"
                );
                FolderPresence::Unknown
            }
        }
    }
}
