//! Upload pipeline
//!
//! Each file is uploaded in two phases: request a signed destination for the
//! file's remote directory, then stream the file to it. A failure in either
//! phase fails that file only.
//!
//! Destinations are short-lived, so a transient failure retries both phases
//! together instead of reusing the destination.

use futures_util::stream::{self, StreamExt};
use pterosync_core::domain::{RemotePath, RemoteTarget, SyncError, UploadTask};
use pterosync_core::ports::IPanelApi;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::retry::RetryPolicy;

/// A file that could not be uploaded to a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Path of the file relative to the sync root
    pub path: RemotePath,
    /// Rendered error
    pub error: String,
}

/// Upload results for one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    /// Failed files, sorted by path
    pub failures: Vec<FileFailure>,
    /// Files skipped because the run was cancelled
    pub cancelled: usize,
}

/// Streams upload tasks to a target with bounded concurrency
pub struct Uploader<'a> {
    api: &'a dyn IPanelApi,
    retry: RetryPolicy,
    cancel: &'a CancellationToken,
    concurrency: usize,
}

impl<'a> Uploader<'a> {
    pub fn new(
        api: &'a dyn IPanelApi,
        retry: RetryPolicy,
        cancel: &'a CancellationToken,
        concurrency: usize,
    ) -> Self {
        Self {
            api,
            retry,
            cancel,
            concurrency: concurrency.max(1),
        }
    }

    /// Uploads a single file: destination request, then transfer
    pub async fn upload(&self, target: &RemoteTarget, task: &UploadTask) -> Result<(), SyncError> {
        self.retry
            .run("upload", self.cancel, || async move {
                let destination = self
                    .api
                    .request_upload_url(target, &task.remote_directory)
                    .await?;
                self.api.upload_file(&destination, &task.file).await
            })
            .await
    }

    /// Uploads every task; one file's failure never stops the others
    #[tracing::instrument(skip_all, fields(server = %target.name, files = tasks.len()))]
    pub async fn upload_all(&self, target: &RemoteTarget, tasks: &[UploadTask]) -> UploadSummary {
        let results: Vec<_> = stream::iter(tasks)
            .map(|task| async move { (task, self.upload(target, task).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut summary = UploadSummary::default();
        for (task, result) in results {
            let path = task.file.relative_path();
            match result {
                Ok(()) => {
                    info!(server = %target.name, path = %path, "Uploaded file");
                    summary.uploaded += 1;
                }
                Err(SyncError::Cancelled) => summary.cancelled += 1,
                Err(err) => {
                    error!(server = %target.name, path = %path, error = %err, "Failed to upload file");
                    summary.failures.push(FileFailure {
                        path: path.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        summary.failures.sort_by(|a, b| a.path.cmp(&b.path));
        summary
    }
}
