//! Directory synchronization engine
//!
//! The [`SyncEngine`] pushes a local tree to every selected target.
//!
//! ## Sync Flow
//!
//! 1. **Prepare** (once): scan the local root, compute the directory plan and
//!    the upload tasks
//! 2. **Discover**: list targets and apply the [`TargetFilter`]
//! 3. **Per target**, concurrently across targets: materialize the plan in
//!    order, then upload every task with bounded concurrency
//! 4. **Report**: aggregate one [`TargetReport`] per target
//!
//! A target whose folders cannot be created is abandoned; the others carry
//! on. Cancellation stops new requests and reports the remaining targets as
//! [`TargetStatus::Cancelled`].

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use pterosync_core::config::Config;
use pterosync_core::domain::{RemotePath, RemoteTarget, SyncError, UploadTask};
use pterosync_core::ports::IPanelApi;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::materializer::Materializer;
use crate::planner::{self, DirectoryPlan};
use crate::retry::RetryPolicy;
use crate::scanner::{self, ScanOutcome};
use crate::targets::{self, TargetFilter};
use crate::upload::{FileFailure, Uploader};

// ============================================================================
// Reports
// ============================================================================

/// Final state of one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    /// All folders exist and every upload was attempted
    Completed,
    /// A folder could not be created; uploads were skipped
    FolderCreationFailed { directory: RemotePath, error: String },
    /// The run was cancelled before this target finished
    Cancelled,
}

/// Outcome of syncing one target
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub target: RemoteTarget,
    pub status: TargetStatus,
    pub folders_created: usize,
    pub folders_existing: usize,
    pub files_uploaded: usize,
    /// Files never attempted (folder failure or cancellation)
    pub files_skipped: usize,
    pub failures: Vec<FileFailure>,
}

impl TargetReport {
    fn new(target: RemoteTarget) -> Self {
        Self {
            target,
            status: TargetStatus::Completed,
            folders_created: 0,
            folders_existing: 0,
            files_uploaded: 0,
            files_skipped: 0,
            failures: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TargetStatus::Completed
    }
}

/// Summary of a sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub targets: Vec<TargetReport>,
    pub files_scanned: usize,
    pub folders_planned: usize,
    /// Local paths that could not be read (non-fatal)
    pub scan_errors: Vec<String>,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl SyncReport {
    /// False only when there were targets and none of them completed
    pub fn is_success(&self) -> bool {
        self.targets.is_empty() || self.targets.iter().any(TargetReport::is_completed)
    }

    /// True when every target completed without a single failed file or
    /// unreadable local path
    pub fn is_clean(&self) -> bool {
        self.scan_errors.is_empty()
            && self
                .targets
                .iter()
                .all(|t| t.is_completed() && t.failures.is_empty())
    }

    pub fn targets_completed(&self) -> usize {
        self.targets.iter().filter(|t| t.is_completed()).count()
    }

    pub fn files_uploaded(&self) -> usize {
        self.targets.iter().map(|t| t.files_uploaded).sum()
    }

    pub fn files_failed(&self) -> usize {
        self.targets.iter().map(|t| t.failures.len()).sum()
    }
}

// ============================================================================
// Preparation
// ============================================================================

/// Local side of a run, computed once and shared by every target
#[derive(Debug)]
pub struct PreparedRun {
    pub scan: ScanOutcome,
    pub plan: DirectoryPlan,
    pub tasks: Vec<UploadTask>,
}

/// Scans `root` and derives the directory plan and upload tasks
pub async fn prepare(root: &Path) -> Result<PreparedRun, SyncError> {
    let scan = scanner::scan(root).await?;
    let plan = planner::plan(&scan.files);
    let tasks = planner::tasks(&scan.files);
    Ok(PreparedRun { scan, plan, tasks })
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Tunables taken from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub retry: RetryPolicy,
    /// Targets synced at the same time
    pub target_concurrency: usize,
    /// Uploads in flight per target
    pub upload_concurrency: usize,
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: RetryPolicy::from_config(&config.network),
            target_concurrency: config.concurrency.targets,
            upload_concurrency: config.concurrency.uploads,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Push-only synchronization engine
///
/// ## Dependencies
///
/// - `api`: Remote file operations (listing, folder creation, uploads)
/// - `options`: Retry and concurrency settings
pub struct SyncEngine {
    api: Arc<dyn IPanelApi + Send + Sync>,
    options: EngineOptions,
}

impl SyncEngine {
    pub fn new(api: Arc<dyn IPanelApi + Send + Sync>, options: EngineOptions) -> Self {
        Self { api, options }
    }

    /// Lists targets and keeps the ones `filter` selects
    pub async fn discover_targets(
        &self,
        filter: &TargetFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteTarget>, SyncError> {
        targets::discover_targets(self.api.as_ref(), filter, self.options.retry, cancel).await
    }

    /// Full run: prepare, discover, then sync every target
    ///
    /// # Errors
    /// Only an unreadable root or a failed target discovery abort the run.
    /// Per-target and per-file failures are recorded in the report.
    #[tracing::instrument(skip_all, fields(root = %root.display()))]
    pub async fn sync(
        &self,
        root: &Path,
        filter: &TargetFilter,
        cancel: &CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let start = Instant::now();

        let prepared = prepare(root).await?;
        info!(
            files = prepared.tasks.len(),
            folders = prepared.plan.len(),
            "Local tree prepared"
        );

        let targets = self.discover_targets(filter, cancel).await?;

        let mut report = self
            .run(targets, &prepared.plan, &prepared.tasks, cancel)
            .await;
        report.started_at = started_at;
        report.scan_errors = prepared.scan.errors.iter().map(ToString::to_string).collect();
        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// Syncs `plan` and `tasks` to each target
    pub async fn run(
        &self,
        targets: Vec<RemoteTarget>,
        plan: &DirectoryPlan,
        tasks: &[UploadTask],
        cancel: &CancellationToken,
    ) -> SyncReport {
        let started_at = Utc::now();
        let start = Instant::now();

        let reports: Vec<TargetReport> = stream::iter(&targets)
            .map(|target| self.sync_target(target, plan, tasks, cancel))
            .buffered(self.options.target_concurrency.max(1))
            .collect()
            .await;

        let report = SyncReport {
            started_at,
            targets: reports,
            files_scanned: tasks.len(),
            folders_planned: plan.len(),
            scan_errors: Vec::new(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            targets = report.targets.len(),
            completed = report.targets_completed(),
            uploaded = report.files_uploaded(),
            failed = report.files_failed(),
            "Sync run finished"
        );
        report
    }

    /// Materializes the plan on one target, then uploads every task to it
    #[tracing::instrument(skip_all, fields(server = %target.name))]
    pub async fn sync_target(
        &self,
        target: &RemoteTarget,
        plan: &DirectoryPlan,
        tasks: &[UploadTask],
        cancel: &CancellationToken,
    ) -> TargetReport {
        let mut report = TargetReport::new(target.clone());

        if cancel.is_cancelled() {
            report.status = TargetStatus::Cancelled;
            report.files_skipped = tasks.len();
            return report;
        }

        info!(
            server = %target,
            folders = plan.len(),
            files = tasks.len(),
            "Syncing target"
        );

        let api: &dyn IPanelApi = self.api.as_ref();

        match Materializer::new(api, self.options.retry, cancel)
            .materialize(target, plan)
            .await
        {
            Ok(summary) => {
                report.folders_created = summary.created;
                report.folders_existing = summary.existing;
            }
            Err(err) => {
                report.folders_created = err.summary.created;
                report.folders_existing = err.summary.existing;
                report.files_skipped = tasks.len();
                report.status = match err.source {
                    SyncError::Cancelled => TargetStatus::Cancelled,
                    source => {
                        warn!(
                            server = %target,
                            path = %err.directory,
                            "Skipping uploads for target after folder failure"
                        );
                        TargetStatus::FolderCreationFailed {
                            directory: err.directory,
                            error: source.to_string(),
                        }
                    }
                };
                return report;
            }
        }

        let uploads = Uploader::new(api, self.options.retry, cancel, self.options.upload_concurrency)
            .upload_all(target, tasks)
            .await;

        report.files_uploaded = uploads.uploaded;
        report.files_skipped = uploads.cancelled;
        report.failures = uploads.failures;
        if uploads.cancelled > 0 {
            report.status = TargetStatus::Cancelled;
        }

        info!(
            server = %target,
            created = report.folders_created,
            existing = report.folders_existing,
            uploaded = report.files_uploaded,
            failed = report.failures.len(),
            "Target finished"
        );
        report
    }
}
