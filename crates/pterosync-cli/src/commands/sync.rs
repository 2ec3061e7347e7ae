//! Sync command - Push the local tree to every selected server
//!
//! Provides the `pterosync sync` CLI command which:
//! 1. Loads and validates configuration
//! 2. Creates the panel adapter from the API key
//! 3. Runs the SyncEngine with Ctrl+C wired to cancellation
//! 4. Prints the per-server report

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pterosync_core::config::Config;
use pterosync_sync::{EngineOptions, SyncEngine, SyncReport, TargetFilter};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{cancel_on_shutdown, connect, ensure_valid, CommandContext};
use crate::output::{format_duration, plural, target_outcome, Outcome, OutputFormatter};

/// Options for `pterosync sync`
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Local directory to upload (overrides sync.root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Only sync servers whose name contains the debug marker
    #[arg(long)]
    pub debug: bool,

    /// Fail unless every server and every file succeeded
    #[arg(long)]
    pub strict: bool,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncCommand {
    /// Resolves the root and target filter from flags over configuration
    pub fn resolve(&self, config: &Config) -> (PathBuf, TargetFilter) {
        let root = self.root.clone().unwrap_or_else(|| config.sync.root.clone());
        let mut filter = TargetFilter::from_config(&config.targets);
        if self.debug {
            filter = filter.with_debug_marker(config.targets.debug_marker.clone());
        }
        (root, filter)
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config()?;
        ensure_valid(&config)?;

        let (root, filter) = self.resolve(&config);
        let provider = connect(&config)?;
        let engine = SyncEngine::new(provider, EngineOptions::from_config(&config));

        let cancel = cancel_on_shutdown();

        if self.dry_run {
            return self
                .execute_dry_run(ctx, formatter.as_ref(), &engine, &root, &filter, &cancel)
                .await;
        }

        formatter.info(&format!("Syncing {}", root.display()));
        let report = engine
            .sync(&root, &filter, &cancel)
            .await
            .with_context(|| format!("Sync of {} failed", root.display()))?;

        if ctx.is_json() {
            let json = serde_json::to_value(&report).context("Failed to serialize sync report")?;
            formatter.print_json(&json);
        } else {
            print_report(formatter.as_ref(), &report);
        }

        if cancel.is_cancelled() {
            anyhow::bail!("Sync interrupted");
        }
        if !report.is_success() {
            anyhow::bail!("No server was synced successfully");
        }
        if self.strict && !report.is_clean() {
            anyhow::bail!(
                "Sync finished with failures ({} not uploaded, {} unreadable)",
                plural(report.files_failed(), "file"),
                plural(report.scan_errors.len(), "path")
            );
        }
        Ok(())
    }

    async fn execute_dry_run(
        &self,
        ctx: &CommandContext,
        formatter: &dyn OutputFormatter,
        engine: &SyncEngine,
        root: &std::path::Path,
        filter: &TargetFilter,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let prepared = pterosync_sync::engine::prepare(root)
            .await
            .with_context(|| format!("Failed to scan {}", root.display()))?;
        let targets = engine
            .discover_targets(filter, cancel)
            .await
            .context("Failed to list servers")?;

        info!(
            targets = targets.len(),
            files = prepared.tasks.len(),
            "Dry run complete"
        );

        if ctx.is_json() {
            let json = serde_json::json!({
                "dry_run": true,
                "root": root.display().to_string(),
                "targets": targets,
                "folders": prepared.plan,
                "files": prepared
                    .tasks
                    .iter()
                    .map(|t| t.file.relative_path().to_string())
                    .collect::<Vec<_>>(),
                "scan_errors": prepared
                    .scan
                    .errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>(),
            });
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success("Dry run - no changes will be made");
        formatter.info(&format!(
            "Would create up to {} and upload {} to {}:",
            plural(prepared.plan.len(), "folder"),
            plural(prepared.tasks.len(), "file"),
            plural(targets.len(), "server")
        ));
        for target in &targets {
            formatter.outcome(Outcome::Ok, &target.to_string(), &target.image);
        }
        for error in &prepared.scan.errors {
            formatter.warn(&format!("Skipped: {error}"));
        }
        Ok(())
    }
}

fn print_report(formatter: &dyn OutputFormatter, report: &SyncReport) {
    if report.targets.is_empty() {
        formatter.warn("No server matched the target filters");
        return;
    }

    formatter.success(&format!(
        "Synced {}/{} in {}",
        report.targets_completed(),
        plural(report.targets.len(), "server"),
        format_duration(report.duration_ms)
    ));
    formatter.info(&format!(
        "Local: {}, {}",
        plural(report.files_scanned, "file"),
        plural(report.folders_planned, "folder")
    ));

    formatter.heading("Servers:");
    for target in &report.targets {
        let (outcome, detail) = target_outcome(&target.status);
        let counts = format!(
            "folders {} new, {} existing; files {} uploaded, {} failed, {} skipped",
            target.folders_created,
            target.folders_existing,
            target.files_uploaded,
            target.failures.len(),
            target.files_skipped
        );
        let detail = if detail.is_empty() {
            counts
        } else {
            format!("{detail} ({counts})")
        };
        formatter.outcome(outcome, &target.target.to_string(), &detail);
        for failure in &target.failures {
            formatter.outcome(Outcome::Failed, &format!("  {}", failure.path), &failure.error);
        }
    }

    for error in &report.scan_errors {
        formatter.warn(&format!("Skipped: {error}"));
    }
}
