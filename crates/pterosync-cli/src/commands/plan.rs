//! Plan command - Show what the local tree maps to, without the network

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pterosync_sync::engine::prepare;

use super::CommandContext;
use crate::output::plural;

/// Options for `pterosync plan`
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Local directory to scan (overrides sync.root)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl PlanCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config()?;
        let root = self.root.clone().unwrap_or(config.sync.root);

        let prepared = prepare(&root)
            .await
            .with_context(|| format!("Failed to scan {}", root.display()))?;

        let files: Vec<String> = prepared
            .scan
            .files
            .iter()
            .map(|f| f.relative_path().to_string())
            .collect();
        let errors: Vec<String> = prepared.scan.errors.iter().map(ToString::to_string).collect();

        if ctx.is_json() {
            let json = serde_json::json!({
                "root": root.display().to_string(),
                "files": files,
                "folders": prepared.plan,
                "scan_errors": errors,
            });
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success(&format!(
            "{}: {} in {}",
            root.display(),
            plural(files.len(), "file"),
            plural(prepared.plan.len(), "folder")
        ));
        formatter.heading("Folders (creation order):");
        for directory in &prepared.plan {
            formatter.info(&directory.to_string());
        }
        formatter.heading("Files:");
        for file in &files {
            formatter.info(file);
        }
        for error in &errors {
            formatter.warn(&format!("Skipped: {error}"));
        }
        Ok(())
    }
}
