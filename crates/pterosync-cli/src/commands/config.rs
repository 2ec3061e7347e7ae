//! Config command - View and validate PteroSync configuration
//!
//! Provides the `pterosync config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON) with the API key masked
//! 2. Validates the configuration file and reports every error
//! 3. Prints the configuration file path

use anyhow::{Context, Result};
use clap::Subcommand;
use pterosync_core::config::Config;
use tracing::info;

use super::CommandContext;
use crate::output::plural;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(ctx),
            ConfigCommand::Validate => self.execute_validate(ctx),
            ConfigCommand::Path => self.execute_path(ctx),
        }
    }

    fn execute_show(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = masked(ctx.load_config()?);

        info!(config_path = %ctx.config_path.display(), "Showing configuration");

        if ctx.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", ctx.config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    fn execute_validate(&self, ctx: &CommandContext) -> Result<()> {
        let formatter = ctx.formatter();
        let config = ctx.load_config()?;

        info!(config_path = %ctx.config_path.display(), "Validating configuration");

        let errors = config.validate();
        let has_key = config.api_key().is_some();

        if ctx.is_json() {
            let error_strings: Vec<String> = errors.iter().map(ToString::to_string).collect();
            let json = serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": ctx.config_path.display().to_string(),
                "api_key_set": has_key,
                "errors": error_strings,
            });
            formatter.print_json(&json);
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", ctx.config_path.display()));
            if !has_key {
                formatter.warn("No API key set; sync and targets will fail");
            }
        } else {
            formatter.info(&format!("File: {}", ctx.config_path.display()));
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if !errors.is_empty() {
            anyhow::bail!("Configuration has {}", plural(errors.len(), "error"));
        }
        Ok(())
    }

    fn execute_path(&self, ctx: &CommandContext) -> Result<()> {
        let path = ctx.config_path.display().to_string();
        if ctx.is_json() {
            ctx.formatter().print_json(&serde_json::json!({
                "config_path": path,
                "exists": ctx.config_path.exists(),
            }));
        } else {
            println!("{path}");
        }
        Ok(())
    }
}

/// Replaces the API key with a fixed mask, keeping its presence visible
fn masked(mut config: Config) -> Config {
    if let Some(key) = config.panel.api_key.as_mut() {
        *key = mask_key(key);
    }
    config
}

fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(5).collect();
    if key.chars().count() <= 8 {
        "********".to_string()
    } else {
        format!("{prefix}********")
    }
}
