//! CLI subcommands and the plumbing they share
//!
//! Every command receives a [`CommandContext`] holding the global flags. The
//! helpers here load configuration, build the panel adapter and wire Ctrl+C
//! to a [`CancellationToken`].

pub mod completions;
pub mod config;
pub mod plan;
pub mod sync;
pub mod targets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use pterosync_core::config::{Config, API_KEY_ENV};
use pterosync_panel::{PanelClient, PanelProvider};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Global flags shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub quiet: bool,
    /// Configuration file in use
    pub config_path: PathBuf,
    /// Whether the path came from `--config`
    explicit_config: bool,
}

impl CommandContext {
    pub fn new(format: OutputFormat, quiet: bool, config: Option<PathBuf>) -> Self {
        let explicit_config = config.is_some();
        Self {
            format,
            quiet,
            config_path: config.unwrap_or_else(Config::default_path),
            explicit_config,
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.is_json(), self.quiet)
    }

    /// Loads the configuration file
    ///
    /// A missing file at the default location yields the defaults. A file
    /// named with `--config` must exist.
    pub fn load_config(&self) -> Result<Config> {
        if !self.explicit_config && !self.config_path.exists() {
            return Ok(Config::default());
        }
        Config::load(&self.config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                self.config_path.display()
            )
        })
    }
}

/// Fails with every validation problem when `config` is invalid
pub fn ensure_valid(config: &Config) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
    anyhow::bail!("Invalid configuration: {}", details.join("; "))
}

/// Builds the panel adapter from configuration
pub fn connect(config: &Config) -> Result<Arc<PanelProvider>> {
    let api_key = config.api_key().with_context(|| {
        format!("No API key configured. Set panel.api_key or ${API_KEY_ENV}")
    })?;
    let client = PanelClient::with_timeout(
        config.panel.url.as_str(),
        api_key,
        Duration::from_secs(config.network.timeout_secs),
    )
    .context("Failed to create panel client")?
    .with_upload_timeout(Duration::from_secs(config.network.upload_timeout_secs));

    info!(panel = %client.base_url(), "Connecting to panel");
    Ok(Arc::new(PanelProvider::new(client)))
}

/// Returns a token that is cancelled on Ctrl+C or SIGTERM
///
/// Must be called inside the runtime.
pub fn cancel_on_shutdown() -> CancellationToken {
    let token = CancellationToken::new();
    tokio::spawn(shutdown_signal(token.clone()));
    token
}

/// Cancels `token` on Ctrl+C or SIGTERM
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), stopping");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping");
        }
    }

    token.cancel();
}
