//! Configuration module for PteroSync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable consulted when `panel.api_key` is not set.
pub const API_KEY_ENV: &str = "PTEROSYNC_API_KEY";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for PteroSync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub panel: PanelConfig,
    pub sync: SyncConfig,
    pub targets: TargetsConfig,
    pub network: NetworkConfig,
    pub concurrency: ConcurrencyConfig,
    pub logging: LoggingConfig,
}

/// Panel connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Base URL of the panel, e.g. `https://panel.example.net`.
    pub url: String,
    /// Client API key. `None` falls back to `$PTEROSYNC_API_KEY`.
    pub api_key: Option<String>,
}

/// Local tree settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Local directory mirrored onto every target.
    pub root: PathBuf,
}

/// Target selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Only servers running one of these images are eligible. Empty allows all.
    pub allowed_images: Vec<String>,
    /// Servers whose name contains any of these substrings are skipped.
    pub exclude_names: Vec<String>,
    /// When set, only servers whose name contains `debug_marker` are eligible.
    pub debug: bool,
    /// Name marker for debug mode.
    pub debug_marker: String,
}

/// HTTP behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Deadline for one file transfer in seconds.
    pub upload_timeout_secs: u64,
    /// Retries for timeouts and connection errors on idempotent requests.
    pub max_retries: u32,
    /// First backoff delay in milliseconds; doubles on every retry.
    pub retry_base_delay_ms: u64,
}

/// Parallelism settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Targets processed at the same time.
    pub targets: usize,
    /// Uploads in flight per target.
    pub uploads: usize,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/pterosync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pterosync")
            .join("config.yaml")
    }

    /// The API key from the file, or from `$PTEROSYNC_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.panel
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_string(),
            api_key: None,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("upload"),
        }
    }
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            allowed_images: Vec::new(),
            exclude_names: Vec::new(),
            debug: false,
            debug_marker: "Dev".to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            upload_timeout_secs: 600,
            max_retries: 3,
            retry_base_delay_ms: 500,
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            targets: 4,
            uploads: 4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"network.timeout_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for both concurrency knobs.
const MAX_CONCURRENCY: usize = 64;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. The sync root is not
    /// checked here; a missing root is reported when the scan starts.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- panel ---
        if !(self.panel.url.starts_with("http://") || self.panel.url.starts_with("https://")) {
            errors.push(ValidationError {
                field: "panel.url".into(),
                message: format!("must start with http:// or https://: '{}'", self.panel.url),
            });
        }

        // --- targets ---
        if self.targets.debug && self.targets.debug_marker.is_empty() {
            errors.push(ValidationError {
                field: "targets.debug_marker".into(),
                message: "must not be empty when targets.debug is enabled".into(),
            });
        }
        if self.targets.exclude_names.iter().any(String::is_empty) {
            errors.push(ValidationError {
                field: "targets.exclude_names".into(),
                message: "empty entries would exclude every server".into(),
            });
        }

        // --- network ---
        if self.network.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "network.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.network.upload_timeout_secs < self.network.timeout_secs {
            errors.push(ValidationError {
                field: "network.upload_timeout_secs".into(),
                message: "must not be shorter than network.timeout_secs".into(),
            });
        }

        // --- concurrency ---
        if self.concurrency.targets == 0 || self.concurrency.targets > MAX_CONCURRENCY {
            errors.push(ValidationError {
                field: "concurrency.targets".into(),
                message: format!("must be in range 1..={MAX_CONCURRENCY}"),
            });
        }
        if self.concurrency.uploads == 0 || self.concurrency.uploads > MAX_CONCURRENCY {
            errors.push(ValidationError {
                field: "concurrency.uploads".into(),
                message: format!("must be in range 1..={MAX_CONCURRENCY}"),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use pterosync_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .panel_url("https://panel.example.net")
///     .exclude_name("1v1")
///     .upload_concurrency(8)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- panel ---

    pub fn panel_url(mut self, url: impl Into<String>) -> Self {
        self.config.panel.url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.panel.api_key = Some(key.into());
        self
    }

    // --- sync ---

    pub fn sync_root(mut self, root: PathBuf) -> Self {
        self.config.sync.root = root;
        self
    }

    // --- targets ---

    pub fn allowed_image(mut self, image: impl Into<String>) -> Self {
        self.config.targets.allowed_images.push(image.into());
        self
    }

    pub fn exclude_name(mut self, fragment: impl Into<String>) -> Self {
        self.config.targets.exclude_names.push(fragment.into());
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.targets.debug = enabled;
        self
    }

    pub fn debug_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.targets.debug_marker = marker.into();
        self
    }

    // --- network ---

    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.config.network.timeout_secs = seconds;
        self
    }

    pub fn upload_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.network.upload_timeout_secs = seconds;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.network.max_retries = n;
        self
    }

    pub fn retry_base_delay_ms(mut self, ms: u64) -> Self {
        self.config.network.retry_base_delay_ms = ms;
        self
    }

    // --- concurrency ---

    pub fn target_concurrency(mut self, n: usize) -> Self {
        self.config.concurrency.targets = n;
        self
    }

    pub fn upload_concurrency(mut self, n: usize) -> Self {
        self.config.concurrency.uploads = n;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
