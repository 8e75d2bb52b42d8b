//! # Configuration
//!
//! Override hierarchy: defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.ragchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_TOP_K;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RagChatConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub top_k: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub persist: Option<bool>,
    pub dir: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:8000/ask";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub endpoint_url: String,
    pub top_k: u32,
    pub request_timeout: Option<Duration>,
    pub persist: bool,
    /// Only meaningful when `persist` is set; `None` means the default location.
    pub storage_dir: Option<PathBuf>,
}

/// Values given on the command line. `None`/`false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub top_k: Option<u32>,
    pub persist: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.ragchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ragchat").join("config.toml"))
}

/// Load config from `~/.ragchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RagChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RagChatConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(RagChatConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<RagChatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(RagChatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RagChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# ragchat configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [endpoint]
# url = "http://127.0.0.1:8000/ask"    # Or set RAGCHAT_ENDPOINT_URL
# top_k = 3                            # Or set RAGCHAT_TOP_K
# request_timeout_secs = 60            # Unset = wait indefinitely

# [storage]
# persist = false                      # Keep conversations between runs
# dir = "/home/me/.ragchat/conversations"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config from the process environment.
pub fn resolve(config: &RagChatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Collapse defaults → config file → env → CLI. `env` looks up a variable.
pub fn resolve_with_env(
    config: &RagChatConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Endpoint URL: CLI → env → config → default
    let endpoint_url = cli
        .url
        .clone()
        .or_else(|| env("RAGCHAT_ENDPOINT_URL"))
        .or_else(|| config.endpoint.url.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string());

    // top_k: CLI → env → config → default. A non-numeric env value is ignored.
    let env_top_k = env("RAGCHAT_TOP_K").and_then(|v| match v.trim().parse::<u32>() {
        Ok(k) => Some(k),
        Err(e) => {
            warn!("Ignoring RAGCHAT_TOP_K={v:?}: {e}");
            None
        }
    });
    let top_k = cli
        .top_k
        .or(env_top_k)
        .or(config.endpoint.top_k)
        .unwrap_or(DEFAULT_TOP_K);

    ResolvedConfig {
        endpoint_url,
        top_k,
        request_timeout: config
            .endpoint
            .request_timeout_secs
            .map(Duration::from_secs),
        persist: cli.persist || config.storage.persist.unwrap_or(false),
        storage_dir: config.storage.dir.clone(),
    }
}
