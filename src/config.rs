//! Configuration management
//!
//! Config file is stored next to the executable as `config.toml`
//! (falling back to `config/default.toml`). The user preset file lives in
//! the same directory.

use crate::constants::{
    DEFAULT_DEVICE_URL, DEFAULT_PRESET_FILE, INITIAL_CONNECT_DELAY_MS, PROGRESS_TICK_MS,
};
use crate::error::{RemoteError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub transition: TransitionConfig,
    pub presets: PresetsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// WebSocket endpoint of the installation
    pub url: String,

    /// Connect once automatically at startup
    pub auto_connect: bool,

    /// Delay before the automatic connect (milliseconds)
    pub connect_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Progress recompute interval while a blend runs (milliseconds)
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetsConfig {
    /// Preset file, relative to the config directory unless absolute
    pub file: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DEVICE_URL.to_string(),
            auto_connect: true,
            connect_delay_ms: INITIAL_CONNECT_DELAY_MS,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: PROGRESS_TICK_MS,
        }
    }
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_PRESET_FILE),
        }
    }
}

impl Config {
    /// Check values the session depends on
    pub fn validate(&self) -> Result<()> {
        let url = self.device.url.trim();
        if url.is_empty() {
            return Err(RemoteError::ConfigValidation {
                field: "device.url",
                reason: "must not be empty".into(),
            });
        }
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(RemoteError::ConfigValidation {
                field: "device.url",
                reason: format!("'{}' is not a ws:// or wss:// URL", url),
            });
        }
        if self.transition.tick_interval_ms == 0 {
            return Err(RemoteError::ConfigValidation {
                field: "transition.tick_interval_ms",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Preset file path, resolved against the directory of `config_path`
    pub fn preset_path(&self, config_path: &Path) -> PathBuf {
        if self.presets.file.is_absolute() {
            return self.presets.file.clone();
        }
        config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&self.presets.file)
    }
}

/// Get the project root directory
///
/// Searches in order:
/// 1. Next to executable (production deployment)
/// 2. Up from target/release or target/debug (dev builds)
fn find_project_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| RemoteError::ConfigRead {
        path: PathBuf::from("executable"),
        source: e,
    })?;
    let exe_dir = exe.parent().ok_or_else(|| RemoteError::ConfigValidation {
        field: "exe_path",
        reason: "no parent directory".into(),
    })?;

    // Check if config exists next to executable (production)
    if exe_dir.join("config.toml").exists() || exe_dir.join("config").exists() {
        return Ok(exe_dir.to_path_buf());
    }

    // Check if we're in target/release or target/debug (dev)
    if let Some(target_dir) = exe_dir.parent() {
        if target_dir
            .file_name()
            .map(|n| n == "target")
            .unwrap_or(false)
        {
            if let Some(project_root) = target_dir.parent() {
                if project_root.join("config").exists() {
                    return Ok(project_root.to_path_buf());
                }
            }
        }
    }

    // Fallback to exe_dir
    Ok(exe_dir.to_path_buf())
}

/// Get the config file path
///
/// Looks for config.toml, falls back to config/default.toml
pub fn config_path() -> Result<PathBuf> {
    let root = find_project_root()?;

    let user_config = root.join("config.toml");
    if user_config.exists() {
        return Ok(user_config);
    }

    let default_config = root.join("config").join("default.toml");
    if default_config.exists() {
        return Ok(default_config);
    }

    // Return user config path (will be created if saving)
    Ok(user_config)
}

/// Load config from `path`, or create it with defaults if it does not exist
///
/// Never fails: unreadable or invalid files fall back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        let config = Config::default();
        if let Err(e) = save_to(&config, path) {
            warn!("Failed to create default config: {}", e);
        }
        return config;
    }

    match fs::read_to_string(path) {
        Ok(content) => parse(&content).unwrap_or_else(|e| {
            warn!("Config parse error in {:?}: {}, using defaults", path, e);
            Config::default()
        }),
        Err(e) => {
            warn!("Failed to read config {:?}: {}, using defaults", path, e);
            Config::default()
        }
    }
}

/// Load config from the default location
pub fn load() -> (Config, PathBuf) {
    match config_path() {
        Ok(path) => (load_from(&path), path),
        Err(e) => {
            warn!("Failed to determine config path: {}, using defaults", e);
            (Config::default(), PathBuf::from("config.toml"))
        }
    }
}

/// Parse config text
pub fn parse(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Save config to `path`
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).map_err(|e| RemoteError::ConfigValidation {
        field: "config",
        reason: e.to_string(),
    })?;
    fs::write(path, content).map_err(|e| RemoteError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })
}

// ============================================================================
// Tests
// ============================================================================
