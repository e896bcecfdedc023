//! Centralized error types for the remote
//!
//! All remote errors are represented by the `RemoteError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, RemoteError>`.
//!
//! None of these are fatal inside a running session: transport failures
//! surface as a `disconnected` state, malformed payloads are logged and
//! dropped. Errors are only returned to the front end driving the session.

use std::fmt;
use std::path::PathBuf;

/// All remote errors
#[derive(Debug)]
pub enum RemoteError {
    // === Config ===
    /// Failed to read or write the config file
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },

    // === Presets ===
    /// Failed to read or write the preset file
    PresetIo {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Preset rejected (empty name, unknown name, ...)
    Preset { reason: String },

    // === Parameters ===
    /// Key outside the known parameter enumeration
    UnknownParam { key: String },
    /// Value that cannot be turned into a parameter scalar
    InvalidValue { key: String, reason: String },

    // === Session ===
    /// The session task has stopped; the handle is stale
    SessionClosed,
    /// Gave up waiting for the device connection
    ConnectTimeout { url: String },

    // === Runtime ===
    /// Tokio runtime creation failed
    Runtime { source: std::io::Error },
    /// Reading or writing the terminal failed
    Terminal { source: std::io::Error },
}

/// Bare IO errors only come from the terminal front end
impl From<std::io::Error> for RemoteError {
    fn from(source: std::io::Error) -> Self {
        Self::Terminal { source }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigRead { source, .. }
            | Self::PresetIo { source, .. }
            | Self::Runtime { source }
            | Self::Terminal { source } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigRead { path, .. } => write!(f, "Config IO error: {}", path.display()),
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::PresetIo { path, .. } => write!(f, "Preset IO error: {}", path.display()),
            Self::Preset { reason } => write!(f, "Preset error: {}", reason),
            Self::UnknownParam { key } => write!(f, "Unknown parameter: {}", key),
            Self::InvalidValue { key, reason } => {
                write!(f, "Invalid value for {}: {}", key, reason)
            }
            Self::SessionClosed => write!(f, "Session closed"),
            Self::ConnectTimeout { url } => write!(f, "Timed out connecting to {}", url),
            Self::Runtime { .. } => write!(f, "Failed to create runtime"),
            Self::Terminal { source } => write!(f, "Terminal IO error: {}", source),
        }
    }
}

/// Alias for Result with RemoteError
pub type Result<T> = std::result::Result<T, RemoteError>;
