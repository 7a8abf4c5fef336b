//! Plugin error types.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur in the plugin system.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin file does not exist.
    #[error("Plugin not found: {0}")]
    NotFound(String),

    /// The file exists but could not be instantiated as a plugin module.
    #[error("Failed to load plugin '{path}': {cause}")]
    Load { path: String, cause: String },

    /// A plugin function failed or trapped.
    #[error("Plugin call failed: {0}")]
    Call(String),

    /// The module's `get_manifest` output was unusable.
    #[error("Invalid manifest in '{path}': {cause}")]
    InvalidManifest { path: String, cause: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Creates a not found error.
    pub fn not_found(path: &Path) -> Self {
        Self::NotFound(path.display().to_string())
    }

    /// Creates a load error for `path`.
    pub fn load(path: &Path, cause: impl ToString) -> Self {
        Self::Load {
            path: path.display().to_string(),
            cause: cause.to_string(),
        }
    }

    /// Creates a call error.
    pub fn call(message: impl Into<String>) -> Self {
        Self::Call(message.into())
    }

    /// Creates an invalid manifest error for `path`.
    pub fn invalid_manifest(path: &Path, cause: impl ToString) -> Self {
        Self::InvalidManifest {
            path: path.display().to_string(),
            cause: cause.to_string(),
        }
    }
}
