//! Host error types.

use thiserror::Error;

/// Errors that stop the host before or outside the analysis pipeline.
///
/// Plugin load and execution failures are not represented here: they are
/// recovered into run errors inside [`crate::AnalysisResult`].
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unrecognized output format name.
    #[error("Unknown output format '{0}' (expected 'text' or 'sarif')")]
    UnknownFormat(String),

    /// The analysis target does not exist.
    #[error("Target not found: {0}")]
    TargetNotFound(String),

    /// Plugin error.
    #[error("Plugin error: {0}")]
    Plugin(#[from] lintbridge_plugin::PluginError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
