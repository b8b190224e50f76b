//! Error types for the plugin binary.
//!
//! [`PluginError`] covers every way startup or the host connection can
//! fail. None of them are recoverable: without a live connection to the
//! host there is nothing useful to do, so `main` propagates them and the
//! process exits.

use crate::config::ConfigError;

/// Top-level error for the plugin binary.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Command-line registration parameters are missing or malformed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The face template failed to compile.
    #[error("template error: {0}")]
    Template(String),

    /// Could not open the WebSocket to the host.
    #[error("connect error: {0}")]
    Connect(String),

    /// The WebSocket failed after connecting.
    #[error("socket error: {0}")]
    Socket(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
