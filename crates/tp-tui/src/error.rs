//! TUI-specific error types.

use thiserror::Error;
use tp_engine::EngineError;
use tp_watcher::WatchError;

/// Errors that can occur in the TUI.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TuiError {
    /// Terminal initialization or operation failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Event channel was closed unexpectedly.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// The picker engine reported an error.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// File watcher operation failed.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatchError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TuiError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if the UI can keep running after this error.
    ///
    /// Engine errors (a toggled entry vanished, a selected path no longer
    /// stats) are reported in the status bar and the loop continues.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Engine(error) => error.is_recoverable(),
            Self::Watcher(error) => error.is_recoverable(),
            Self::Terminal(_) | Self::ChannelClosed | Self::Config(_) => false,
        }
    }
}
