//! Error types for the tp-engine crate.

use camino::Utf8PathBuf;
use tp_watcher::WatchError;

/// Errors surfaced by the engine.
///
/// Listing failures never show up here: the lister recovers from them
/// locally. What remains are the failures a caller has to act on.
///
/// # Error Recovery Strategy
///
/// - [`EngineError::NotFound`]: the toggled path vanished; the selection is
///   unchanged and the caller may simply refresh.
/// - [`EngineError::Stat`]: a selected path vanished before a snapshot; the
///   caller can drop it with `uncheck_item_by_path` and retry.
/// - [`EngineError::InvalidRoot`], [`EngineError::NonUtf8Path`] and
///   [`EngineError::Watch`] are fatal for the engine instance.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The path passed to a toggle does not exist any more.
    #[error("path not found: {path}")]
    NotFound {
        /// The path that could not be stat'ed.
        path: Utf8PathBuf,
    },

    /// A selected path could not be stat'ed while building a snapshot.
    #[error("failed to stat selected path {path}: {source}")]
    Stat {
        /// The selected path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The tree root is unusable.
    #[error("invalid tree root '{path}': {reason}")]
    InvalidRoot {
        /// The configured root.
        path: Utf8PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// The tree watcher failed.
    #[error(transparent)]
    Watch(#[from] WatchError),
}

impl EngineError {
    /// Creates a new [`EngineError::NotFound`] error.
    #[inline]
    pub fn not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a new [`EngineError::Stat`] error.
    #[inline]
    pub fn stat(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`EngineError::InvalidRoot`] error.
    #[inline]
    pub fn invalid_root(path: impl Into<Utf8PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the engine stays usable after this error.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Stat { .. })
    }

    /// Returns `true` if the engine instance cannot continue.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::NotFound { path } | Self::Stat { path, .. } | Self::InvalidRoot { path, .. } => {
                Some(path)
            }
            Self::Watch(err) => err.path(),
            Self::NonUtf8Path(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_is_recoverable() {
        let err = EngineError::not_found("/root/sub");
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "path not found: /root/sub");
        assert_eq!(err.path().map(|p| p.as_str()), Some("/root/sub"));
    }

    #[test]
    fn test_stat_keeps_source() {
        let err = EngineError::stat(
            "/root/a.txt",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_recoverable());
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/root/a.txt"));
    }

    #[test]
    fn test_invalid_root_is_fatal() {
        let err = EngineError::invalid_root("/nope", "does not exist");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_watch_error_path_passthrough() {
        let err = EngineError::from(WatchError::path_not_found("/watched"));
        assert!(err.is_fatal());
        assert_eq!(err.path().map(|p| p.as_str()), Some("/watched"));
    }
}
