//! Error types for the tp-watcher crate.

use camino::Utf8PathBuf;

/// Errors that can occur while watching a tree.
///
/// # Error Recovery Strategy
///
/// - [`WatchError::Notify`], [`WatchError::PathNotFound`],
///   [`WatchError::ChannelClosed`] and [`WatchError::Io`] stop the watcher.
/// - [`WatchError::NonUtf8Path`] is recoverable: the event is skipped.
///
/// # Examples
///
/// ```
/// use tp_watcher::WatchError;
///
/// let err = WatchError::path_not_found("/missing/root");
/// assert!(err.is_fatal());
/// assert_eq!(err.to_string(), "watch root does not exist: /missing/root");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Failed to initialize or operate the notify watcher.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The watch root does not exist.
    #[error("watch root does not exist: {0}")]
    PathNotFound(Utf8PathBuf),

    /// The watch root exists but is not a directory.
    #[error("watch root is not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    /// The batch channel was closed while the watcher was still running.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// A path in an event is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// An I/O error occurred while resolving the watch root.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Creates a new [`WatchError::PathNotFound`] error.
    #[inline]
    pub fn path_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Creates a new [`WatchError::NonUtf8Path`] error.
    #[inline]
    pub fn non_utf8_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::NonUtf8Path(path.into())
    }

    /// Returns `true` if watching can continue after this error.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonUtf8Path(_))
    }

    /// Returns `true` if this error stops the watcher.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::PathNotFound(path) | Self::NotADirectory(path) => Some(path),
            Self::Notify(_) | Self::ChannelClosed | Self::NonUtf8Path(_) | Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_path_not_found_is_fatal() {
        let err = WatchError::path_not_found("/srv/tree");
        assert!(err.is_fatal());
        assert_eq!(err.path().map(|p| p.as_str()), Some("/srv/tree"));
    }

    #[test]
    fn test_not_a_directory_has_path() {
        let err = WatchError::NotADirectory(Utf8PathBuf::from("/srv/tree/a.txt"));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("not a directory"));
        assert!(err.path().is_some());
    }

    #[test]
    fn test_non_utf8_is_recoverable() {
        let err = WatchError::non_utf8_path(PathBuf::from("bad"));
        assert!(err.is_recoverable());
        assert!(err.path().is_none());
    }

    #[test]
    fn test_channel_closed_display() {
        let err = WatchError::ChannelClosed;
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "event channel closed unexpectedly");
    }
}
