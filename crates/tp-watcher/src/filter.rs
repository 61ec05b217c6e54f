//! Event filtering.
//!
//! Filters run on the blocking watcher thread, before events reach the
//! channel, so dropped events never cost an async wakeup.
//!
//! ```
//! use tp_watcher::{FileFilter, HiddenPathFilter};
//! use camino::Utf8Path;
//!
//! let filter = HiddenPathFilter::new("/root");
//! assert!(filter.should_process(Utf8Path::new("/root/sub/b.txt")));
//! assert!(!filter.should_process(Utf8Path::new("/root/.git/index")));
//! ```

use camino::{Utf8Path, Utf8PathBuf};

/// A predicate deciding which watcher events are forwarded.
///
/// Filters must be `Send + Sync + 'static` because they move into the
/// blocking watcher task.
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` if an event for `path` should be forwarded.
    fn should_process(&self, path: &Utf8Path) -> bool;
}

/// Forwards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl FileFilter for AcceptAllFilter {
    #[inline]
    fn should_process(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// Drops events for paths that the tree never shows.
///
/// A path is hidden when any component below `root` starts with a dot, e.g.
/// `/root/.git/index` or `/root/sub/.cache`. Components of `root` itself are
/// not inspected, so watching a tree that lives under a dot-directory works.
#[derive(Debug, Clone)]
pub struct HiddenPathFilter {
    root: Utf8PathBuf,
}

impl HiddenPathFilter {
    /// Creates a filter for events under `root`.
    ///
    /// `root` should be in the same form the watcher reports, i.e.
    /// canonicalized.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root below which components are inspected.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl FileFilter for HiddenPathFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        !relative
            .components()
            .any(|component| component.as_str().starts_with('.') && component.as_str() != "..")
    }
}

impl<F: FileFilter + ?Sized> FileFilter for Box<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

impl<F: FileFilter + ?Sized> FileFilter for std::sync::Arc<F> {
    fn should_process(&self, path: &Utf8Path) -> bool {
        (**self).should_process(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all_filter() {
        assert!(AcceptAllFilter.should_process(Utf8Path::new("/root/.env")));
    }

    #[test]
    fn test_hidden_filter_nested_component() {
        let filter = HiddenPathFilter::new("/root");
        assert!(!filter.should_process(Utf8Path::new("/root/sub/.cache/x")));
        assert!(!filter.should_process(Utf8Path::new("/root/.env")));
        assert!(filter.should_process(Utf8Path::new("/root/sub/c.txt")));
    }

    #[test]
    fn test_hidden_filter_ignores_root_components() {
        let filter = HiddenPathFilter::new("/home/user/.config/project");
        assert!(filter.should_process(Utf8Path::new("/home/user/.config/project/a.txt")));
        assert!(!filter.should_process(Utf8Path::new("/home/user/.config/project/.git")));
    }

    #[test]
    fn test_boxed_filter() {
        let filter: Box<dyn FileFilter> = Box::new(HiddenPathFilter::new("/root"));
        assert!(!filter.should_process(Utf8Path::new("/root/.git")));
    }
}
