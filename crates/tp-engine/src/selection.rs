//! The selection set and its directory cascade.
//!
//! The set stores absolute paths only. Whether a path is a file or a
//! directory is never stored; it is re-derived from the filesystem whenever
//! it matters (cascade direction at toggle time, `is_directory` at snapshot
//! time).
//!
//! # Cascade semantics
//!
//! Selecting a directory adds the directory and every file below it *as the
//! filesystem looks at that moment*. The set is never reconciled afterwards:
//! a file created later under a selected directory is not selected, and a
//! file deleted later stays in the set until a toggle or an explicit
//! [`SelectionSet::remove_by_path`] removes it. A snapshot that hits such a
//! stale path reports [`EngineError::Stat`].
//!
//! The descendant list is computed completely before the set is touched, so
//! a toggle is applied in one step under the lock or not at all.

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use tracing::debug;

use tp_core::{EntryKind, FxHashSet, SelectedItem};

use crate::error::EngineError;
use crate::lister::EntryLister;

/// Result of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The path (and its descendants, for a directory) was added.
    Selected {
        /// Number of paths newly added to the set.
        added: usize,
    },
    /// The path (and its current descendants, for a directory) was removed.
    Deselected {
        /// Number of paths removed from the set.
        removed: usize,
    },
}

impl ToggleOutcome {
    /// Returns `true` if the toggle selected the path.
    #[inline]
    #[must_use]
    pub const fn is_selected(self) -> bool {
        matches!(self, Self::Selected { .. })
    }

    /// Returns how many paths changed membership.
    #[inline]
    #[must_use]
    pub const fn touched(self) -> usize {
        match self {
            Self::Selected { added } => added,
            Self::Deselected { removed } => removed,
        }
    }
}

/// The set of selected absolute paths.
///
/// Mutated only through [`toggle`](Self::toggle) and
/// [`remove_by_path`](Self::remove_by_path). The internal lock is never held
/// across an await point.
#[derive(Debug, Default)]
pub struct SelectionSet {
    lister: EntryLister,
    paths: Mutex<FxHashSet<Utf8PathBuf>>,
}

impl SelectionSet {
    /// Creates an empty set that enumerates cascades with `lister`.
    #[must_use]
    pub fn new(lister: EntryLister) -> Self {
        Self {
            lister,
            paths: Mutex::new(FxHashSet::default()),
        }
    }

    /// Selects `path` if it is unselected, deselects it otherwise.
    ///
    /// `kind` is what the caller believes the path to be. The cascade follows
    /// a fresh stat instead, so a path replaced on disk since it was rendered
    /// cascades according to what it is now.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if `path` cannot be stat'ed. The set
    /// is unchanged in that case.
    pub async fn toggle(
        &self,
        path: &Utf8Path,
        kind: EntryKind,
    ) -> Result<ToggleOutcome, EngineError> {
        let Ok(actual) = self.lister.stat(path).await else {
            return Err(EngineError::not_found(path));
        };
        if actual != kind {
            debug!(path = %path, expected = ?kind, actual = ?actual, "Entry kind changed on disk");
        }

        let descendants = if actual.is_dir() {
            self.lister.descendant_files(path).await
        } else {
            Vec::new()
        };

        let mut paths = self.paths.lock();
        let outcome = if paths.contains(path) {
            let removed = descendants
                .iter()
                .filter(|descendant| paths.remove(descendant.as_path()))
                .count();
            paths.remove(path);
            ToggleOutcome::Deselected {
                removed: removed + 1,
            }
        } else {
            let added = descendants
                .into_iter()
                .filter(|descendant| paths.insert(descendant.clone()))
                .count();
            paths.insert(path.to_owned());
            ToggleOutcome::Selected { added: added + 1 }
        };

        debug!(path = %path, ?outcome, total = paths.len(), "Toggled selection");
        Ok(outcome)
    }

    /// Removes exactly `path`, without cascading.
    ///
    /// Returns `false` if it was not selected.
    pub fn remove_by_path(&self, path: &Utf8Path) -> bool {
        let removed = self.paths.lock().remove(path);
        if removed {
            debug!(path = %path, "Removed path from selection");
        }
        removed
    }

    /// Materializes the selection, sorted by path, with a fresh stat per
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Stat`] for the first selected path that can no
    /// longer be stat'ed.
    pub async fn snapshot(&self) -> Result<Vec<SelectedItem>, EngineError> {
        let paths = self.paths();
        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            let kind = self
                .lister
                .stat(&path)
                .await
                .map_err(|source| EngineError::stat(path.clone(), source))?;
            items.push(SelectedItem::new(path, kind.is_dir()));
        }
        Ok(items)
    }

    /// Returns `true` if `path` is selected.
    #[must_use]
    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.paths.lock().contains(path)
    }

    /// Returns the number of selected paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.lock().len()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.lock().is_empty()
    }

    /// Returns the selected paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        let mut paths: Vec<Utf8PathBuf> = self.paths.lock().iter().cloned().collect();
        paths.sort_unstable();
        paths
    }

    /// Deselects everything.
    pub fn clear(&self) {
        self.paths.lock().clear();
    }
}
