//! Search result and lifecycle types.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::entry::{EntryKind, FilesystemEntry};

/// A single entry found by a name search.
///
/// # Examples
///
/// ```
/// use tp_core::{EntryKind, SearchHit};
/// use camino::Utf8PathBuf;
///
/// let hit = SearchHit::new(
///     Utf8PathBuf::from("sub/b.txt"),
///     Utf8PathBuf::from("/root/sub/b.txt"),
///     EntryKind::File,
/// );
/// assert_eq!(hit.name(), "b.txt");
/// assert_eq!(hit.parent_display(), Some("sub"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Path relative to the search root (ancestor names joined with the
    /// entry name).
    pub relative_path: Utf8PathBuf,

    /// Absolute path of the entry.
    #[serde(skip)]
    pub path: Utf8PathBuf,

    /// File or directory.
    pub kind: EntryKind,
}

impl SearchHit {
    /// Creates a new hit.
    #[inline]
    #[must_use]
    pub const fn new(relative_path: Utf8PathBuf, path: Utf8PathBuf, kind: EntryKind) -> Self {
        Self {
            relative_path,
            path,
            kind,
        }
    }

    /// Returns the entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.relative_path
            .file_name()
            .unwrap_or(self.relative_path.as_str())
    }

    /// Returns the relative parent directory, or `None` for root-level hits.
    #[must_use]
    pub fn parent_display(&self) -> Option<&str> {
        self.relative_path
            .parent()
            .map(Utf8Path::as_str)
            .filter(|parent| !parent.is_empty())
    }

    /// Converts the hit to a filesystem entry for tree decoration.
    #[must_use]
    pub fn to_entry(&self) -> FilesystemEntry {
        FilesystemEntry::new(self.path.clone(), self.kind)
    }
}

/// Lifecycle phase of the search controller.
///
/// ```text
/// Idle ──► Searching(g) ──► Completed(g)
///               │
///               └──────────► Superseded(g)   (a newer generation started)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    /// No query is active.
    #[default]
    Idle,
    /// Generation `g` is still yielding results.
    Searching(u64),
    /// Generation `g` was replaced by a newer one before it finished.
    Superseded(u64),
    /// Generation `g` visited the whole tree.
    Completed(u64),
}

impl SearchPhase {
    /// Returns the generation this phase refers to, if any.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Searching(g) | Self::Superseded(g) | Self::Completed(g) => Some(g),
        }
    }

    /// Returns `true` while a generation is yielding results.
    #[inline]
    #[must_use]
    pub const fn is_searching(self) -> bool {
        matches!(self, Self::Searching(_))
    }
}
