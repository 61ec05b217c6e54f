//! Filesystem entry types.
//!
//! A [`FilesystemEntry`] is produced on demand by a directory listing and is
//! not cached beyond that listing.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Whether an entry is a file or a directory.
///
/// Directories are collapsible containers in the tree; files are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A directory. Sorts before files.
    Directory,
    /// A regular file (or anything that is not a directory).
    File,
}

impl EntryKind {
    /// Returns `true` for [`EntryKind::Directory`].
    #[inline]
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns the kind matching an `is_dir` flag.
    #[inline]
    #[must_use]
    pub const fn from_is_dir(is_dir: bool) -> Self {
        if is_dir { Self::Directory } else { Self::File }
    }

    /// Returns a short human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Directory => "dir",
            Self::File => "file",
        }
    }
}

/// A single entry of a directory listing.
///
/// # Examples
///
/// ```
/// use tp_core::{EntryKind, FilesystemEntry};
/// use camino::Utf8PathBuf;
///
/// let entry = FilesystemEntry::new(Utf8PathBuf::from("/root/sub/b.txt"), EntryKind::File);
/// assert_eq!(entry.name, "b.txt");
/// assert!(!entry.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilesystemEntry {
    /// The entry's file name (last path component).
    pub name: String,

    /// Absolute path of the entry.
    pub path: Utf8PathBuf,

    /// File or directory.
    pub kind: EntryKind,
}

impl FilesystemEntry {
    /// Creates an entry, taking the name from the last path component.
    #[must_use]
    pub fn new(path: Utf8PathBuf, kind: EntryKind) -> Self {
        let name = path.file_name().unwrap_or(path.as_str()).to_owned();
        Self { name, path, kind }
    }

    /// Returns `true` if this entry is a directory.
    #[inline]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Returns `true` if the entry name starts with a dot.
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Returns the entry path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_sort_before_files() {
        assert!(EntryKind::Directory < EntryKind::File);
    }

    #[test]
    fn test_entry_name_from_path() {
        let entry = FilesystemEntry::new(Utf8PathBuf::from("/root/.git"), EntryKind::Directory);
        assert_eq!(entry.name, ".git");
        assert!(entry.is_hidden());
        assert!(entry.is_dir());
    }

    #[test]
    fn test_from_is_dir() {
        assert_eq!(EntryKind::from_is_dir(true), EntryKind::Directory);
        assert_eq!(EntryKind::from_is_dir(false), EntryKind::File);
        assert_eq!(EntryKind::File.label(), "file");
    }
}
