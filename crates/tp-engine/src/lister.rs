//! Directory listing.
//!
//! [`EntryLister`] is the only place that reads directories. Every other part
//! of the engine (cascade enumeration, the search walker, the tree adapter)
//! goes through it, so ordering, hidden-entry filtering and error recovery
//! are decided once.
//!
//! # Ordering
//!
//! ```text
//! sub/        ┐
//! zeta/       ┘ directories, byte-wise ascending
//! B.txt       ┐
//! a.txt       ┘ files, byte-wise ascending
//! ```

use std::io;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use tp_core::{EntryKind, FilesystemEntry, FxHashSet};

/// Lists the immediate entries of a directory.
///
/// Listing never fails from the caller's point of view: any I/O error on the
/// directory itself yields an empty listing and a `warn!` event.
///
/// # Examples
///
/// ```no_run
/// use tp_engine::EntryLister;
/// use camino::Utf8Path;
///
/// # async fn example() {
/// let lister = EntryLister::new();
/// for entry in lister.list(Utf8Path::new("/srv/tree")).await {
///     println!("{} ({})", entry.name, entry.kind.label());
/// }
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryLister {
    show_hidden: bool,
}

impl EntryLister {
    /// Creates a lister that skips dot-entries.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { show_hidden: false }
    }

    /// Configures whether dot-entries are listed.
    #[inline]
    #[must_use]
    pub const fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    /// Returns `true` if dot-entries are listed.
    #[inline]
    #[must_use]
    pub const fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Lists `dir`: directories first, then files, each group sorted by name.
    ///
    /// Symlinks take the kind of their target; dangling links are skipped.
    pub async fn list(&self, dir: &Utf8Path) -> Vec<FilesystemEntry> {
        match self.try_list(dir).await {
            Ok(entries) => {
                debug!(path = %dir, count = entries.len(), "Listed directory");
                entries
            }
            Err(error) => {
                warn!(path = %dir, error = %error, "Failed to list directory");
                Vec::new()
            }
        }
    }

    async fn try_list(&self, dir: &Utf8Path) -> io::Result<Vec<FilesystemEntry>> {
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        while let Some(entry) = read_dir.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(dir = %dir, name = ?raw, "Skipping entry with non-UTF-8 name");
                    continue;
                }
            };
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }

            let path = dir.join(&name);
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(error) => {
                    warn!(path = %path, error = %error, "Skipping entry with unreadable type");
                    continue;
                }
            };

            let is_dir = if file_type.is_symlink() {
                match tokio::fs::metadata(&path).await {
                    Ok(meta) => meta.is_dir(),
                    Err(_) => {
                        debug!(path = %path, "Skipping dangling symlink");
                        continue;
                    }
                }
            } else {
                file_type.is_dir()
            };

            let entry = FilesystemEntry::new(path, EntryKind::from_is_dir(is_dir));
            if is_dir {
                dirs.push(entry);
            } else {
                files.push(entry);
            }
        }

        dirs.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        files.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        dirs.append(&mut files);
        Ok(dirs)
    }

    /// Returns every file below `dir`, read fresh from disk.
    ///
    /// Walks with [`list`](Self::list) at every level, so hidden entries and
    /// unreadable subtrees are skipped the same way. Directories reached
    /// twice through symlinks are only walked once.
    pub async fn descendant_files(&self, dir: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut guard = LoopGuard::default();
        let mut pending = vec![dir.to_owned()];
        let mut files = Vec::new();

        while let Some(current) = pending.pop() {
            if !guard.enter(&current).await {
                continue;
            }
            for entry in self.list(&current).await {
                match entry.kind {
                    EntryKind::Directory => pending.push(entry.path),
                    EntryKind::File => files.push(entry.path),
                }
            }
        }

        debug!(path = %dir, count = files.len(), "Enumerated descendant files");
        files
    }

    /// Stats `path`, following symlinks.
    pub async fn stat(&self, path: &Utf8Path) -> io::Result<EntryKind> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(EntryKind::from_is_dir(meta.is_dir()))
    }
}

/// Remembers the canonical form of every directory walked so far.
#[derive(Debug, Default)]
pub(crate) struct LoopGuard {
    seen: FxHashSet<PathBuf>,
}

impl LoopGuard {
    /// Returns `false` if `dir` resolves to an already-walked directory.
    ///
    /// A directory that cannot be canonicalized is let through; the listing
    /// that follows reports the failure.
    pub(crate) async fn enter(&mut self, dir: &Utf8Path) -> bool {
        match tokio::fs::canonicalize(dir).await {
            Ok(canonical) => {
                let first = self.seen.insert(canonical);
                if !first {
                    debug!(path = %dir, "Skipping directory already walked");
                }
                first
            }
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{scenario_tree, write_file};

    fn names(entries: &[FilesystemEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_directories_before_files_byte_order() {
        let (_dir, root) = scenario_tree();
        write_file(&root.join("B.txt"));
        std::fs::create_dir(root.join("Zeta")).unwrap();

        let entries = EntryLister::new().list(&root).await;
        assert_eq!(names(&entries), vec!["Zeta", "sub", "B.txt", "a.txt"]);
        assert!(entries[0].is_dir());
        assert!(!entries[3].is_dir());
        assert_eq!(entries[3].path, root.join("a.txt"));
    }

    #[tokio::test]
    async fn test_hidden_entries_excluded() {
        let (_dir, root) = scenario_tree();
        let entries = EntryLister::new().list(&root).await;
        assert!(entries.iter().all(|e| !e.name.starts_with('.')));

        let all = EntryLister::new().with_show_hidden(true).list(&root).await;
        assert_eq!(names(&all), vec![".hidden", "sub", ".env", "a.txt"]);
    }

    #[tokio::test]
    async fn test_missing_directory_yields_empty() {
        let (_dir, root) = scenario_tree();
        let entries = EntryLister::new().list(&root.join("missing")).await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_listing_a_file_yields_empty() {
        let (_dir, root) = scenario_tree();
        assert!(EntryLister::new().list(&root.join("a.txt")).await.is_empty());
    }

    #[tokio::test]
    async fn test_descendant_files() {
        let (_dir, root) = scenario_tree();
        std::fs::create_dir(root.join("sub/deep")).unwrap();
        write_file(&root.join("sub/deep/d.txt"));

        let mut files = EntryLister::new().descendant_files(&root.join("sub")).await;
        files.sort();
        assert_eq!(
            files,
            vec![
                root.join("sub/b.txt"),
                root.join("sub/c.txt"),
                root.join("sub/deep/d.txt"),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_follow_target_and_loops_terminate() {
        let (_dir, root) = scenario_tree();
        std::os::unix::fs::symlink(&root, root.join("sub/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("nowhere"), root.join("dangling")).unwrap();

        let lister = EntryLister::new();
        let entries = lister.list(&root.join("sub")).await;
        assert_eq!(names(&entries), vec!["loop", "b.txt", "c.txt"]);
        assert!(entries[0].is_dir());

        assert!(!names(&lister.list(&root).await).contains(&"dangling"));

        let files = lister.descendant_files(&root).await;
        assert_eq!(files.len(), 3);
    }

    #[tokio::test]
    async fn test_stat() {
        let (_dir, root) = scenario_tree();
        let lister = EntryLister::new();
        assert_eq!(
            lister.stat(&root.join("sub")).await.unwrap(),
            EntryKind::Directory
        );
        assert_eq!(lister.stat(&root.join("a.txt")).await.unwrap(), EntryKind::File);
        assert!(lister.stat(&root.join("missing")).await.is_err());
    }
}
