//! Event types emitted by the tree watcher.
//!
//! # Event Flow
//!
//! ```text
//! filesystem change
//!        │
//!        ▼
//! notify-debouncer-mini (debounce window)
//!        │
//!        ▼
//!   FileEventBatch (one per debouncer callback)
//!        │
//!        ▼
//!   mpsc channel ──► tree refresh
//! ```

use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// What happened to a path.
///
/// The mini debouncer reports "something happened" per path without telling
/// creation from modification, so both surface as [`FileEventKind::Changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileEventKind {
    /// The path was created or modified and still exists.
    Changed,
    /// The path no longer exists.
    Removed,
}

impl FileEventKind {
    /// Classifies an event by checking whether `path` still exists.
    #[must_use]
    pub fn probe(path: &Utf8Path) -> Self {
        // symlink_metadata so a dangling link still counts as present
        if path.symlink_metadata().is_ok() {
            Self::Changed
        } else {
            Self::Removed
        }
    }
}

/// A change to one path under the watched root.
///
/// # Examples
///
/// ```
/// use tp_watcher::{FileEvent, FileEventKind};
/// use camino::Utf8PathBuf;
///
/// let event = FileEvent::new(Utf8PathBuf::from("/root/sub/b.txt"), FileEventKind::Removed);
/// assert_eq!(event.file_name(), Some("b.txt"));
/// assert!(event.is_removal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Absolute path of the changed entry.
    pub path: Utf8PathBuf,

    /// Change classification.
    pub kind: FileEventKind,

    /// When the event left the debouncer.
    pub timestamp: Instant,
}

impl FileEvent {
    /// Creates a new event stamped with the current instant.
    #[inline]
    #[must_use]
    pub fn new(path: Utf8PathBuf, kind: FileEventKind) -> Self {
        Self {
            path,
            kind,
            timestamp: Instant::now(),
        }
    }

    /// Returns `true` if the path no longer exists.
    #[inline]
    #[must_use]
    pub const fn is_removal(&self) -> bool {
        matches!(self.kind, FileEventKind::Removed)
    }

    /// Returns the file name component.
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }
}

/// The events delivered by a single debouncer callback.
///
/// Inline storage covers the usual handful of paths touched by one save.
#[derive(Debug, Clone)]
pub struct FileEventBatch {
    /// The events in this batch.
    pub events: SmallVec<[FileEvent; 8]>,

    /// When the batch was assembled.
    pub received_at: Instant,
}

impl FileEventBatch {
    /// Creates an empty batch.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: SmallVec::new(),
            received_at: Instant::now(),
        }
    }

    /// Adds an event to the batch.
    #[inline]
    pub fn push(&mut self, event: FileEvent) {
        self.events.push(event);
    }

    /// Returns the number of events.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the batch holds no events.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns an iterator over the events.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &FileEvent> {
        self.events.iter()
    }

    /// Returns the distinct paths in this batch, sorted.
    #[must_use]
    pub fn unique_paths(&self) -> Vec<&Utf8Path> {
        let mut paths: Vec<&Utf8Path> = self.events.iter().map(|e| e.path.as_path()).collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }

    /// Summarizes the batch for logging.
    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        let removed = self.events.iter().filter(|e| e.is_removal()).count();
        BatchSummary {
            total: self.len(),
            changed: self.len() - removed,
            removed,
            unique_paths: self.unique_paths().len(),
        }
    }
}

impl Default for FileEventBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for FileEventBatch {
    type Item = FileEvent;
    type IntoIter = smallvec::IntoIter<[FileEvent; 8]>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileEventBatch {
    type Item = &'a FileEvent;
    type IntoIter = std::slice::Iter<'a, FileEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<FileEvent> for FileEventBatch {
    fn from_iter<T: IntoIterator<Item = FileEvent>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
            received_at: Instant::now(),
        }
    }
}

/// Counts describing one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of events.
    pub total: usize,
    /// Events whose path still exists.
    pub changed: usize,
    /// Events whose path is gone.
    pub removed: usize,
    /// Distinct paths touched.
    pub unique_paths: usize,
}
