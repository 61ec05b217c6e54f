//! Tree-widget node types.
//!
//! A [`TreeNode`] is what `get_children` hands to the host UI: an entry plus
//! its checked state, derived from the selection set when the node is built.
//! A [`TreeItem`] is the renderable form of a node.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::entry::{EntryKind, FilesystemEntry};
use super::selection::CheckState;

/// A child returned by the tree adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeNode {
    /// The underlying filesystem entry.
    pub entry: FilesystemEntry,

    /// Checked state at the time the node was produced.
    pub checked: CheckState,

    /// Search-mode context: the hit's parent directory relative to the root.
    pub context: Option<String>,
}

impl TreeNode {
    /// Creates a node for an ordinary listing.
    #[inline]
    #[must_use]
    pub const fn new(entry: FilesystemEntry, checked: CheckState) -> Self {
        Self {
            entry,
            checked,
            context: None,
        }
    }

    /// Attaches search-mode context.
    #[must_use]
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }
}

/// Whether a rendered node can be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collapsible {
    /// Terminal node (files).
    None,
    /// Expandable node, initially collapsed (directories).
    Collapsed,
}

/// The renderable form of a [`TreeNode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeItem {
    /// Display label (the entry name).
    pub label: String,

    /// Absolute path, used as the node identity.
    pub path: Utf8PathBuf,

    /// File or directory.
    pub kind: EntryKind,

    /// Expandability.
    pub collapsible: Collapsible,

    /// Checkbox state.
    pub checked: CheckState,

    /// Secondary text, e.g. the parent directory of a search hit.
    pub description: Option<String>,
}

impl From<&TreeNode> for TreeItem {
    fn from(node: &TreeNode) -> Self {
        let FilesystemEntry { name, path, kind } = &node.entry;
        Self {
            label: name.clone(),
            path: path.clone(),
            kind: *kind,
            collapsible: if kind.is_dir() {
                Collapsible::Collapsed
            } else {
                Collapsible::None
            },
            checked: node.checked,
            description: node.context.clone(),
        }
    }
}
