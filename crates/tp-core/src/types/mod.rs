//! Domain types for treepick.
//!
//! # Module Organization
//!
//! - [`entry`] - Filesystem entries and their kind
//! - [`selection`] - Selection snapshot items and checked state
//! - [`search`] - Search hits and the search lifecycle phase
//! - [`tree`] - Tree-widget nodes and renderable items
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use tp_core::{EntryKind, FilesystemEntry, SelectedItem, SearchHit, TreeItem};
//! ```

mod entry;
mod search;
mod selection;
mod tree;

pub use entry::{EntryKind, FilesystemEntry};
pub use search::{SearchHit, SearchPhase};
pub use selection::{CheckState, SelectedItem};
pub use tree::{Collapsible, TreeItem, TreeNode};
