//! Selection snapshot types.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// One element of a selection snapshot.
///
/// `is_directory` comes from a fresh stat taken when the snapshot is built,
/// never from cached state. Serializes as `{ "path", "isDirectory" }` for
/// downstream consumers.
///
/// # Examples
///
/// ```
/// use tp_core::SelectedItem;
/// use camino::Utf8PathBuf;
///
/// let item = SelectedItem::new(Utf8PathBuf::from("/root/sub"), true);
/// let json = serde_json::to_string(&item).unwrap();
/// assert_eq!(json, r#"{"path":"/root/sub","isDirectory":true}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    /// Absolute path of the selected entry.
    pub path: Utf8PathBuf,

    /// Whether the path was a directory when the snapshot was taken.
    pub is_directory: bool,
}

impl SelectedItem {
    /// Creates a new snapshot item.
    #[inline]
    #[must_use]
    pub const fn new(path: Utf8PathBuf, is_directory: bool) -> Self {
        Self { path, is_directory }
    }
}

/// Checkbox state of a rendered tree node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// The node's path is in the selection set.
    Checked,
    /// The node's path is not in the selection set.
    #[default]
    Unchecked,
}

impl CheckState {
    /// Returns the state matching a membership flag.
    #[inline]
    #[must_use]
    pub const fn from_selected(selected: bool) -> Self {
        if selected { Self::Checked } else { Self::Unchecked }
    }

    /// Returns `true` for [`CheckState::Checked`].
    #[inline]
    #[must_use]
    pub const fn is_checked(self) -> bool {
        matches!(self, Self::Checked)
    }
}
