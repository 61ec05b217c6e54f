//! UI components for the TUI.
//!
//! - **Widgets** (`Widget` trait): `HeaderBar`, `StatusBar`, `SearchInput`,
//!   `HelpPanel`
//! - **Stateful Widgets** (`StatefulWidget` trait): `TreeView`,
//!   `SelectionPanel`, both driven by a [`CursorState`](crate::CursorState)

mod header;
mod help;
mod search_input;
mod selection_panel;
mod status_bar;
mod tree_view;

pub use header::HeaderBar;
pub use help::HelpPanel;
pub use search_input::SearchInput;
pub use selection_panel::SelectionPanel;
pub use status_bar::StatusBar;
pub use tree_view::TreeView;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "…";

/// Shortens `text` to at most `max_width` columns, keeping its end.
///
/// Paths are most recognizable by their last components, so the start is
/// replaced with an ellipsis.
pub(crate) fn truncate_start(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - ELLIPSIS.width();
    let mut used = 0;
    let mut start = text.len();
    for (index, ch) in text.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        start = index;
    }
    format!("{ELLIPSIS}{}", &text[start..])
}

/// Shortens `text` to at most `max_width` columns, keeping its start.
pub(crate) fn truncate_end(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - ELLIPSIS.width();
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_start_short() {
        assert_eq!(truncate_start("sub/b.txt", 20), "sub/b.txt");
    }

    #[test]
    fn test_truncate_start_long() {
        let truncated = truncate_start("very/long/path/to/some/nested/file.rs", 16);
        assert!(truncated.starts_with(ELLIPSIS));
        assert!(truncated.ends_with("file.rs"));
        assert!(truncated.width() <= 16);
    }

    #[test]
    fn test_truncate_counts_columns_not_bytes() {
        // Each CJK character is two columns wide.
        let truncated = truncate_end("文件文件文件", 7);
        assert_eq!(truncated, "文件文…");
        assert_eq!(truncated.width(), 7);

        assert_eq!(truncate_start("文件文件文件", 5), "…文件");
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate_end("abc", 0), "");
        assert_eq!(truncate_start("abc", 0), "");
    }
}
