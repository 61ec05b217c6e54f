//! Selection panel component.
//!
//! Lists the last selection snapshot broadcast by the engine, paths shown
//! relative to the tree root.

use camino::Utf8Path;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, HighlightSpacing, List, ListItem, ListState, StatefulWidget,
};
use tp_core::{EntryKind, SelectedItem};

use super::truncate_start;
use crate::app::{CursorState, display_path};
use crate::theme::Theme;

/// Columns taken by borders, highlight symbol and trailing slash.
const CHROME_WIDTH: usize = 5;

/// A stateful list of selected paths.
pub struct SelectionPanel<'a> {
    items: &'a [SelectedItem],
    root: &'a Utf8Path,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> SelectionPanel<'a> {
    /// Creates a new selection panel.
    #[must_use]
    pub const fn new(
        items: &'a [SelectedItem],
        root: &'a Utf8Path,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            items,
            root,
            focused,
            theme,
        }
    }

    fn build_line(&self, item: &SelectedItem, max_width: usize) -> Line<'static> {
        let kind = EntryKind::from_is_dir(item.is_directory);
        let mut text = truncate_start(display_path(&item.path, self.root), max_width);
        if item.is_directory {
            text.push('/');
        }
        Line::from(Span::styled(text, self.theme.entry_style(kind)))
    }
}

impl StatefulWidget for &SelectionPanel<'_> {
    type State = CursorState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.visible_height = usize::from(area.height.saturating_sub(2));

        let files = self.items.iter().filter(|item| !item.is_directory).count();
        let title = format!(" Selected ({files} files, {} total) ", self.items.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.focused))
            .title(Span::styled(title, self.theme.header_style));

        let max_width = usize::from(area.width).saturating_sub(CHROME_WIDTH);
        let items: Vec<ListItem<'_>> = if self.items.is_empty() {
            vec![ListItem::new(Span::styled(
                "Nothing selected (Space to check)",
                self.theme.dimmed_style(),
            ))]
        } else {
            self.items
                .iter()
                .map(|item| ListItem::new(self.build_line(item, max_width)))
                .collect()
        };

        let highlight = if self.focused {
            self.theme.highlight_style
        } else {
            self.theme.dimmed_style()
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_spacing(HighlightSpacing::Always)
            .highlight_symbol("› ");

        let mut list_state = ListState::default()
            .with_offset(state.scroll_offset)
            .with_selected(if self.items.is_empty() {
                None
            } else {
                state.selected
            });
        StatefulWidget::render(list, area, buf, &mut list_state);
        state.scroll_offset = list_state.offset();
    }
}
