//! Tree view component.
//!
//! Renders the flattened tree with indentation, expand markers and
//! checkboxes. In search mode each hit shows its parent directory.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, StatefulWidget};

use crate::app::{CursorState, TreeRow};
use crate::theme::Theme;

/// A stateful tree widget.
pub struct TreeView<'a> {
    rows: &'a [TreeRow],
    /// Active query, shown in the title.
    query: Option<&'a str>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> TreeView<'a> {
    /// Creates a new tree view.
    #[must_use]
    pub const fn new(
        rows: &'a [TreeRow],
        query: Option<&'a str>,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            rows,
            query,
            focused,
            theme,
        }
    }

    fn build_line(&self, row: &'a TreeRow) -> Line<'a> {
        let item = &row.item;
        let marker = match (row.is_dir(), row.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };

        let mut spans = vec![
            Span::raw("  ".repeat(row.depth)),
            Span::styled(marker, self.theme.dimmed_style()),
            Span::styled(Theme::checkbox(item.checked), self.theme.check_style(item.checked)),
            Span::raw(" "),
            Span::styled(item.label.as_str(), self.theme.entry_style(item.kind)),
        ];
        if row.is_dir() {
            spans.push(Span::styled("/", self.theme.entry_style(item.kind)));
        }
        if let Some(description) = &item.description {
            spans.push(Span::styled(
                format!("  {description}"),
                self.theme.dimmed_style(),
            ));
        }
        Line::from(spans)
    }
}

impl StatefulWidget for &TreeView<'_> {
    type State = CursorState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.visible_height = usize::from(area.height.saturating_sub(2));

        let title = match self.query {
            Some(query) => format!(" Search \"{query}\" ({}) ", self.rows.len()),
            None => format!(" Tree ({}) ", self.rows.len()),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.focused))
            .title(Span::styled(title, self.theme.header_style));

        let items: Vec<ListItem<'_>> = if self.rows.is_empty() {
            let hint = if self.query.is_some() {
                "No matches yet"
            } else {
                "Empty directory"
            };
            vec![ListItem::new(Span::styled(hint, self.theme.dimmed_style()))]
        } else {
            self.rows
                .iter()
                .map(|row| ListItem::new(self.build_line(row)))
                .collect()
        };

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style)
            .highlight_spacing(HighlightSpacing::Always)
            .highlight_symbol("› ");

        let mut list_state = ListState::default()
            .with_offset(state.scroll_offset)
            .with_selected(if self.rows.is_empty() {
                None
            } else {
                state.selected
            });
        StatefulWidget::render(list, area, buf, &mut list_state);
        state.scroll_offset = list_state.offset();
    }
}
