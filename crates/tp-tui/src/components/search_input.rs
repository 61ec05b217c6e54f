//! Search input component.
//!
//! A one-line input box shown above the tree while a query is being typed
//! or applied.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::theme::Theme;

/// The search input widget.
pub struct SearchInput<'a> {
    text: &'a str,
    /// Whether keystrokes currently go to the input.
    editing: bool,
    theme: &'a Theme,
}

impl<'a> SearchInput<'a> {
    /// Creates a new search input widget.
    #[must_use]
    pub const fn new(text: &'a str, editing: bool, theme: &'a Theme) -> Self {
        Self {
            text,
            editing,
            theme,
        }
    }
}

impl Widget for &SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let mut spans = if self.text.is_empty() {
            vec![Span::styled(
                "Type to search by name…",
                self.theme.dimmed_style().add_modifier(Modifier::ITALIC),
            )]
        } else {
            vec![Span::styled(self.text, self.theme.base_style())]
        };
        if self.editing {
            spans.push(Span::styled("▌", self.theme.accent_style()));
        }

        let title = if self.editing {
            " Search (Esc clears, Enter keeps) "
        } else {
            " Search (/ edit, Esc clears) "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.editing))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}
