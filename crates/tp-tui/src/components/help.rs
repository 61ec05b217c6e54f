//! Help panel component.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Clear, Row, Table, Widget};

use crate::theme::Theme;

struct KeyBinding {
    key: &'static str,
    description: &'static str,
    mode: &'static str,
}

const fn binding(key: &'static str, description: &'static str, mode: &'static str) -> KeyBinding {
    KeyBinding {
        key,
        description,
        mode,
    }
}

const KEY_BINDINGS: &[KeyBinding] = &[
    binding("j / ↓", "Next row", "Normal"),
    binding("k / ↑", "Previous row", "Normal"),
    binding("g / G", "First / last row", "Normal"),
    binding("PgDn / PgUp", "Page down / up", "Normal"),
    binding("Enter / l", "Expand directory", "Tree"),
    binding("h", "Collapse / go to parent", "Tree"),
    binding("Space", "Check / uncheck (cascades)", "Tree"),
    binding("x", "Uncheck this path only", "Any panel"),
    binding("Tab", "Switch tree / selection", "Normal"),
    binding("/", "Search by name", "Normal"),
    binding("Esc", "Clear search / close", "Search/Help"),
    binding("Enter", "Keep query, back to tree", "Search"),
    binding("r", "Refresh from disk", "Normal"),
    binding("?", "Toggle help", "Normal"),
    binding("q / Ctrl+c", "Quit", "Any"),
];

/// A help panel overlay listing the key bindings.
pub struct HelpPanel<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPanel<'a> {
    /// Creates a new help panel.
    #[must_use]
    pub const fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn build_rows(&self) -> Vec<Row<'static>> {
        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        KEY_BINDINGS
            .iter()
            .map(|binding| {
                Row::new(vec![
                    Cell::from(Span::styled(binding.key, key_style)),
                    Cell::from(Span::styled(binding.description, self.theme.base_style())),
                    Cell::from(Span::styled(binding.mode, self.theme.dimmed_style())),
                ])
            })
            .collect()
    }
}

impl Widget for &HelpPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let heading = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        let header = Row::new(vec![
            Cell::from(Span::styled("Key", heading)),
            Cell::from(Span::styled("Action", heading)),
            Cell::from(Span::styled("Where", heading)),
        ])
        .bottom_margin(1);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style)
            .title(Span::styled(" Help - Key Bindings ", self.theme.header_style))
            .style(Style::default().bg(self.theme.overlay_bg));

        let widths = [
            Constraint::Length(13),
            Constraint::Min(24),
            Constraint::Length(12),
        ];
        Table::new(self.build_rows(), widths)
            .block(block)
            .header(header)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_binding_is_described() {
        assert!(
            KEY_BINDINGS
                .iter()
                .all(|b| !b.key.is_empty() && !b.description.is_empty())
        );
    }

    #[test]
    fn test_help_lists_space_toggle() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        HelpPanel::new(&theme).render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol())
            .collect();
        assert!(text.contains("Check / uncheck"));
    }
}
