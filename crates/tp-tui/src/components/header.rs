//! Header bar component.

use camino::Utf8Path;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use super::truncate_start;

/// The header bar: title, tree root, selection count, watch indicator.
pub struct HeaderBar<'a> {
    root: &'a Utf8Path,
    selected: usize,
    watching: bool,
}

impl<'a> HeaderBar<'a> {
    /// Creates a new header bar.
    #[must_use]
    pub const fn new(root: &'a Utf8Path, selected: usize, watching: bool) -> Self {
        Self {
            root,
            selected,
            watching,
        }
    }
}

impl Widget for &HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let root_width = usize::from(area.width / 2).max(10);
        let mut spans = vec![
            Span::styled("treepick", title_style),
            Span::raw(" │ "),
            Span::styled(
                truncate_start(self.root.as_str(), root_width),
                Style::default().fg(Color::White),
            ),
            Span::raw(" │ "),
            Span::styled(
                format!("{} selected", self.selected),
                Style::default().fg(Color::Green),
            ),
        ];
        if self.watching {
            spans.push(Span::raw(" │ "));
            spans.push(Span::styled("watching", Style::default().fg(Color::Magenta)));
        }
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("? for help", Style::default().fg(Color::Yellow)));

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}
