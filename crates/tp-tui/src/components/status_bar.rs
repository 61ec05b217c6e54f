//! Status bar component.
//!
//! Displays the mode, the current status message, search progress and the
//! cursor position.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use tp_core::SearchPhase;

use crate::app::App;
use crate::theme::Theme;

/// The status bar component.
pub struct StatusBar<'a> {
    app: &'a App,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Creates a new status bar.
    #[must_use]
    pub const fn new(app: &'a App, theme: &'a Theme) -> Self {
        Self { app, theme }
    }

    fn build_line(&self) -> Line<'a> {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.app.mode.label()),
                Style::default()
                    .fg(Color::Black)
                    .bg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ];

        if let Some(status) = &self.app.status {
            let style = if status.is_error {
                self.theme.error_style()
            } else {
                self.theme.base_style()
            };
            spans.push(Span::styled(status.text.clone(), style));
            spans.push(Span::raw(" │ "));
        }

        if self.app.is_searching() {
            let phase = match self.app.search_phase() {
                SearchPhase::Searching(_) => "searching…",
                SearchPhase::Completed(_) => "done",
                SearchPhase::Idle | SearchPhase::Superseded(_) => "idle",
            };
            spans.push(Span::styled(
                format!("\"{}\" {phase}", self.app.query),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(" │ "));
        }

        let position = self
            .app
            .tree_state
            .selected
            .map_or(0, |index| index + 1);
        spans.push(Span::styled(
            format!("{position}/{}", self.app.rows().len()),
            self.theme.dimmed_style(),
        ));

        Line::from(spans)
    }
}

impl Widget for &StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .style(self.theme.status_bar_style)
            .render(area, buf);
    }
}
