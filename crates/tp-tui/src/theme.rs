//! Theme and styling for the TUI.
//!
//! # Example
//!
//! ```
//! use tp_core::{CheckState, EntryKind};
//! use tp_tui::Theme;
//!
//! let theme = Theme::dark();
//! let dir_style = theme.entry_style(EntryKind::Directory);
//! assert_eq!(Theme::checkbox(CheckState::Checked), "[x]");
//! # let _ = dir_style;
//! ```

use ratatui::style::{Color, Modifier, Style};
use tp_core::{CheckState, ColorScheme, EntryKind};

/// Colors and styles used throughout the interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // =========================================================================
    // Entry Colors
    // =========================================================================
    /// Foreground color for directories.
    pub directory_fg: Color,

    /// Foreground color for files.
    pub file_fg: Color,

    /// Foreground color for checked checkboxes.
    pub checked_fg: Color,

    // =========================================================================
    // Base Colors
    // =========================================================================
    /// Primary foreground color.
    pub fg: Color,

    /// Dimmed/secondary text color.
    pub dimmed_fg: Color,

    /// Accent color for highlights.
    pub accent: Color,

    /// Error/warning color.
    pub error_fg: Color,

    /// Background of modal overlays.
    pub overlay_bg: Color,

    // =========================================================================
    // Component Styles
    // =========================================================================
    /// Style for normal borders.
    pub border_style: Style,

    /// Style for focused borders.
    pub focused_border_style: Style,

    /// Style for the row under the cursor.
    pub highlight_style: Style,

    /// Style for panel titles.
    pub header_style: Style,

    /// Style for the status bar.
    pub status_bar_style: Style,
}

impl Theme {
    /// Creates a dark theme (light text on dark background).
    #[must_use]
    pub fn dark() -> Self {
        Self {
            directory_fg: Color::Rgb(100, 150, 255),
            file_fg: Color::Rgb(220, 220, 220),
            checked_fg: Color::Rgb(100, 255, 100),

            fg: Color::Rgb(220, 220, 220),
            dimmed_fg: Color::Rgb(128, 128, 128),
            accent: Color::Rgb(100, 150, 255),
            error_fg: Color::Rgb(255, 80, 80),
            overlay_bg: Color::Rgb(25, 25, 35),

            border_style: Style::default().fg(Color::Rgb(80, 80, 100)),
            focused_border_style: Style::default().fg(Color::Rgb(100, 150, 255)),
            highlight_style: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(60, 60, 80))
                .add_modifier(Modifier::BOLD),
            header_style: Style::default()
                .fg(Color::Rgb(100, 150, 255))
                .add_modifier(Modifier::BOLD),
            status_bar_style: Style::default()
                .fg(Color::Rgb(180, 180, 180))
                .bg(Color::Rgb(40, 40, 50)),
        }
    }

    /// Creates a light theme (dark text on light background).
    #[must_use]
    pub fn light() -> Self {
        Self {
            directory_fg: Color::Rgb(50, 100, 200),
            file_fg: Color::Rgb(30, 30, 30),
            checked_fg: Color::Rgb(50, 150, 50),

            fg: Color::Rgb(30, 30, 30),
            dimmed_fg: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(50, 100, 200),
            error_fg: Color::Rgb(180, 50, 50),
            overlay_bg: Color::Rgb(235, 235, 240),

            border_style: Style::default().fg(Color::Rgb(150, 150, 170)),
            focused_border_style: Style::default().fg(Color::Rgb(50, 100, 200)),
            highlight_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(200, 200, 220))
                .add_modifier(Modifier::BOLD),
            header_style: Style::default()
                .fg(Color::Rgb(50, 100, 200))
                .add_modifier(Modifier::BOLD),
            status_bar_style: Style::default()
                .fg(Color::Rgb(60, 60, 60))
                .bg(Color::Rgb(220, 220, 230)),
        }
    }

    /// Creates a theme from a [`ColorScheme`]. `Auto` picks the dark theme.
    #[must_use]
    pub fn from_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Returns the label style for an entry kind.
    #[must_use]
    pub fn entry_style(&self, kind: EntryKind) -> Style {
        match kind {
            EntryKind::Directory => Style::default()
                .fg(self.directory_fg)
                .add_modifier(Modifier::BOLD),
            EntryKind::File => Style::default().fg(self.file_fg),
        }
    }

    /// Returns the checkbox style for a check state.
    #[must_use]
    pub fn check_style(&self, state: CheckState) -> Style {
        match state {
            CheckState::Checked => Style::default()
                .fg(self.checked_fg)
                .add_modifier(Modifier::BOLD),
            CheckState::Unchecked => Style::default().fg(self.dimmed_fg),
        }
    }

    /// Returns the checkbox glyph for a check state.
    #[must_use]
    pub const fn checkbox(state: CheckState) -> &'static str {
        match state {
            CheckState::Checked => "[x]",
            CheckState::Unchecked => "[ ]",
        }
    }

    /// Returns a style with the base foreground color.
    #[must_use]
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Returns a style for dimmed/secondary text.
    #[must_use]
    pub fn dimmed_style(&self) -> Style {
        Style::default().fg(self.dimmed_fg)
    }

    /// Returns a style for accent/highlighted text.
    #[must_use]
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Returns a style for error text.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error_fg)
    }

    /// Returns the border style for a panel.
    #[must_use]
    pub const fn border(&self, focused: bool) -> Style {
        if focused {
            self.focused_border_style
        } else {
            self.border_style
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
