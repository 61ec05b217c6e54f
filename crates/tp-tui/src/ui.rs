//! Main UI layout and rendering orchestration.
//!
//! # Layout Structure
//!
//! ```text
//! +------------------------------------------------------------------+
//! | treepick │ /path/to/root │ 3 selected │ watching │ ? for help     |
//! +------------------------------------------------------------------+
//! | [Search: readme▌]                 |  Selected (2 files, 3 total)  |
//! |-----------------------------------|  sub/                         |
//! |  ▾ [x] sub/                       |  sub/b.txt                    |
//! |      [x] b.txt                    |  sub/c.txt                    |
//! |    [ ] a.txt                      |                               |
//! +------------------------------------------------------------------+
//! | NORMAL  Selected 3 paths under sub │ 1/4                          |
//! +------------------------------------------------------------------+
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{App, AppMode, Focus};
use crate::components::{HeaderBar, HelpPanel, SearchInput, SelectionPanel, StatusBar, TreeView};
use crate::theme::Theme;

/// Renders the entire UI based on the current application state.
///
/// Takes the app mutably so the list panels can record their visible
/// height and scroll offset.
pub fn render(app: &mut App, frame: &mut Frame, theme: &Theme) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let header = HeaderBar::new(app.root(), app.picker().selection_len(), app.watching);
    frame.render_widget(&header, chunks[0]);

    render_main_content(app, frame, chunks[1], theme);

    let status_bar = StatusBar::new(app, theme);
    frame.render_widget(&status_bar, chunks[2]);

    if app.mode == AppMode::Help {
        let help_panel = HelpPanel::new(theme);
        frame.render_widget(&help_panel, centered_rect(70, 70, area));
    }
}

/// Renders the tree (with the search box above it when searching) and the
/// selection panel side by side.
fn render_main_content(app: &mut App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let mut tree_area = columns[0];
    let editing = app.mode == AppMode::Search;
    if editing || app.is_searching() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(columns[0]);
        let input = SearchInput::new(&app.query, editing, theme);
        frame.render_widget(&input, rows[0]);
        tree_area = rows[1];
    }

    // Field borrows keep the rows readable while the cursor is mutated.
    let query = (!app.query.is_empty()).then_some(app.query.as_str());
    let tree_view = TreeView::new(&app.rows, query, app.focus == Focus::Tree, theme);
    frame.render_stateful_widget(&tree_view, tree_area, &mut app.tree_state);

    let panel = SelectionPanel::new(
        &app.selection,
        app.picker.root(),
        app.focus == Focus::Selection,
        theme,
    );
    frame.render_stateful_widget(&panel, columns[1], &mut app.selection_state);
}

/// Creates a centered rectangle with the given percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
