//! Application state and lifecycle management.
//!
//! # Architecture
//!
//! ```text
//! App
//!  ├── picker: TreePicker         # engine (selection, search, listings)
//!  ├── rows: Vec<TreeRow>         # flattened visible tree
//!  ├── expanded: FxHashSet        # directories the user opened
//!  ├── selection: Vec<SelectedItem> # last broadcast snapshot
//!  ├── mode: AppMode / focus: Focus
//!  └── status: Option<StatusMessage>
//! ```
//!
//! The app never stores checked state of its own: every reload asks the
//! picker for fresh [`TreeItem`]s.

use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tp_core::{
    EntryKind, FilesystemEntry, FxHashSet, SearchPhase, SelectedItem, TreeItem, TreeNode,
};
use tp_engine::{ToggleOutcome, TreeChange, TreePicker};
use tracing::{debug, warn};

use crate::action::Action;

/// The current mode of the application UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal browsing mode.
    #[default]
    Normal,

    /// Search input mode (typing a query).
    Search,

    /// Help panel is displayed.
    Help,
}

impl AppMode {
    /// Short label for the status bar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
            Self::Help => "HELP",
        }
    }
}

/// Which panel has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The tree view.
    #[default]
    Tree,

    /// The selection panel.
    Selection,
}

impl Focus {
    /// Toggles between `Tree` and `Selection`.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Tree => Self::Selection,
            Self::Selection => Self::Tree,
        }
    }
}

/// Cursor and scroll position of a list panel.
#[derive(Debug, Clone, Default)]
pub struct CursorState {
    /// Row under the cursor.
    pub selected: Option<usize>,

    /// First visible row.
    pub scroll_offset: usize,

    /// Height of the visible area (for page navigation).
    pub visible_height: usize,
}

impl CursorState {
    /// Moves the cursor to the next row, wrapping at the end.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            Some(_) | None => 0,
        });
        self.ensure_visible();
    }

    /// Moves the cursor to the previous row, wrapping at the start.
    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        self.ensure_visible();
    }

    /// Moves the cursor to the first row.
    pub fn select_first(&mut self, len: usize) {
        self.selected = (len > 0).then_some(0);
        self.scroll_offset = 0;
    }

    /// Moves the cursor to the last row.
    pub fn select_last(&mut self, len: usize) {
        self.selected = len.checked_sub(1);
        self.ensure_visible();
    }

    /// Moves the cursor down by one page.
    pub fn page_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let page = self.visible_height.max(1);
        self.selected = Some(self.selected.map_or(0, |i| i + page).min(len - 1));
        self.ensure_visible();
    }

    /// Moves the cursor up by one page.
    pub fn page_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let page = self.visible_height.max(1);
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(page)));
        self.ensure_visible();
    }

    /// Places the cursor on `index` if it is in range.
    pub fn select(&mut self, index: usize, len: usize) {
        if index < len {
            self.selected = Some(index);
            self.ensure_visible();
        }
    }

    /// Keeps the cursor inside a list that now has `len` rows.
    pub fn clamp(&mut self, len: usize) {
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        if self.scroll_offset >= len {
            self.scroll_offset = len.saturating_sub(1);
        }
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        let height = self.visible_height.max(1);
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + height {
            self.scroll_offset = selected + 1 - height;
        }
    }
}

/// One visible row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Renderable node, checked state included.
    pub item: TreeItem,

    /// Nesting depth below the listing root.
    pub depth: usize,

    /// Whether the row is an expanded directory.
    pub expanded: bool,
}

impl TreeRow {
    /// Rebuilds the filesystem entry this row was produced from.
    #[must_use]
    pub fn entry(&self) -> FilesystemEntry {
        FilesystemEntry::new(self.item.path.clone(), self.item.kind)
    }

    /// Returns `true` if the row is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.item.kind.is_dir()
    }
}

/// Status message to display in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// The message text.
    pub text: String,

    /// When the message was created.
    pub timestamp: Instant,

    /// Whether this is an error message.
    pub is_error: bool,
}

impl StatusMessage {
    /// Creates a new info message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
            is_error: false,
        }
    }

    /// Creates a new error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
            is_error: true,
        }
    }

    /// Returns `true` once the message is older than five seconds.
    #[must_use]
    pub fn should_hide(&self) -> bool {
        self.timestamp.elapsed().as_secs() > 5
    }
}

/// The main application state.
pub struct App {
    pub(crate) picker: TreePicker,
    pub(crate) rows: Vec<TreeRow>,
    expanded: FxHashSet<Utf8PathBuf>,
    pub(crate) selection: Vec<SelectedItem>,

    /// Current UI mode.
    pub mode: AppMode,

    /// Which panel has focus.
    pub focus: Focus,

    /// Cursor of the tree view.
    pub tree_state: CursorState,

    /// Cursor of the selection panel.
    pub selection_state: CursorState,

    /// Text typed in search mode.
    pub query: String,

    /// Status message to display.
    pub status: Option<StatusMessage>,

    /// Whether the tree is being watched for external changes.
    pub watching: bool,

    /// Whether the application should quit.
    pub should_quit: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("root", &self.picker.root())
            .field("rows", &self.rows.len())
            .field("mode", &self.mode)
            .field("focus", &self.focus)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Creates an application over `picker`. Call [`reload`](Self::reload)
    /// before the first frame.
    #[must_use]
    pub fn new(picker: TreePicker) -> Self {
        Self {
            picker,
            rows: Vec::new(),
            expanded: FxHashSet::default(),
            selection: Vec::new(),
            mode: AppMode::Normal,
            focus: Focus::Tree,
            tree_state: CursorState::default(),
            selection_state: CursorState::default(),
            query: String::new(),
            status: None,
            watching: false,
            should_quit: false,
        }
    }

    /// Returns the engine.
    #[must_use]
    pub const fn picker(&self) -> &TreePicker {
        &self.picker
    }

    /// Returns the canonical tree root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        self.picker.root()
    }

    /// Returns the visible rows.
    #[must_use]
    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    /// Returns the last broadcast selection snapshot.
    #[must_use]
    pub fn selection(&self) -> &[SelectedItem] {
        &self.selection
    }

    /// Returns the row under the tree cursor.
    #[must_use]
    pub fn current_row(&self) -> Option<&TreeRow> {
        self.tree_state.selected.and_then(|i| self.rows.get(i))
    }

    /// Returns the selection panel item under its cursor.
    #[must_use]
    pub fn current_selected_item(&self) -> Option<&SelectedItem> {
        self.selection_state
            .selected
            .and_then(|i| self.selection.get(i))
    }

    /// Returns `true` while a search query is applied.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        !self.query.is_empty()
    }

    /// Returns the engine's search phase.
    #[must_use]
    pub fn search_phase(&self) -> SearchPhase {
        self.picker.search_phase()
    }

    /// Handles a key event and returns the resulting action.
    #[must_use]
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Search => self.handle_search_key(key),
            AppMode::Help => Self::handle_help_key(key),
        }
    }

    fn handle_normal_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('j') | KeyCode::Down => Action::NextItem,
            KeyCode::Char('k') | KeyCode::Up => Action::PreviousItem,
            KeyCode::Char('g') | KeyCode::Home => Action::FirstItem,
            KeyCode::Char('G') | KeyCode::End => Action::LastItem,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Tab => Action::ToggleFocus,
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Action::Expand,
            KeyCode::Char('h') | KeyCode::Left => Action::Collapse,
            KeyCode::Char(' ') => Action::ToggleCheck,
            KeyCode::Char('x') | KeyCode::Delete => Action::Uncheck,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('/') => Action::EnterSearchMode,
            KeyCode::Esc if self.is_searching() => Action::ClearSearch,
            _ => Action::None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearSearch,
            KeyCode::Enter => Action::ConfirmSearch,
            KeyCode::Down => Action::NextItem,
            KeyCode::Up => Action::PreviousItem,
            KeyCode::Backspace => {
                if self.query.pop().is_none() {
                    return Action::None;
                }
                Action::SetQuery(self.query.clone())
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                Action::SetQuery(self.query.clone())
            }
            _ => Action::None,
        }
    }

    fn handle_help_key(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | '?') => Action::HideHelp,
            _ => Action::None,
        }
    }

    /// Handles a mouse event: the wheel scrolls the focused panel.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn handle_mouse(&self, event: MouseEvent) -> Action {
        match event.kind {
            MouseEventKind::ScrollDown => Action::NextItem,
            MouseEventKind::ScrollUp => Action::PreviousItem,
            _ => Action::None,
        }
    }

    /// Turns a tree-changed broadcast into an action.
    ///
    /// Every change re-fetches the rows; search changes also update the
    /// status line.
    #[must_use]
    pub fn handle_tree_change(&mut self, change: &TreeChange) -> Action {
        match change {
            TreeChange::Refresh => {}
            TreeChange::SearchUpdated { hits, .. } => {
                debug!(hits, "Search progress");
            }
            TreeChange::SearchCompleted {
                generation,
                results,
            } => {
                if self.search_phase() == SearchPhase::Completed(*generation) {
                    let noun = if results.len() == 1 { "match" } else { "matches" };
                    self.status = Some(StatusMessage::info(format!(
                        "{} {noun} for \"{}\"",
                        results.len(),
                        self.query
                    )));
                }
            }
        }
        Action::Reload
    }

    /// Stores a selection-changed broadcast.
    pub fn set_selection(&mut self, snapshot: Vec<SelectedItem>) {
        self.selection = snapshot;
        self.selection_state.clamp(self.selection.len());
    }

    /// Applies an action.
    #[allow(clippy::match_same_arms)]
    pub async fn update(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,

            Action::NextItem => {
                let len = self.focused_len();
                self.focused_cursor().select_next(len);
            }
            Action::PreviousItem => {
                let len = self.focused_len();
                self.focused_cursor().select_previous(len);
            }
            Action::FirstItem => {
                let len = self.focused_len();
                self.focused_cursor().select_first(len);
            }
            Action::LastItem => {
                let len = self.focused_len();
                self.focused_cursor().select_last(len);
            }
            Action::PageDown => {
                let len = self.focused_len();
                self.focused_cursor().page_down(len);
            }
            Action::PageUp => {
                let len = self.focused_len();
                self.focused_cursor().page_up(len);
            }
            Action::ToggleFocus => {
                self.focus = self.focus.toggle();
            }

            Action::Expand => self.expand().await,
            Action::Collapse => self.collapse().await,
            Action::ToggleCheck => match self.focus {
                Focus::Tree => self.toggle_current().await,
                Focus::Selection => self.uncheck_current().await,
            },
            Action::Uncheck => self.uncheck_current().await,
            Action::Refresh => {
                self.picker.refresh();
                self.status = Some(StatusMessage::info("Refreshed"));
            }
            Action::Reload => self.reload().await,

            Action::EnterSearchMode => {
                self.mode = AppMode::Search;
                self.focus = Focus::Tree;
            }
            Action::ConfirmSearch => {
                self.mode = AppMode::Normal;
            }
            Action::SetQuery(query) => {
                self.query = query;
                let generation = self.picker.set_search_query(&self.query);
                debug!(query = %self.query, ?generation, "Query changed");
                self.tree_state.select_first(self.rows.len());
            }
            Action::ClearSearch => {
                self.query.clear();
                self.picker.set_search_query("");
                self.mode = AppMode::Normal;
                self.status = None;
            }

            Action::ToggleHelp => {
                self.mode = if self.mode == AppMode::Help {
                    AppMode::Normal
                } else {
                    AppMode::Help
                };
            }
            Action::HideHelp => {
                self.mode = AppMode::Normal;
            }
            Action::ShowStatus(text) => {
                self.status = Some(StatusMessage::info(text));
            }
            Action::ClearStatus => {
                self.status = None;
            }

            Action::Render | Action::Tick | Action::None => {}
        }
    }

    /// Handles a tick event (periodic update).
    pub fn tick(&mut self) {
        if self.status.as_ref().is_some_and(StatusMessage::should_hide) {
            self.status = None;
        }
    }

    /// Re-fetches the visible rows, keeping the cursor on the same path when
    /// it is still visible.
    pub async fn reload(&mut self) {
        let cursor_path = self.current_row().map(|row| row.item.path.clone());
        self.rows = load_rows(&self.picker, &self.expanded).await;

        let len = self.rows.len();
        match cursor_path.and_then(|path| self.rows.iter().position(|row| row.item.path == path)) {
            Some(index) => self.tree_state.select(index, len),
            None => self.tree_state.clamp(len),
        }
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Focus::Tree => self.rows.len(),
            Focus::Selection => self.selection.len(),
        }
    }

    fn focused_cursor(&mut self) -> &mut CursorState {
        match self.focus {
            Focus::Tree => &mut self.tree_state,
            Focus::Selection => &mut self.selection_state,
        }
    }

    async fn expand(&mut self) {
        if self.focus != Focus::Tree {
            return;
        }
        let Some(row) = self.current_row() else {
            return;
        };
        if !row.is_dir() {
            return;
        }
        if row.expanded {
            self.tree_state.select_next(self.rows.len());
            return;
        }
        let path = row.item.path.clone();
        self.expanded.insert(path);
        self.reload().await;
    }

    async fn collapse(&mut self) {
        if self.focus != Focus::Tree {
            return;
        }
        let Some(index) = self.tree_state.selected else {
            return;
        };
        let Some(row) = self.rows.get(index) else {
            return;
        };

        if row.expanded {
            let path = row.item.path.clone();
            self.expanded.remove(&path);
            self.reload().await;
            return;
        }

        // Jump to the enclosing directory row.
        let depth = row.depth;
        if let Some(parent) = self.rows[..index]
            .iter()
            .rposition(|candidate| candidate.depth + 1 == depth)
        {
            self.tree_state.select(parent, self.rows.len());
        }
    }

    async fn toggle_current(&mut self) {
        let Some(entry) = self.current_row().map(TreeRow::entry) else {
            return;
        };

        match self.picker.toggle_selection_by_ui_item(&entry).await {
            Ok(outcome) => {
                let verb = match outcome {
                    ToggleOutcome::Selected { .. } => "Selected",
                    ToggleOutcome::Deselected { .. } => "Deselected",
                };
                let count = outcome.touched();
                let noun = if count == 1 { "path" } else { "paths" };
                self.status = Some(StatusMessage::info(format!(
                    "{verb} {count} {noun} under {}",
                    entry.name
                )));
            }
            Err(e) => {
                warn!(path = %entry.path, error = %e, "Toggle failed");
                self.status = Some(StatusMessage::error(format!("Toggle failed: {e}")));
            }
        }
    }

    async fn uncheck_current(&mut self) {
        let path = match self.focus {
            Focus::Tree => self.current_row().map(|row| row.item.path.clone()),
            Focus::Selection => self.current_selected_item().map(|item| item.path.clone()),
        };
        let Some(path) = path else {
            return;
        };

        if self.picker.uncheck_item_by_path(&path).await {
            self.status = Some(StatusMessage::info(format!(
                "Unchecked {}",
                display_path(&path, self.picker.root())
            )));
        } else {
            self.status = Some(StatusMessage::info("Not selected"));
        }
    }
}

/// Returns `path` relative to `root` when it lies below it.
#[must_use]
pub fn display_path<'a>(path: &'a Utf8Path, root: &Utf8Path) -> &'a str {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_str().is_empty() => relative.as_str(),
        _ => path.as_str(),
    }
}

/// Flattens the tree depth-first, descending only into expanded directories.
async fn load_rows(picker: &TreePicker, expanded: &FxHashSet<Utf8PathBuf>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(TreeNode, usize)> = picker
        .get_children(None)
        .await
        .into_iter()
        .rev()
        .map(|node| (node, 0))
        .collect();

    while let Some((node, depth)) = stack.pop() {
        let is_expanded =
            node.entry.kind == EntryKind::Directory && expanded.contains(&node.entry.path);
        if is_expanded {
            let children = picker.get_children(Some(&node.entry)).await;
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
        rows.push(TreeRow {
            item: picker.get_tree_item(&node),
            depth,
            expanded: is_expanded,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tp_core::{CheckState, Config};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// root/{a.txt, sub/{b.txt, c.txt}, .env}
    async fn app_over_tree() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        for file in ["a.txt", "sub/b.txt", "sub/c.txt", ".env"] {
            std::fs::write(root.join(file), "x").unwrap();
        }

        let mut config = Config::default();
        config.tree.root_path = root.to_owned();
        config.search.debounce_ms = 10;
        let picker = TreePicker::new(&config).await.unwrap();

        let mut app = App::new(picker);
        app.reload().await;
        (dir, app)
    }

    fn labels(app: &App) -> Vec<(usize, String)> {
        app.rows()
            .iter()
            .map(|row| (row.depth, row.item.label.clone()))
            .collect()
    }

    #[test]
    fn test_focus_toggle() {
        assert_eq!(Focus::Tree.toggle(), Focus::Selection);
        assert_eq!(Focus::Selection.toggle(), Focus::Tree);
    }

    #[test]
    fn test_cursor_navigation() {
        let mut state = CursorState {
            visible_height: 10,
            ..CursorState::default()
        };

        state.select_next(0);
        assert!(state.selected.is_none());

        state.select_next(5);
        assert_eq!(state.selected, Some(0));
        state.select_last(5);
        assert_eq!(state.selected, Some(4));
        state.select_next(5);
        assert_eq!(state.selected, Some(0));
        state.select_previous(5);
        assert_eq!(state.selected, Some(4));

        state.clamp(2);
        assert_eq!(state.selected, Some(1));
        state.clamp(0);
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_cursor_scrolls_into_view() {
        let mut state = CursorState {
            visible_height: 3,
            ..CursorState::default()
        };
        state.select(7, 10);
        assert_eq!(state.scroll_offset, 5);
        state.page_up(10);
        assert_eq!(state.selected, Some(4));
        assert_eq!(state.scroll_offset, 4);
    }

    #[test]
    fn test_display_path() {
        let root = Utf8Path::new("/r");
        assert_eq!(display_path(Utf8Path::new("/r/sub/b.txt"), root), "sub/b.txt");
        assert_eq!(display_path(Utf8Path::new("/elsewhere"), root), "/elsewhere");
    }

    #[test]
    fn test_status_message() {
        assert!(!StatusMessage::info("hello").should_hide());
        assert!(StatusMessage::error("oops").is_error);
    }

    #[tokio::test]
    async fn test_normal_key_bindings() {
        let (_dir, mut app) = app_over_tree().await;
        assert_eq!(app.handle_key(key(KeyCode::Char(' '))), Action::ToggleCheck);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::Expand);
        assert_eq!(app.handle_key(key(KeyCode::Char('h'))), Action::Collapse);
        assert_eq!(app.handle_key(key(KeyCode::Char('x'))), Action::Uncheck);
        assert_eq!(app.handle_key(key(KeyCode::Char('/'))), Action::EnterSearchMode);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::None);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[tokio::test]
    async fn test_search_mode_edits_query() {
        let (_dir, mut app) = app_over_tree().await;
        app.update(Action::EnterSearchMode).await;
        assert_eq!(app.mode, AppMode::Search);

        assert_eq!(
            app.handle_key(key(KeyCode::Char('b'))),
            Action::SetQuery("b".to_owned())
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Backspace)),
            Action::SetQuery(String::new())
        );
        assert_eq!(app.handle_key(key(KeyCode::Backspace)), Action::None);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Action::ClearSearch);
    }

    #[tokio::test]
    async fn test_initial_rows_hide_dotfiles() {
        let (_dir, app) = app_over_tree().await;
        assert_eq!(
            labels(&app),
            vec![(0, "sub".to_owned()), (0, "a.txt".to_owned())]
        );
        assert_eq!(app.tree_state.selected, Some(0));
    }

    #[tokio::test]
    async fn test_expand_and_collapse() {
        let (_dir, mut app) = app_over_tree().await;

        app.update(Action::Expand).await;
        assert_eq!(
            labels(&app),
            vec![
                (0, "sub".to_owned()),
                (1, "b.txt".to_owned()),
                (1, "c.txt".to_owned()),
                (0, "a.txt".to_owned()),
            ]
        );
        assert!(app.rows()[0].expanded);

        // On a child, collapse jumps to the parent; a second collapse closes it.
        app.update(Action::NextItem).await;
        app.update(Action::NextItem).await;
        app.update(Action::Collapse).await;
        assert_eq!(app.tree_state.selected, Some(0));
        app.update(Action::Collapse).await;
        assert_eq!(app.rows().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_directory_checks_children() {
        let (_dir, mut app) = app_over_tree().await;
        let mut selections = app.picker().subscribe_selection_changed();

        app.update(Action::Expand).await;
        app.update(Action::ToggleCheck).await;
        app.reload().await;

        assert!(
            app.rows()[..3]
                .iter()
                .all(|row| row.item.checked == CheckState::Checked)
        );
        assert_eq!(app.rows()[3].item.checked, CheckState::Unchecked);
        assert!(app.status.as_ref().is_some_and(|s| s.text.starts_with("Selected 3")));

        let snapshot = selections.try_recv().unwrap();
        assert_eq!(snapshot.len(), 3);
        app.set_selection(snapshot);
        assert_eq!(app.selection_state.selected, Some(0));
    }

    #[tokio::test]
    async fn test_uncheck_from_selection_panel() {
        let (_dir, mut app) = app_over_tree().await;
        app.update(Action::LastItem).await;
        app.update(Action::ToggleCheck).await;
        let snapshot = app.picker().get_selected_files().await.unwrap();
        app.set_selection(snapshot);

        app.update(Action::ToggleFocus).await;
        app.update(Action::Uncheck).await;
        assert_eq!(app.picker().selection_len(), 0);
        assert!(app.status.as_ref().is_some_and(|s| s.text == "Unchecked a.txt"));
    }

    #[tokio::test]
    async fn test_search_replaces_rows() {
        let (_dir, mut app) = app_over_tree().await;
        let mut changes = app.picker().subscribe_tree_changed();

        app.update(Action::SetQuery("B.T".to_owned())).await;
        let action = loop {
            let change = tokio::time::timeout(Duration::from_secs(5), changes.recv())
                .await
                .unwrap()
                .unwrap();
            if matches!(change, TreeChange::SearchCompleted { .. }) {
                break app.handle_tree_change(&change);
            }
        };
        app.update(action).await;

        assert_eq!(labels(&app), vec![(0, "b.txt".to_owned())]);
        assert_eq!(app.rows()[0].item.description.as_deref(), Some("sub"));
        assert!(app.status.as_ref().is_some_and(|s| s.text.starts_with("1 match")));

        app.update(Action::ClearSearch).await;
        app.reload().await;
        assert_eq!(app.rows().len(), 2);
        assert!(!app.is_searching());
    }
}
