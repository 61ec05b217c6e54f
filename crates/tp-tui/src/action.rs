//! User actions for the TUI.
//!
//! Actions are the result of processing input and engine events and are
//! applied by [`App::update`](crate::App::update).
//!
//! ```text
//! Key Event ───► App::handle_key ──────────┐
//! TreeChange ──► App::handle_tree_change ──┼─► Action ─► App::update
//! ```

/// User-initiated and engine-driven actions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Action {
    // =========================================================================
    // Navigation
    // =========================================================================
    /// Move the cursor to the next row.
    NextItem,

    /// Move the cursor to the previous row.
    PreviousItem,

    /// Move the cursor to the first row.
    FirstItem,

    /// Move the cursor to the last row.
    LastItem,

    /// Move the cursor down by one page.
    PageDown,

    /// Move the cursor up by one page.
    PageUp,

    /// Toggle focus between the tree and the selection panel.
    ToggleFocus,

    // =========================================================================
    // Tree
    // =========================================================================
    /// Expand the directory under the cursor.
    Expand,

    /// Collapse the directory under the cursor, or jump to its parent.
    Collapse,

    /// Toggle the checkbox of the row under the cursor (with cascade).
    ToggleCheck,

    /// Remove exactly the path under the cursor from the selection.
    Uncheck,

    /// Ask the engine for an immediate refresh.
    Refresh,

    /// Re-fetch the visible rows from the engine.
    Reload,

    // =========================================================================
    // Search
    // =========================================================================
    /// Enter search input mode.
    EnterSearchMode,

    /// Leave search input mode, keeping the query.
    ConfirmSearch,

    /// Set the search query.
    SetQuery(String),

    /// Clear the query and return to the ordinary listing.
    ClearSearch,

    // =========================================================================
    // UI State
    // =========================================================================
    /// Toggle the help panel.
    ToggleHelp,

    /// Hide the help panel.
    HideHelp,

    /// Show a status message.
    ShowStatus(String),

    /// Clear the status message.
    ClearStatus,

    // =========================================================================
    // Application Control
    // =========================================================================
    /// Quit the application.
    Quit,

    /// Render the UI.
    Render,

    /// Tick (periodic update).
    Tick,

    /// No operation.
    #[default]
    None,
}

impl Action {
    /// Returns `true` if this action requires a re-render.
    #[must_use]
    pub const fn needs_render(&self) -> bool {
        !matches!(self, Self::None | Self::Tick)
    }

    /// Returns `true` if this is a cursor movement.
    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::NextItem
                | Self::PreviousItem
                | Self::FirstItem
                | Self::LastItem
                | Self::PageDown
                | Self::PageUp
        )
    }

    /// Returns `true` if this action calls into the engine.
    #[must_use]
    pub const fn touches_engine(&self) -> bool {
        matches!(
            self,
            Self::Expand
                | Self::Collapse
                | Self::ToggleCheck
                | Self::Uncheck
                | Self::Refresh
                | Self::Reload
                | Self::SetQuery(_)
                | Self::ClearSearch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_needs_render() {
        assert!(Action::NextItem.needs_render());
        assert!(Action::ToggleHelp.needs_render());
        assert!(!Action::None.needs_render());
        assert!(!Action::Tick.needs_render());
    }

    #[test]
    fn test_action_is_navigation() {
        assert!(Action::NextItem.is_navigation());
        assert!(Action::PageUp.is_navigation());
        assert!(!Action::Expand.is_navigation());
        assert!(!Action::Quit.is_navigation());
    }

    #[test]
    fn test_action_touches_engine() {
        assert!(Action::ToggleCheck.touches_engine());
        assert!(Action::SetQuery("ab".to_owned()).touches_engine());
        assert!(!Action::ToggleFocus.touches_engine());
        assert!(!Action::EnterSearchMode.touches_engine());
    }

    #[test]
    fn test_action_default() {
        assert_eq!(Action::default(), Action::None);
    }
}
