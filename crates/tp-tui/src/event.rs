//! Event types for the TUI event loop.
//!
//! Events originate from three sources:
//!
//! - **Terminal**: key presses, mouse events, window resizing
//! - **Engine**: tree-changed and selection-changed broadcasts from the
//!   [`TreePicker`](tp_engine::TreePicker) subscriptions
//! - **Timer**: periodic tick and render signals

use crossterm::event::{KeyEvent, MouseEvent};
use tp_core::SelectedItem;
use tp_engine::TreeChange;

/// Events that can be processed by the TUI.
#[derive(Debug)]
#[non_exhaustive]
pub enum Event {
    /// A key press event from the terminal.
    Key(KeyEvent),

    /// A mouse event from the terminal.
    Mouse(MouseEvent),

    /// Terminal window was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// The visible tree must be re-fetched.
    TreeChanged(TreeChange),

    /// A new selection snapshot was broadcast.
    SelectionChanged(Vec<SelectedItem>),

    /// Periodic tick for housekeeping (status message expiry).
    Tick,

    /// Signal to render a new frame.
    Render,

    /// Focus gained by the terminal window.
    FocusGained,

    /// Focus lost by the terminal window.
    FocusLost,
}

impl Event {
    /// Returns `true` if this is a key event.
    #[inline]
    #[must_use]
    pub const fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// Returns `true` if this event comes from the engine.
    #[inline]
    #[must_use]
    pub const fn is_engine(&self) -> bool {
        matches!(self, Self::TreeChanged(_) | Self::SelectionChanged(_))
    }

    /// Returns the key event if this is a Key variant.
    #[inline]
    #[must_use]
    pub const fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }
}
