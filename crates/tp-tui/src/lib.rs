//! Terminal tree picker built on Ratatui.
//!
//! This crate is a host UI for [`tp_engine::TreePicker`]: it renders the
//! lazily listed tree with checkboxes, forwards toggles and queries to the
//! engine and re-fetches rows whenever the engine broadcasts a change.
//!
//! # Architecture
//!
//! ```text
//! crates/tp-tui/src/
//!   lib.rs           # run() and the main event loop
//!   app.rs           # App state, key bindings, row flattening
//!   event.rs         # Event (terminal, engine, timer)
//!   tui.rs           # Terminal wrapper with async event streaming
//!   action.rs        # Action (commands from key bindings)
//!   ui.rs            # Layout orchestration
//!   theme.rs         # Colors and styles
//!   error.rs         # TuiError
//!   components/      # TreeView, SelectionPanel, HeaderBar, StatusBar,
//!                    # SearchInput, HelpPanel
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use tp_core::Config;
//! use tp_engine::TreePicker;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tp_tui::TuiError> {
//!     let config = Config::default();
//!     let picker = TreePicker::new(&config).await?;
//!     tp_tui::run(config, picker).await
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod action;
pub mod app;
pub mod components;
pub mod error;
pub mod event;
pub mod theme;
pub mod tui;
pub mod ui;

use tp_core::{Config, SelectedItem};
use tp_engine::{Subscription, TreeChange, TreePicker, WatchHandle};
use tracing::{debug, error, info};

pub use action::Action;
pub use app::{App, AppMode, CursorState, Focus, StatusMessage, TreeRow};
pub use error::TuiError;
pub use event::Event;
pub use theme::Theme;
pub use tui::Tui;

/// Runs the picker UI until the user quits.
///
/// Starts the engine's file watcher when `config.watch.enabled` is set; a
/// watcher that fails to start is reported in the status bar and the UI
/// runs without it.
///
/// # Errors
///
/// Returns an error if the terminal cannot be initialized or drawn to.
pub async fn run(config: Config, picker: TreePicker) -> Result<(), TuiError> {
    // Small UI timing values; precision loss is irrelevant.
    #[allow(clippy::cast_precision_loss)]
    let tick_rate = 1000.0 / config.tui.tick_rate_ms.max(1) as f64;
    let frame_rate = f64::from(config.tui.frame_rate.max(1));

    let mut tui = Tui::new(tick_rate)?.with_frame_rate(frame_rate);
    let mut app = App::new(picker.clone());

    let watch = if config.watch.enabled {
        info!(root = %picker.root(), "Starting file watcher");
        match picker.watch(&config.watch).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(error = %e, "Failed to start file watcher");
                app.status = Some(StatusMessage::error(format!("Watcher failed: {e}")));
                None
            }
        }
    } else {
        debug!("File watcher disabled");
        None
    };
    app.watching = watch.is_some();

    let mut tree_changes = picker.subscribe_tree_changed();
    let mut selection_changes = picker.subscribe_selection_changed();
    app.reload().await;

    tui.enter()?;
    let theme = Theme::from_scheme(config.tui.color_scheme);

    info!("Entering main event loop");
    let result = run_event_loop(
        &mut tui,
        &mut app,
        &mut tree_changes,
        &mut selection_changes,
        &theme,
    )
    .await;

    tui.exit()?;

    picker.unsubscribe_tree_changed(tree_changes.id());
    picker.unsubscribe_selection_changed(selection_changes.id());
    shutdown_watcher(watch).await;

    result
}

async fn run_event_loop(
    tui: &mut Tui,
    app: &mut App,
    tree_changes: &mut Subscription<TreeChange>,
    selection_changes: &mut Subscription<Vec<SelectedItem>>,
    theme: &Theme,
) -> Result<(), TuiError> {
    loop {
        tui.draw(|frame| ui::render(app, frame, theme))?;

        let event = tokio::select! {
            event = tui.next_event() => match event {
                Some(event) => event,
                None => return Err(TuiError::ChannelClosed),
            },
            Some(change) = tree_changes.recv() => Event::TreeChanged(change),
            Some(snapshot) = selection_changes.recv() => {
                // Snapshots are complete; only the newest queued one matters.
                Event::SelectionChanged(selection_changes.latest().unwrap_or(snapshot))
            }
        };

        let action = match event {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::TreeChanged(change) => app.handle_tree_change(&change),
            Event::SelectionChanged(snapshot) => {
                app.set_selection(snapshot);
                Action::Render
            }
            Event::Tick => {
                app.tick();
                Action::None
            }
            Event::Resize { .. } | Event::Render => Action::Render,
            Event::FocusGained | Event::FocusLost => Action::None,
        };
        app.update(action).await;

        if app.should_quit {
            info!("Quit requested");
            return Ok(());
        }
    }
}

async fn shutdown_watcher(watch: Option<WatchHandle>) {
    if let Some(handle) = watch {
        info!("Shutting down file watcher");
        if let Err(e) = handle.shutdown().await {
            error!(error = %e, "Error shutting down watcher");
        }
    }
}
