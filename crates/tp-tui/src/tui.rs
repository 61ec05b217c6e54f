//! Terminal wrapper with async event streaming.
//!
//! [`Tui`] owns the Ratatui terminal and a background task that multiplexes
//! crossterm's [`EventStream`] with tick and render intervals into a single
//! bounded channel.
//!
//! ```text
//!  EventStream ──┐
//!  tick interval ├─► select! ─► mpsc::Sender<Event> ─► Tui::next_event()
//!  render interval┘      ▲
//!                        └── CancellationToken (exit)
//! ```

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    EventStream, KeyEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::error::TuiError;
use crate::event::Event;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Terminal wrapper with async event streaming.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    task: Option<JoinHandle<()>>,
    cancellation_token: CancellationToken,
    entered: bool,

    /// Frames per second.
    frame_rate: f64,

    /// Ticks per second.
    tick_rate: f64,
}

impl Tui {
    /// Creates a new TUI emitting `tick_rate` ticks per second.
    ///
    /// The terminal is not entered yet; call [`enter()`](Self::enter).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new(tick_rate: f64) -> Result<Self, TuiError> {
        if !(tick_rate.is_finite() && tick_rate > 0.0) {
            return Err(TuiError::config("tick rate must be positive"));
        }

        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        debug!(tick_rate, "Created TUI");

        Ok(Self {
            terminal,
            event_rx,
            event_tx,
            task: None,
            cancellation_token: CancellationToken::new(),
            entered: false,
            frame_rate: 30.0,
            tick_rate,
        })
    }

    /// Sets the frame rate for rendering.
    #[must_use]
    pub const fn with_frame_rate(mut self, fps: f64) -> Self {
        self.frame_rate = fps;
        self
    }

    /// Enters raw mode and the alternate screen, then starts the event task.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal mode cannot be changed.
    pub fn enter(&mut self) -> Result<(), TuiError> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        io::stdout().execute(EnableMouseCapture)?;
        io::stdout().execute(EnableBracketedPaste)?;
        self.entered = true;

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;

        self.start_event_loop();
        debug!("Terminal entered");
        Ok(())
    }

    /// Restores the terminal. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal mode cannot be restored.
    pub fn exit(&mut self) -> Result<(), TuiError> {
        self.stop_event_loop();
        if !self.entered {
            return Ok(());
        }
        self.entered = false;

        self.terminal.show_cursor()?;
        io::stdout().execute(DisableBracketedPaste)?;
        io::stdout().execute(DisableMouseCapture)?;
        io::stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;

        debug!("Terminal exited");
        Ok(())
    }

    /// Draws one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    pub fn draw<F>(&mut self, f: F) -> Result<(), TuiError>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    /// Waits for the next terminal or timer event.
    ///
    /// Returns `None` once the event task has stopped.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    fn start_event_loop(&mut self) {
        let tick_delay = Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = Duration::from_secs_f64(1.0 / self.frame_rate.max(1.0));
        let event_tx = self.event_tx.clone();
        let token = self.cancellation_token.clone();

        debug!(
            tick_delay_ms = tick_delay.as_millis(),
            render_delay_ms = render_delay.as_millis(),
            "Starting event loop"
        );

        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            render_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = token.cancelled() => break,
                    _ = tick_interval.tick() => Some(Event::Tick),
                    _ = render_interval.tick() => Some(Event::Render),
                    next = reader.next() => match next {
                        Some(Ok(event)) => convert_crossterm_event(event),
                        Some(Err(e)) => {
                            warn!(error = %e, "Error reading terminal event");
                            None
                        }
                        None => {
                            debug!("Terminal event stream ended");
                            break;
                        }
                    },
                };

                if let Some(event) = event {
                    trace!(?event, "Sending event");
                    if event_tx.send(event).await.is_err() {
                        error!("Event channel closed");
                        break;
                    }
                }
            }
        });

        self.task = Some(task);
    }

    fn stop_event_loop(&mut self) {
        self.cancellation_token.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!(error = %e, "Failed to restore terminal on drop");
        }
    }
}

fn convert_crossterm_event(event: crossterm::event::Event) -> Option<Event> {
    use crossterm::event::Event as CrosstermEvent;

    match event {
        // Release and repeat events are ignored.
        CrosstermEvent::Key(key) => (key.kind == KeyEventKind::Press).then_some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        CrosstermEvent::FocusGained => Some(Event::FocusGained),
        CrosstermEvent::FocusLost => Some(Event::FocusLost),
        CrosstermEvent::Paste(_) => None,
    }
}
