//! Trailing-edge debouncing.
//!
//! A [`Debouncer`] coalesces a burst of calls into a single callback
//! invocation carrying the **last** value, fired once the burst has been
//! quiet for the whole window.
//!
//! ```text
//! call(1)  call(2)     call(3)
//!   │        │           │
//! ──┴────────┴───────────┴──────────────┬──►
//!                        │◄── window ──►│
//!                                   callback(3)
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::trace;

enum Command<T> {
    Call(T),
    Flush,
}

/// Handle to a debouncing task.
///
/// Cloning yields another handle to the same task. The task, and any value
/// still pending in it, is dropped once the last handle is dropped.
///
/// Must be created inside a tokio runtime.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tp_engine::Debouncer;
///
/// # async fn example() {
/// let debouncer = Debouncer::new(Duration::from_millis(150), |n: usize| {
///     println!("refresh with {n} results");
/// });
/// for n in 0..100 {
///     debouncer.call(n);
/// }
/// // prints "refresh with 99 results" once, 150ms later
/// # }
/// ```
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<Command<T>>,
    window: Duration,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            window: self.window,
        }
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debouncing task.
    pub fn new<F>(window: Duration, callback: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(window, rx, callback));
        Self { tx, window }
    }

    /// Schedules `callback(value)`, replacing any pending value and
    /// restarting the window.
    ///
    /// Returns `false` if the debouncing task has stopped.
    pub fn call(&self, value: T) -> bool {
        self.send(Command::Call(value))
    }

    /// Delivers the pending value now, if there is one.
    ///
    /// Returns `false` if the debouncing task has stopped.
    pub fn flush(&self) -> bool {
        self.send(Command::Flush)
    }

    fn send(&self, command: Command<T>) -> bool {
        let sent = self.tx.send(command).is_ok();
        if !sent {
            trace!("Debouncer task gone, dropping command");
        }
        sent
    }

    /// Returns the debounce window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}

async fn run<T, F>(window: Duration, mut rx: mpsc::UnboundedReceiver<Command<T>>, mut callback: F)
where
    F: FnMut(T),
{
    let mut pending: Option<T> = None;
    let sleep = tokio::time::sleep(window);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Call(value)) => {
                    pending = Some(value);
                    sleep.as_mut().reset(Instant::now() + window);
                }
                Some(Command::Flush) => {
                    if let Some(value) = pending.take() {
                        callback(value);
                    }
                }
                None => break,
            },
            () = &mut sleep, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    callback(value);
                }
            }
        }
    }

    if pending.is_some() {
        trace!("Debouncer dropped with a pending value");
    }
}
