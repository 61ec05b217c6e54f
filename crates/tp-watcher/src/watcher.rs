//! Tree watcher with async batch streaming.
//!
//! [`FileWatcher`] bridges the synchronous `notify` crate to tokio.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Blocking Thread (spawn_blocking)              │
//! │  ┌───────────────────┐    ┌────────────────┐    ┌─────────────┐  │
//! │  │ RecommendedWatcher│ -> │ Debouncer      │ -> │ Callback    │  │
//! │  │ (notify)          │    │ (debounce_ms)  │    │ (filter +   │  │
//! │  └───────────────────┘    └────────────────┘    │  classify)  │  │
//! │                                                 └──────┬──────┘  │
//! └────────────────────────────────────────────────────────│─────────┘
//!                                           blocking_send  │ FileEventBatch
//!                                                          ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                         │
//! │  FileWatcher (shutdown ctrl) + mpsc::Receiver ──► tree refresh   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use tp_watcher::{FileWatcher, HiddenPathFilter};
//! use tp_core::WatchConfig;
//! use camino::Utf8Path;
//!
//! # async fn example() -> Result<(), tp_watcher::WatchError> {
//! let root = Utf8Path::new("/srv/tree").canonicalize_utf8()?;
//! let mut watcher =
//!     FileWatcher::new(&root, &WatchConfig::default(), HiddenPathFilter::new(&root)).await?;
//!
//! while let Some(batch) = watcher.recv().await {
//!     println!("{} paths changed", batch.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use tp_core::WatchConfig;

use crate::error::WatchError;
use crate::events::{FileEvent, FileEventBatch, FileEventKind};
use crate::filter::FileFilter;

/// Default channel capacity, in batches.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Watches a directory tree and streams debounced change batches.
///
/// # Lifecycle
///
/// 1. [`FileWatcher::new`] validates and canonicalizes the root, then spawns
///    a blocking task running the notify debouncer.
/// 2. [`FileWatcher::recv`] yields one [`FileEventBatch`] per debouncer
///    callback that had at least one event surviving the filter.
/// 3. [`FileWatcher::shutdown`] stops the task and awaits it. Dropping the
///    watcher sends the same stop signal without waiting.
pub struct FileWatcher {
    /// Stop signal for the blocking task; `None` once sent.
    shutdown_tx: Option<oneshot::Sender<()>>,

    task_handle: Option<JoinHandle<Result<(), WatchError>>>,

    batch_rx: mpsc::Receiver<FileEventBatch>,

    /// Canonical watch root.
    watch_path: Utf8PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("watch_path", &self.watch_path)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Starts watching `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if `path` does not exist,
    /// [`WatchError::NotADirectory`] if it is not a directory and
    /// [`WatchError::Io`] if it cannot be canonicalized.
    #[allow(clippy::unused_async)] // async for symmetry with shutdown()
    pub async fn new<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
    ) -> Result<Self, WatchError> {
        Self::with_capacity(path, config, filter, DEFAULT_CHANNEL_CAPACITY).await
    }

    /// Starts watching `path` with a custom batch channel capacity.
    ///
    /// When the channel is full the watcher thread blocks, which in turn
    /// backs up the notify debouncer.
    #[allow(clippy::unused_async)]
    pub async fn with_capacity<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
        channel_capacity: usize,
    ) -> Result<Self, WatchError> {
        if !path.exists() {
            return Err(WatchError::path_not_found(path));
        }
        if !path.is_dir() {
            return Err(WatchError::NotADirectory(path.to_owned()));
        }

        let watch_path = path.canonicalize_utf8()?;

        let (batch_tx, batch_rx) = mpsc::channel(channel_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task_path = watch_path.clone();
        let debounce = Duration::from_millis(config.debounce_ms);
        let mode = if config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        let task_handle = tokio::task::spawn_blocking(move || {
            run_watcher_loop(&task_path, debounce, mode, batch_tx, shutdown_rx, filter)
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            batch_rx,
            watch_path,
        })
    }

    /// Receives the next batch.
    ///
    /// Returns `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<FileEventBatch> {
        self.batch_rx.recv().await
    }

    /// Receives a batch without waiting.
    pub fn try_recv(&mut self) -> Result<FileEventBatch, mpsc::error::TryRecvError> {
        self.batch_rx.try_recv()
    }

    /// Returns the canonical watch root.
    #[must_use]
    pub fn watch_path(&self) -> &Utf8Path {
        &self.watch_path
    }

    /// Returns `true` while the blocking task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the watcher and waits for the blocking task to exit.
    ///
    /// # Errors
    ///
    /// Returns the error the watcher task stopped with, or
    /// [`WatchError::ChannelClosed`] if the task panicked.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(_join_error) => return Err(WatchError::ChannelClosed),
            }
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Turns one debouncer callback into a filtered batch.
fn collect_batch<F: FileFilter>(result: DebounceEventResult, filter: &F) -> FileEventBatch {
    let mut batch = FileEventBatch::new();
    let events = match result {
        Ok(events) => events,
        Err(error) => {
            tracing::warn!(error = %error, "Debouncer error");
            return batch;
        }
    };

    for event in events {
        let path = match Utf8PathBuf::try_from(event.path) {
            Ok(path) => path,
            Err(e) => {
                let err = WatchError::non_utf8_path(e.into_path_buf());
                tracing::warn!(error = %err, "Skipping file event");
                continue;
            }
        };

        if !filter.should_process(&path) {
            tracing::trace!(path = %path, "Filtered out file event");
            continue;
        }

        let kind = FileEventKind::probe(&path);
        batch.push(FileEvent::new(path, kind));
    }

    batch
}

fn run_watcher_loop<F: FileFilter>(
    path: &Utf8Path,
    debounce: Duration,
    mode: RecursiveMode,
    batch_tx: mpsc::Sender<FileEventBatch>,
    shutdown_rx: oneshot::Receiver<()>,
    filter: F,
) -> Result<(), WatchError> {
    let mut debouncer: Debouncer<notify::RecommendedWatcher> =
        new_debouncer(debounce, move |res: DebounceEventResult| {
            let batch = collect_batch(res, &filter);
            if batch.is_empty() {
                return;
            }
            tracing::debug!(events = batch.len(), "Forwarding file event batch");
            if batch_tx.blocking_send(batch).is_err() {
                tracing::debug!("Batch channel closed, dropping events");
            }
        })?;

    debouncer.watcher().watch(path.as_std_path(), mode)?;

    tracing::info!(path = %path, recursive = matches!(mode, RecursiveMode::Recursive), "File watcher started");

    let _ = shutdown_rx.blocking_recv();

    tracing::info!(path = %path, "File watcher stopped");

    Ok(())
}
