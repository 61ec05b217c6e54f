//! Recursive tree watching for treepick.
//!
//! The picker does no incremental diffing: any change anywhere below the root
//! invalidates the whole tree view. This crate supplies the signal. It wraps
//! `notify` with `notify-debouncer-mini`, filters out hidden paths on the
//! watcher thread, and streams one [`FileEventBatch`] per debouncer callback
//! into tokio.
//!
//! # Crate Dependencies
//!
//! ```text
//! tp-cli ──► tp-tui ──► tp-engine ──► tp-watcher ──► tp-core
//! ```
//!
//! # Usage with `tokio::select!`
//!
//! ```no_run
//! use tp_watcher::{AcceptAllFilter, FileWatcher};
//! use tp_core::WatchConfig;
//! use camino::Utf8Path;
//! use tokio::time::{Duration, interval};
//!
//! # async fn example() -> Result<(), tp_watcher::WatchError> {
//! let mut watcher =
//!     FileWatcher::new(Utf8Path::new("."), &WatchConfig::default(), AcceptAllFilter).await?;
//! let mut tick = interval(Duration::from_millis(250));
//!
//! loop {
//!     tokio::select! {
//!         Some(batch) = watcher.recv() => {
//!             println!("{:?}", batch.summary());
//!         }
//!         _ = tick.tick() => {}
//!     }
//! }
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod filter;
pub mod watcher;

pub use error::WatchError;
pub use events::{BatchSummary, FileEvent, FileEventBatch, FileEventKind};
pub use filter::{AcceptAllFilter, FileFilter, HiddenPathFilter};
pub use watcher::FileWatcher;
