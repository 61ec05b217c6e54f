//! The hierarchical selection-and-search engine behind treepick.
//!
//! This crate turns a directory tree into the data a tree widget needs,
//! keeps a selection set with directory-cascade semantics, and runs a
//! cancellable, incrementally streamed name search over the same tree.
//!
//! # Overview
//!
//! - [`EntryLister`]: sorted, hidden-filtered directory listings that never
//!   fail (errors become empty listings and a log line)
//! - [`SelectionSet`]: absolute paths, toggled with cascade, snapshotted
//!   with fresh stats
//! - [`SearchWalker`] / [`SearchController`]: current-level-first name
//!   search with per-generation [`CancellationToken`]s
//! - [`Debouncer`]: coalesces bursts of updates into one delivery
//! - [`Broadcaster`]: typed subscribe/unsubscribe fan-out
//! - [`TreePicker`]: the engine instance composing all of the above
//!
//! # Architecture
//!
//! ```text
//! TreePicker
//!     │
//!     ├── EntryLister (tokio::fs)
//!     │
//!     ├── SelectionSet (parking_lot::Mutex<FxHashSet>)
//!     │
//!     ├── SearchController ◄── SearchWalker task per generation
//!     │         │
//!     │         └── Debouncer<TreeChange> ──► Broadcaster<TreeChange>
//!     │
//!     ├── Broadcaster<Vec<SelectedItem>>
//!     │
//!     └── WatchHandle ── tp_watcher::FileWatcher ──► Debouncer<()> ──► Refresh
//! ```
//!
//! # Concurrency
//!
//! Every listing and stat is an await point. Engine state lives behind
//! `parking_lot` mutexes that are only taken between await points, so no
//! operation observes another one half-applied. A toggle computes its whole
//! cascade before taking the selection lock.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

#![deny(clippy::all)]
#![warn(missing_docs)]

mod broadcast;
mod debounce;
mod error;
mod lister;
mod search;
mod selection;
mod tree;

#[cfg(test)]
mod testing;

pub use broadcast::{Broadcaster, SubscriberId, Subscription};
pub use debounce::Debouncer;
pub use error::EngineError;
pub use lister::EntryLister;
pub use search::{SearchController, SearchSession, SearchWalker, matches};
pub use selection::{SelectionSet, ToggleOutcome};
pub use tree::{TreeChange, TreePicker, WatchHandle};
