//! Core types, configuration, and errors for the treepick workspace.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`ConfigError`] for configuration loading and validation failures
//! - Configuration structures ([`Config`], [`TreeConfig`], [`SearchConfig`],
//!   [`WatchConfig`], [`TuiConfig`])
//! - Domain types ([`FilesystemEntry`], [`SelectedItem`], [`SearchHit`],
//!   [`TreeNode`], [`TreeItem`])
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)
//!
//! # Crate Dependencies
//!
//! ```text
//! tp-cli ──► tp-tui ──► tp-engine ──► tp-watcher ──► tp-core
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{ColorScheme, Config, SearchConfig, TreeConfig, TuiConfig, WatchConfig};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use types::{
    CheckState, Collapsible, EntryKind, FilesystemEntry, SearchHit, SearchPhase, SelectedItem,
    TreeItem, TreeNode,
};
