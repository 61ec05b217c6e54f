//! Configuration structures for treepick.
//!
//! This module provides configuration types for all components of the application:
//!
//! - [`TreeConfig`] - Tree root and listing settings
//! - [`SearchConfig`] - Incremental search settings (debouncing)
//! - [`WatchConfig`] - File watcher settings (debouncing, recursion)
//! - [`TuiConfig`] - Terminal UI settings (tick rate, colors)
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] and deserialize with
//! `#[serde(default)]`, so a config file only needs the keys it overrides.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Color scheme for the TUI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ColorScheme {
    /// Automatically detect based on terminal settings.
    #[default]
    Auto,
    /// Light color scheme (dark text on light background).
    Light,
    /// Dark color scheme (light text on dark background).
    Dark,
}

/// Configuration for the browsed tree.
///
/// # Examples
///
/// ```
/// use tp_core::TreeConfig;
///
/// let config = TreeConfig::default();
/// assert_eq!(config.root_path.as_str(), ".");
/// assert!(!config.show_hidden);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Root directory of the browsed tree.
    pub root_path: Utf8PathBuf,

    /// Whether dot-prefixed entries are listed.
    ///
    /// Off by default: hidden entries never appear in listings, cascades,
    /// or search results.
    pub show_hidden: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_path: Utf8PathBuf::from("."),
            show_hidden: false,
        }
    }
}

/// Configuration for incremental name search.
///
/// # Examples
///
/// ```
/// use tp_core::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.debounce_ms, 150);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Window in milliseconds for coalescing streamed search results into
    /// a single tree refresh.
    pub debounce_ms: u64,

    /// Queries shorter than this (in characters) clear the search instead
    /// of starting one.
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            min_query_len: 1,
        }
    }
}

/// Configuration for the file watcher.
///
/// # Examples
///
/// ```
/// use tp_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 100);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Whether the tree is watched for external changes.
    pub enabled: bool,

    /// Debounce window of the low-level watcher in milliseconds.
    pub debounce_ms: u64,

    /// Window in milliseconds for coalescing watcher events into a single
    /// full tree refresh.
    pub refresh_debounce_ms: u64,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 100,
            refresh_debounce_ms: 300,
            recursive: true,
        }
    }
}

/// Configuration for the terminal user interface.
///
/// # Examples
///
/// ```
/// use tp_core::{TuiConfig, ColorScheme};
///
/// let config = TuiConfig::default();
/// assert_eq!(config.tick_rate_ms, 250);
/// assert_eq!(config.color_scheme, ColorScheme::Auto);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick rate in milliseconds (status message expiry, housekeeping).
    pub tick_rate_ms: u64,

    /// Render rate in frames per second.
    pub frame_rate: u32,

    /// Color scheme for the interface.
    pub color_scheme: ColorScheme,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            frame_rate: 30,
            color_scheme: ColorScheme::Auto,
        }
    }
}

/// Root configuration for treepick.
///
/// # Examples
///
/// ```
/// use tp_core::Config;
///
/// let config = Config::default();
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// let parsed: Config = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, parsed);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tree configuration.
    pub tree: TreeConfig,

    /// Search configuration.
    pub search: SearchConfig,

    /// File watcher configuration.
    pub watch: WatchConfig,

    /// Terminal UI configuration.
    pub tui: TuiConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration JSON.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectory`] if the root does not exist,
    /// [`ConfigError::InvalidPath`] if it is not a directory, and
    /// [`ConfigError::InvalidOption`] for zero debounce windows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = &self.tree.root_path;
        if !root.exists() {
            return Err(ConfigError::MissingDirectory(root.clone()));
        }
        if !root.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: root.clone(),
                reason: "not a directory".to_owned(),
            });
        }

        if self.search.debounce_ms == 0 {
            return Err(ConfigError::invalid_option(
                "search.debounce_ms",
                "must be greater than zero",
            ));
        }
        if self.watch.refresh_debounce_ms == 0 {
            return Err(ConfigError::invalid_option(
                "watch.refresh_debounce_ms",
                "must be greater than zero",
            ));
        }
        if self.tui.frame_rate == 0 {
            return Err(ConfigError::invalid_option(
                "tui.frame_rate",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_config_defaults() {
        let config = TreeConfig::default();
        assert_eq!(config.root_path, Utf8PathBuf::from("."));
        assert!(!config.show_hidden);
    }

    #[test]
    fn test_watch_config_defaults() {
        let config = WatchConfig::default();
        assert!(config.enabled);
        assert_eq!(config.debounce_ms, 100);
        assert_eq!(config.refresh_debounce_ms, 300);
        assert!(config.recursive);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"search": {"debounce_ms": 40}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.search.debounce_ms, 40);
        assert_eq!(config.search.min_query_len, 1);
        assert_eq!(config.watch.debounce_ms, 100);
        assert_eq!(config.tui.frame_rate, 30);
    }

    #[test]
    fn test_color_scheme_serialization() {
        assert_eq!(
            serde_json::to_string(&ColorScheme::Dark).unwrap(),
            r#""dark""#
        );
        assert_eq!(
            serde_json::to_string(&ColorScheme::Light).unwrap(),
            r#""light""#
        );
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("treepick.json");
        std::fs::write(&path, r#"{"tree": {"show_hidden": true}}"#).unwrap();

        let config = Config::from_json_file(&path).unwrap();
        assert!(config.tree.show_hidden);
        assert_eq!(config.tree.root_path.as_str(), ".");
    }

    #[test]
    fn test_from_json_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_missing_root() {
        let mut config = Config::default();
        config.tree.root_path = Utf8PathBuf::from("/nonexistent/treepick/root");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_validate_zero_debounce() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.tree.root_path = Utf8Path::from_path(dir.path()).unwrap().to_owned();
        assert!(config.validate().is_ok());

        config.search.debounce_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOption { .. })
        ));
    }
}
