//! CLI entry point for treepick.
//!
//! This binary drives a [`TreePicker`] either interactively (the TUI) or
//! through one-shot commands that print to stdout.
//!
//! # Usage
//!
//! ```bash
//! treepick [OPTIONS] <COMMAND>
//!
//! # Interactive picker with live file watching
//! treepick --root ~/project browse --log-file /tmp/treepick.log
//!
//! # List one directory the way the tree shows it
//! treepick ls src
//!
//! # Stream name matches as they are found
//! treepick search readme --json
//!
//! # Toggle paths and print the resulting selection
//! treepick select src docs/intro.md
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use serde::Serialize;
use tp_core::{Config, EntryKind, FilesystemEntry, SearchHit, SelectedItem};
use tp_engine::{SearchWalker, TreePicker};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Hierarchical file picker with cascading checkbox selection and name search.
#[derive(Parser)]
#[command(name = "treepick", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Root directory of the tree.
    ///
    /// Overrides `tree.root_path` from the config file. Defaults to `.`.
    #[arg(short, long, global = true, env = "TREEPICK_ROOT")]
    root: Option<Utf8PathBuf>,

    /// JSON configuration file.
    #[arg(short, long, global = true, env = "TREEPICK_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// List dot-prefixed entries.
    #[arg(long, global = true)]
    show_hidden: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start the interactive picker.
    Browse {
        /// Disable file watching (static view).
        #[arg(long)]
        no_watch: bool,

        /// Write logs to this file. Logging is off otherwise, since the
        /// terminal belongs to the UI.
        #[arg(long)]
        log_file: Option<Utf8PathBuf>,
    },

    /// List the children of a directory.
    Ls {
        /// Directory to list, relative to the root. Defaults to the root.
        dir: Option<Utf8PathBuf>,

        /// Print JSON instead of names.
        #[arg(long)]
        json: bool,
    },

    /// Search entry names below the root (case-insensitive substring).
    Search {
        /// Query to match against entry names.
        query: String,

        /// Print one JSON object per hit.
        #[arg(long)]
        json: bool,
    },

    /// Toggle paths in order and print the resulting selection.
    Select {
        /// Paths to toggle, relative to the root or absolute.
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,

        /// Print the selection as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Where log output goes.
enum LogTarget {
    Stderr,
    File(Utf8PathBuf),
    Disabled,
}

impl LogTarget {
    fn for_command(command: &Commands) -> Self {
        match command {
            Commands::Browse {
                log_file: Some(path),
                ..
            } => Self::File(path.clone()),
            Commands::Browse { log_file: None, .. } => Self::Disabled,
            _ => Self::Stderr,
        }
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber.
///
/// Respects `RUST_LOG` if set; otherwise logs at `info`, or `debug` with
/// `--verbose`. Stdout is left to command output.
fn init_tracing(verbose: bool, no_color: bool, target: &LogTarget) -> color_eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},mio=warn,notify=warn"))
    });

    match target {
        LogTarget::Disabled => {}
        LogTarget::Stderr => {
            let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(use_ansi)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
        LogTarget::File(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| eyre!("Cannot open log file {path}: {e}"))?;
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .with(filter)
                .init();
        }
    }
    Ok(())
}

/// Builds a [`Config`]: defaults, then `--config`, then flags.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the result
/// fails validation.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .map_err(|e| eyre!("Failed to load config {path}: {e}"))?,
        None => Config::default(),
    };

    if let Some(root) = &cli.root {
        config.tree.root_path.clone_from(root);
    }
    if cli.show_hidden {
        config.tree.show_hidden = true;
    }

    config.validate()?;
    Ok(config)
}

/// Resolves a user-supplied path against the tree root and canonicalizes it.
async fn resolve_path(root: &Utf8Path, path: &Utf8Path) -> color_eyre::Result<Utf8PathBuf> {
    let joined = if path.is_absolute() {
        path.to_owned()
    } else {
        root.join(path)
    };
    let canonical = tokio::fs::canonicalize(&joined)
        .await
        .map_err(|e| eyre!("Cannot resolve {joined}: {e}"))?;
    let resolved = Utf8PathBuf::try_from(canonical)
        .map_err(|e| eyre!("Path is not UTF-8: {}", e.into_path_buf().display()))?;

    if !resolved.starts_with(root) {
        return Err(eyre!("{resolved} is outside the tree root {root}"));
    }
    Ok(resolved)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs the interactive picker.
///
/// # Errors
///
/// Returns an error if the engine cannot start or the TUI fails.
async fn run_browse(mut config: Config, no_watch: bool) -> color_eyre::Result<()> {
    if no_watch {
        config.watch.enabled = false;
    }
    info!(root = %config.tree.root_path, watch = config.watch.enabled, "Starting TUI");

    let picker = TreePicker::new(&config).await?;

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            result = tp_tui::run(config, picker) => {
                result.map_err(|e| eyre!("TUI error: {e}"))?;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tp_tui::run(config, picker)
            .await
            .map_err(|e| eyre!("TUI error: {e}"))?;
    }

    Ok(())
}

/// Prints the listing of `dir` (the root when `None`).
///
/// # Errors
///
/// Returns an error if `dir` does not resolve to a directory under the root.
async fn run_ls(
    config: &Config,
    dir: Option<&Utf8Path>,
    json: bool,
    out: &mut impl Write,
) -> color_eyre::Result<()> {
    let picker = TreePicker::new(config).await?;
    let lister = picker.lister();

    let dir = match dir {
        Some(dir) => resolve_path(picker.root(), dir).await?,
        None => picker.root().to_owned(),
    };
    let kind = lister
        .stat(&dir)
        .await
        .map_err(|e| eyre!("Cannot stat {dir}: {e}"))?;
    if !kind.is_dir() {
        return Err(eyre!("Not a directory: {dir}"));
    }

    let entries = lister.list(&dir).await;
    write_entries(out, &entries, json)
}

/// Walks the tree once for `query`, printing hits as they arrive, until the
/// tree is exhausted or `token` is cancelled.
///
/// # Errors
///
/// Returns an error if the query is shorter than `search.min_query_len` or
/// output cannot be written.
async fn run_search(
    config: &Config,
    query: &str,
    json: bool,
    token: CancellationToken,
    out: &mut impl Write,
) -> color_eyre::Result<()> {
    let min_len = config.search.min_query_len.max(1);
    if query.chars().count() < min_len {
        return Err(eyre!("Query must be at least {min_len} character(s)"));
    }

    let picker = TreePicker::new(config).await?;
    let mut walker = SearchWalker::new(
        picker.lister(),
        picker.root().to_owned(),
        query,
        token.clone(),
    );
    info!(root = %picker.root(), query = %query, "Searching");

    let mut hits = 0usize;
    while let Some(hit) = walker.next().await {
        write_hit(out, &hit, json)?;
        hits += 1;
    }

    info!(hits, cancelled = token.is_cancelled(), "Search finished");
    Ok(())
}

/// Returns a token cancelled on Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            interrupt.cancel();
        }
    });
    token
}

/// Toggles each path in order and prints the final selection snapshot.
///
/// # Errors
///
/// Returns an error if a path cannot be resolved or stat'ed, or the
/// snapshot fails.
async fn run_select(
    config: &Config,
    paths: &[Utf8PathBuf],
    json: bool,
    out: &mut impl Write,
) -> color_eyre::Result<()> {
    let picker = TreePicker::new(config).await?;

    for path in paths {
        let path = resolve_path(picker.root(), path).await?;
        let kind = picker
            .lister()
            .stat(&path)
            .await
            .map_err(|e| eyre!("Cannot stat {path}: {e}"))?;
        let outcome = picker
            .toggle_selection_by_ui_item(&FilesystemEntry::new(path.clone(), kind))
            .await?;
        info!(
            path = %path,
            selected = outcome.is_selected(),
            touched = outcome.touched(),
            "Toggled"
        );
    }

    let snapshot = picker.get_selected_files().await?;
    write_selection(out, &snapshot, picker.root(), json)
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// A search hit as printed by `search --json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HitRecord<'a> {
    path: &'a Utf8Path,
    relative_path: &'a Utf8Path,
    kind: EntryKind,
}

/// Appends `/` to directory labels.
fn entry_label(label: &str, kind: EntryKind) -> String {
    match kind {
        EntryKind::Directory => format!("{label}/"),
        EntryKind::File => label.to_owned(),
    }
}

fn write_entries(
    out: &mut impl Write,
    entries: &[FilesystemEntry],
    json: bool,
) -> color_eyre::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, entries)?;
        writeln!(out)?;
    } else {
        for entry in entries {
            writeln!(out, "{}", entry_label(&entry.name, entry.kind))?;
        }
    }
    Ok(())
}

fn write_hit(out: &mut impl Write, hit: &SearchHit, json: bool) -> color_eyre::Result<()> {
    if json {
        let record = HitRecord {
            path: &hit.path,
            relative_path: &hit.relative_path,
            kind: hit.kind,
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", entry_label(hit.relative_path.as_str(), hit.kind))?;
    }
    Ok(())
}

fn write_selection(
    out: &mut impl Write,
    items: &[SelectedItem],
    root: &Utf8Path,
    json: bool,
) -> color_eyre::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, items)?;
        writeln!(out)?;
        return Ok(());
    }

    for item in items {
        let kind = EntryKind::from_is_dir(item.is_directory);
        let label = tp_tui::app::display_path(&item.path, root);
        writeln!(out, "{}", entry_label(label, kind))?;
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // color-eyre goes first so panics during setup are reported too.
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(
        cli.verbose,
        cli.no_color,
        &LogTarget::for_command(&cli.command),
    )?;

    let config = build_config(&cli)?;
    let stdout = std::io::stdout();

    match &cli.command {
        Commands::Browse { no_watch, .. } => run_browse(config, *no_watch).await,
        Commands::Ls { dir, json } => {
            run_ls(&config, dir.as_deref(), *json, &mut stdout.lock()).await
        }
        Commands::Search { query, json } => {
            let token = interrupt_token();
            run_search(&config, query, *json, token, &mut stdout.lock()).await
        }
        Commands::Select { paths, json } => {
            run_select(&config, paths, *json, &mut stdout.lock()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    /// root/
    ///   a.txt
    ///   .env
    ///   sub/b.txt
    ///   sub/c.txt
    fn fixture() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(dir.path().join(".env"), "x").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("sub/c.txt"), "c").unwrap();

        let mut config = Config::default();
        config.tree.root_path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, config)
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_select_requires_paths() {
        assert!(Cli::try_parse_from(["treepick", "select"]).is_err());

        let cli = Cli::try_parse_from(["treepick", "select", "a", "sub", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Select { paths, json: true } if paths == ["a", "sub"]
        ));
    }

    #[test]
    fn test_browse_log_target() {
        let cli = Cli::try_parse_from(["treepick", "browse"]).unwrap();
        assert!(matches!(
            LogTarget::for_command(&cli.command),
            LogTarget::Disabled
        ));

        let cli = Cli::try_parse_from(["treepick", "browse", "--log-file", "/tmp/tp.log"]).unwrap();
        assert!(matches!(
            LogTarget::for_command(&cli.command),
            LogTarget::File(path) if path == "/tmp/tp.log"
        ));

        let cli = Cli::try_parse_from(["treepick", "ls"]).unwrap();
        assert!(matches!(
            LogTarget::for_command(&cli.command),
            LogTarget::Stderr
        ));
    }

    #[test]
    fn test_build_config_flags_override_file() {
        let (dir, config) = fixture();
        let root = config.tree.root_path;
        let config_path = dir.path().join("treepick.json");
        std::fs::write(
            &config_path,
            r#"{ "tree": { "root_path": "/does/not/exist" }, "search": { "debounce_ms": 42 } }"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "treepick",
            "--config",
            config_path.to_str().unwrap(),
            "--root",
            root.as_str(),
            "--show-hidden",
            "ls",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();

        assert_eq!(config.tree.root_path, root);
        assert!(config.tree.show_hidden);
        assert_eq!(config.search.debounce_ms, 42);
    }

    #[test]
    fn test_build_config_rejects_missing_root() {
        let cli =
            Cli::try_parse_from(["treepick", "--root", "/does/not/exist/anywhere", "ls"]).unwrap();
        assert!(build_config(&cli).is_err());
    }

    #[tokio::test]
    async fn test_ls_lists_directories_first_without_hidden() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();

        run_ls(&config, None, false, &mut buf).await.unwrap();
        assert_eq!(output(buf), "sub/\na.txt\n");

        let mut buf = Vec::new();
        run_ls(&config, Some(Utf8Path::new("sub")), false, &mut buf)
            .await
            .unwrap();
        assert_eq!(output(buf), "b.txt\nc.txt\n");
    }

    #[tokio::test]
    async fn test_ls_json() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();
        run_ls(&config, None, true, &mut buf).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let names: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["sub", "a.txt"]);
        assert_eq!(value[0]["kind"], "directory");
    }

    #[tokio::test]
    async fn test_ls_rejects_file() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();
        let result = run_ls(&config, Some(Utf8Path::new("a.txt")), false, &mut buf).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();
        run_search(&config, "B.T", false, CancellationToken::new(), &mut buf)
            .await
            .unwrap();
        assert_eq!(output(buf), "sub/b.txt\n");
    }

    #[tokio::test]
    async fn test_search_json_lines() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();
        run_search(&config, ".txt", true, CancellationToken::new(), &mut buf)
            .await
            .unwrap();

        let text = output(buf);
        let relative: Vec<String> = text
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["relativePath"].as_str().unwrap().to_owned()
            })
            .collect();
        assert_eq!(relative.len(), 3);
        assert!(relative.contains(&"a.txt".to_owned()));
        assert!(relative.contains(&"sub/b.txt".to_owned()));
        assert!(relative.contains(&"sub/c.txt".to_owned()));
    }

    #[tokio::test]
    async fn test_search_stops_when_cancelled() {
        let (_dir, config) = fixture();
        let token = CancellationToken::new();
        token.cancel();

        let mut buf = Vec::new();
        run_search(&config, ".txt", false, token, &mut buf)
            .await
            .unwrap();
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();
        let result = run_search(&config, "", false, CancellationToken::new(), &mut buf).await;
        assert!(result.is_err());
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_select_directory_cascades() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();
        run_select(&config, &[Utf8PathBuf::from("sub")], false, &mut buf)
            .await
            .unwrap();
        assert_eq!(output(buf), "sub/\nsub/b.txt\nsub/c.txt\n");
    }

    #[tokio::test]
    async fn test_select_twice_is_empty() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();
        let paths = [Utf8PathBuf::from("sub"), Utf8PathBuf::from("sub")];
        run_select(&config, &paths, true, &mut buf).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_select_json_shape() {
        let (_dir, config) = fixture();
        let root = tokio::fs::canonicalize(&config.tree.root_path).await.unwrap();
        let mut buf = Vec::new();
        run_select(&config, &[Utf8PathBuf::from("a.txt")], true, &mut buf)
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let expected = root.join("a.txt");
        assert_eq!(value[0]["path"], expected.to_str().unwrap());
        assert_eq!(value[0]["isDirectory"], false);
    }

    #[tokio::test]
    async fn test_select_rejects_missing_and_outside_paths() {
        let (_dir, config) = fixture();
        let mut buf = Vec::new();
        assert!(
            run_select(&config, &[Utf8PathBuf::from("nope")], false, &mut buf)
                .await
                .is_err()
        );

        let outside = TempDir::new().unwrap();
        let outside = Utf8PathBuf::from_path_buf(outside.path().to_path_buf()).unwrap();
        assert!(
            run_select(&config, &[outside], false, &mut buf)
                .await
                .is_err()
        );
    }
}
