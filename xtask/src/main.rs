//! Build automation tasks for the treepick workspace.
//!
//! Run with: `cargo xt <command>`
//!
//! # Available Commands
//!
//! - `check`: Run all checks (fmt, clippy, test)
//! - `fmt`: Format code with rustfmt
//! - `lint`: Run clippy with all targets
//! - `test`: Run all tests
//! - `build`: Build the release binary
//! - `doc`: Build documentation
//! - `clean`: Clean build artifacts

// xtask is a build tool - printing to stderr is expected
#![allow(clippy::print_stderr)]

use std::process::Command;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};

/// Build automation for treepick
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for treepick")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks (fmt --check, clippy, test)
    Check,
    /// Format code with rustfmt
    Fmt {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    /// Run clippy lints
    Lint {
        /// Automatically fix lint warnings
        #[arg(long)]
        fix: bool,
    },
    /// Run all tests
    Test {
        /// Run tests with release optimizations
        #[arg(long)]
        release: bool,
    },
    /// Build the `treepick` binary
    Build {
        /// Build in debug mode
        #[arg(long)]
        debug: bool,
    },
    /// Clean build artifacts
    Clean,
    /// Generate documentation
    Doc {
        /// Open in browser after building
        #[arg(long)]
        open: bool,
    },
}

impl Commands {
    /// Cargo invocations for this command, run in order.
    fn cargo_args(&self) -> Vec<Vec<&'static str>> {
        match self {
            Self::Check => [
                Self::Fmt { check: true },
                Self::Lint { fix: false },
                Self::Test { release: false },
            ]
            .iter()
            .flat_map(Self::cargo_args)
            .collect(),
            Self::Fmt { check } => {
                let mut args = vec!["fmt", "--all"];
                if *check {
                    args.extend(["--", "--check"]);
                }
                vec![args]
            }
            Self::Lint { fix } => {
                let mut args = vec!["clippy", "--workspace", "--all-targets"];
                if *fix {
                    args.extend(["--fix", "--allow-dirty", "--allow-staged"]);
                }
                args.extend(["--", "-D", "warnings"]);
                vec![args]
            }
            Self::Test { release } => {
                let mut args = vec!["test", "--workspace"];
                if *release {
                    args.push("--release");
                }
                vec![args]
            }
            Self::Build { debug } => {
                let mut args = vec!["build", "--package", "tp-cli"];
                if !*debug {
                    args.push("--release");
                }
                vec![args]
            }
            Self::Clean => vec![vec!["clean"]],
            Self::Doc { open } => {
                let mut args = vec!["doc", "--workspace", "--no-deps"];
                if *open {
                    args.push("--open");
                }
                vec![args]
            }
        }
    }
}

/// Returns the workspace root (the parent of this crate's directory).
fn workspace_root() -> Result<Utf8PathBuf> {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(Utf8Path::to_path_buf)
        .context("xtask manifest has no parent directory")
}

fn cargo(root: &Utf8Path, args: &[&str]) -> Result<()> {
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_owned());
    eprintln!("$ cargo {}", args.join(" "));

    let status = Command::new(&cargo)
        .args(args)
        .current_dir(root)
        .status()
        .with_context(|| format!("failed to run {cargo}"))?;
    if !status.success() {
        bail!("cargo {} failed with {status}", args.join(" "));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = workspace_root()?;

    for args in cli.command.cargo_args() {
        cargo(&root, &args)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_runs_fmt_lint_test_in_order() {
        let steps = Commands::Check.cargo_args();
        let commands: Vec<&str> = steps.iter().map(|args| args[0]).collect();
        assert_eq!(commands, vec!["fmt", "clippy", "test"]);
        assert!(steps[0].ends_with(&["--check"]));
        assert!(steps[1].ends_with(&["-D", "warnings"]));
    }

    #[test]
    fn test_build_defaults_to_release() {
        let steps = Commands::Build { debug: false }.cargo_args();
        assert_eq!(steps, vec![vec!["build", "--package", "tp-cli", "--release"]]);

        let steps = Commands::Build { debug: true }.cargo_args();
        assert!(!steps[0].contains(&"--release"));
    }

    #[test]
    fn test_workspace_root_contains_manifest() {
        let root = workspace_root().unwrap();
        assert!(root.join("Cargo.toml").exists());
    }
}
