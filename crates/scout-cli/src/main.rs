//! CLI entry point for the scout file finder.
//!
//! # Usage
//!
//! ```bash
//! scout [ROOTS]... [OPTIONS]
//!
//! # Every file under the current directory
//! scout
//!
//! # JavaScript and CSS files under two roots
//! scout html static -e .js -e .css
//!
//! # Delegate traversal to find(1), skipping vendored code
//! scout html --native --ignore node_modules
//!
//! # Machine-readable output
//! scout html -e .js --json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scout_core::{BackendKind, ExtensionFilter, FindConfig};
use scout_finder::{Finder, SubstringIgnore};

/// Finds files by extension under one or more root directories.
///
/// Symbolic links are never listed. Each match is reported with its
/// last-modification time in milliseconds since the Unix epoch. Output order
/// is unspecified.
#[derive(Parser)]
#[command(name = "scout", version, about, long_about = None)]
struct Cli {
    /// Root directories to scan.
    ///
    /// Defaults to the current directory if none are given.
    roots: Vec<Utf8PathBuf>,

    /// Extension to match (repeatable, with or without the leading dot).
    ///
    /// Omitting the flag matches every file.
    #[arg(short = 'e', long = "ext")]
    extensions: Vec<String>,

    /// Exclude any path containing this substring (repeatable).
    ///
    /// Excluded directories are not descended into, and excluded paths
    /// incur no filesystem I/O.
    #[arg(long = "ignore")]
    ignore: Vec<String>,

    /// Delegate traversal to the find(1) utility.
    ///
    /// Falls back to the in-process walker where it is unavailable.
    #[arg(long)]
    native: bool,

    /// Emit results as a JSON array instead of tab-separated lines.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `warn` level by default so scan
/// output stays clean.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(level)
    });

    // Colors off when asked via flag or the NO_COLOR convention
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi),
        )
        .with(filter)
        .init();
}

/// Builds a [`Finder`] from CLI arguments.
fn build_finder(cli: &Cli) -> anyhow::Result<Finder> {
    let extensions = if cli.extensions.is_empty() {
        ExtensionFilter::All
    } else {
        ExtensionFilter::try_from_extensions(&cli.extensions)
            .context("invalid --ext argument")?
    };

    let backend = if cli.native {
        BackendKind::Native
    } else {
        BackendKind::InProcess
    };

    let config = FindConfig {
        roots: cli.roots.clone(),
        extensions,
        backend,
    }
    .normalized();
    config.validate().context("invalid scan request")?;

    let mut finder = Finder::from_config(config);
    if !cli.ignore.is_empty() {
        finder = finder.with_ignore(SubstringIgnore::new(cli.ignore.iter().cloned()));
    }
    Ok(finder)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    let finder = build_finder(&cli)?;
    info!(roots = finder.config().roots.len(), "starting scan");

    let records = finder.find().await.context("scan failed")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &records).context("failed to encode results")?;
        writeln!(out)?;
    } else {
        for record in &records {
            writeln!(out, "{}\t{}", record.path, record.modified_ms)?;
        }
    }

    Ok(())
}
