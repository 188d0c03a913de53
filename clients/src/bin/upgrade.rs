//! `repo-upgrade`: upgrades a repository export tree to the successor format.
//!
//! Copies every file from the input tree to the output tree, rewrites
//! resource descriptions where the successor format requires it, and writes
//! one `.headers` sidecar per description.
//!
//! **Usage:**
//! ```
//! repo-upgrade --input-dir <path> --output-dir <path> [--source-version 4.7.5] [--target-version 5] [--jobs N]
//! ```
//!
//! Exits non-zero if any file failed to migrate.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use repo_upgrade::{ExportVersion, MigrationConfig, Migrator};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Upgrade a repository export tree.
#[derive(Parser)]
#[command(
    name = "repo-upgrade",
    about = "Upgrade a repository export tree to the successor format"
)]
struct Args {
    /// Root of the export tree to read.
    #[arg(long)]
    input_dir: PathBuf,

    /// Root of the upgraded tree to write.
    #[arg(long)]
    output_dir: PathBuf,

    /// Version the export was produced by.
    #[arg(long, default_value = "4.7.5")]
    source_version: String,

    /// Version to upgrade to.
    #[arg(long, default_value = "5")]
    target_version: String,

    /// Number of files processed concurrently.
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Log per-file details.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = MigrationConfig {
        input_dir: args.input_dir,
        output_dir: args.output_dir,
        source_version: args
            .source_version
            .parse::<ExportVersion>()
            .context("Invalid --source-version")?,
        target_version: args
            .target_version
            .parse::<ExportVersion>()
            .context("Invalid --target-version")?,
        jobs: args.jobs,
    };
    let migrator = Migrator::new(config).context("Invalid upgrade configuration")?;
    let config = migrator.config();
    info!(
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        from = %config.source_version,
        to = %config.target_version,
        jobs = config.jobs,
        "starting upgrade"
    );

    let report = migrator.run().context("Upgrade aborted")?;

    for (path, error) in report.failures() {
        println!("[FAIL] {} ({}): {}", path.display(), error.stage(), error);
    }

    println!();
    println!(
        "Summary: {} copied, {} migrated ({} rewritten), {} failed",
        report.copied_count(),
        report.migrated_count(),
        report.rewritten_count(),
        report.failure_count()
    );

    if !report.all_succeeded() {
        eprintln!(
            "Upgrade INCOMPLETE: {} file(s) did not migrate.",
            report.failure_count()
        );
        process::exit(1);
    }

    println!("Upgrade complete.");
    Ok(())
}
