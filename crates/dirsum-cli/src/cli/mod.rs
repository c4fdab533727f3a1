//! CLI for dirsum.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dirsum_core::config::{self, DirsumConfig};
use dirsum_core::scan::ScanOptions;
use dirsum_core::Algorithm;
use std::path::{Path, PathBuf};

use commands::{run_new, run_update, run_verify};
use output::{Printer, TermObserver};

/// Top-level CLI for dirsum.
#[derive(Debug, Parser)]
#[command(name = "dirsum", version)]
#[command(
    about = "Create, update and verify checksum manifests for directory trees",
    long_about = None
)]
pub struct Cli {
    /// Disable colored output.
    #[arg(short = 'c', long = "no-colors", global = true)]
    pub no_colors: bool,

    /// Digest algorithm: md5 or sha256. Defaults to the manifest's extension, then the config file.
    #[arg(short, long, global = true, value_name = "ALGORITHM")]
    pub algorithm: Option<Algorithm>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create a checksum manifest for a directory.
    #[command(visible_alias = "n")]
    New {
        /// Directory to checksum.
        source: PathBuf,
        /// Manifest file to write.
        output: PathBuf,
    },

    /// Add new files to an existing manifest.
    #[command(visible_alias = "u")]
    Update {
        /// Directory to checksum.
        source: PathBuf,
        /// Manifest file to update.
        target: PathBuf,
        /// Also remove entries whose file no longer exists.
        #[arg(short, long)]
        delete: bool,
    },

    /// Verify a manifest, or every manifest found under a directory.
    #[command(visible_alias = "v")]
    Verify {
        /// Manifest to verify; if a directory, search it recursively for manifests.
        path: PathBuf,
        /// Only check that the listed files exist.
        #[arg(short, long)]
        basic: bool,
        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

/// How a command finished when it did not hit a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// Work completed but some entries failed verification.
    Failures,
}

/// Settings shared by all command handlers, resolved once at startup.
pub struct RunContext {
    pub cfg: DirsumConfig,
    pub printer: Printer,
    /// `--algorithm`, if given.
    pub algorithm: Option<Algorithm>,
}

impl RunContext {
    /// Algorithm for a manifest: the flag, then the manifest's extension,
    /// then the configured default.
    pub fn algorithm_for(&self, manifest: &Path) -> Algorithm {
        self.algorithm
            .or_else(|| Algorithm::from_manifest_path(manifest))
            .unwrap_or(self.cfg.algorithm)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            follow_symlinks: self.cfg.follow_symlinks,
        }
    }

    pub fn observer(&self) -> TermObserver<'_> {
        TermObserver::new(&self.printer, self.cfg.progress)
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<Outcome> {
        let cli = Cli::parse();
        let cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!("config unavailable, using defaults: {:#}", err);
                DirsumConfig::default()
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let ctx = RunContext {
            printer: Printer::new(cfg.colors && !cli.no_colors),
            algorithm: cli.algorithm,
            cfg,
        };

        match cli.command {
            CliCommand::New { source, output } => run_new(&ctx, &source, &output),
            CliCommand::Update {
                source,
                target,
                delete,
            } => run_update(&ctx, &source, &target, delete),
            CliCommand::Verify { path, basic, json } => run_verify(&ctx, &path, basic, json),
        }
    }
}

#[cfg(test)]
mod tests;
