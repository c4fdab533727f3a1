//! `dirsum verify` – check files against one manifest or a tree of manifests.

use anyhow::{Context, Result};
use dirsum_core::verify::{verify_path, VerifyMode, VerifyOptions};
use std::path::Path;

use crate::cli::output::TermObserver;
use crate::cli::{Outcome, RunContext};

pub fn run_verify(ctx: &RunContext, path: &Path, basic: bool, json: bool) -> Result<Outcome> {
    let algorithm = if path.is_dir() {
        ctx.algorithm.unwrap_or(ctx.cfg.algorithm)
    } else {
        ctx.algorithm_for(path)
    };
    let options = VerifyOptions {
        mode: if basic { VerifyMode::Basic } else { VerifyMode::Full },
        follow_symlinks: ctx.cfg.follow_symlinks,
    };

    let report = if json {
        // Keep stdout clean for the JSON document.
        let mut observer = TermObserver::silent(&ctx.printer);
        let report = verify_path(path, &options, &algorithm, &mut observer)?;
        let doc = serde_json::to_string_pretty(&report).context("serialize verify report")?;
        println!("{doc}");
        report
    } else {
        ctx.printer.header(&format!("Verifying: {}", path.display()));
        let mut observer = ctx.observer().reporting_manifests();
        let report = verify_path(path, &options, &algorithm, &mut observer)?;
        if report.manifests.is_empty() {
            ctx.printer
                .line(&format!(" No .{} manifests found", algorithm.extension()));
        }
        ctx.printer.blank();
        report
    };

    if report.is_clean() {
        Ok(Outcome::Clean)
    } else {
        Ok(Outcome::Failures)
    }
}
