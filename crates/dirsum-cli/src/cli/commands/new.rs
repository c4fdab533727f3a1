//! `dirsum new` – hash a directory into a fresh manifest.

use anyhow::Result;
use dirsum_core::manifest::create_manifest;
use std::path::Path;

use crate::cli::{Outcome, RunContext};

pub fn run_new(ctx: &RunContext, source: &Path, output: &Path) -> Result<Outcome> {
    let algorithm = ctx.algorithm_for(output);
    ctx.printer.header(&format!("Hashing: {}", source.display()));

    let mut observer = ctx.observer();
    let report = create_manifest(
        source,
        output,
        &ctx.scan_options(),
        &algorithm,
        &mut observer,
    )?;

    ctx.printer.success(&format!(
        " Wrote: {} ({} {} entries)",
        output.display(),
        report.entries,
        algorithm
    ));
    ctx.printer.blank();
    Ok(Outcome::Clean)
}
