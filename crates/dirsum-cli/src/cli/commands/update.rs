//! `dirsum update` – add new files to a manifest, optionally prune missing ones.

use anyhow::Result;
use dirsum_core::reconcile::{update_manifest, UpdateOptions};
use std::path::Path;

use crate::cli::{Outcome, RunContext};

pub fn run_update(
    ctx: &RunContext,
    source: &Path,
    target: &Path,
    delete: bool,
) -> Result<Outcome> {
    let algorithm = ctx.algorithm_for(target);
    ctx.printer.header(&format!("Updating: {}", target.display()));

    let options = UpdateOptions {
        delete_missing: delete,
        scan: ctx.scan_options(),
    };
    let mut observer = ctx.observer();
    let outcome = update_manifest(source, target, &options, &algorithm, &mut observer)?;

    for path in &outcome.removed {
        tracing::info!(path = %path.display(), "removed from manifest");
    }
    ctx.printer.success(&format!(
        " Updated: {} (+{} added, -{} removed, {} kept)",
        target.display(),
        outcome.added.len(),
        outcome.removed.len(),
        outcome.kept
    ));
    ctx.printer.blank();
    Ok(Outcome::Clean)
}
