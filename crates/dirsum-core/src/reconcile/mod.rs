//! `update`: fold a fresh directory scan into an existing manifest.
//!
//! New paths are hashed and added; with `delete_missing`, entries whose file
//! is no longer in the scan are dropped. A path present on both sides keeps
//! its recorded hash even if the file changed since: detecting drift is
//! `verify`'s job, not `update`'s.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::checksum::Hasher;
use crate::error::{Error, Result};
use crate::manifest::{read_manifest, write_manifest, ChecksumEntry, ChecksumIndex};
use crate::paths;
use crate::progress::Observer;
use crate::scan::{scan_files, ScanOptions};

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Also remove entries whose file no longer exists in the source.
    pub delete_missing: bool,
    pub scan: ScanOptions,
}

/// What an update changed. Path lists are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    /// Entries carried over without rehashing.
    pub kept: usize,
}

impl Reconciliation {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Apply the update policy to `target` in place.
///
/// `source_paths` must already be absolute and cleaned (as produced by
/// [`scan_files`]). Hash failures abort with nothing further inserted.
pub fn reconcile(
    target: &mut ChecksumIndex,
    source_paths: &[PathBuf],
    delete_missing: bool,
    hasher: &dyn Hasher,
    observer: &mut dyn Observer,
) -> Result<Reconciliation> {
    let removed = if delete_missing {
        let present: HashSet<&Path> = source_paths.iter().map(PathBuf::as_path).collect();
        target.retain_paths(|path| present.contains(path))
    } else {
        Vec::new()
    };

    let kept = target.len();
    let mut added = Vec::new();
    for path in source_paths {
        if target.contains(path) {
            continue;
        }
        let hash = hasher
            .hash_file(path, observer)
            .map_err(|source| Error::Hash {
                path: path.clone(),
                source,
            })?;
        target.insert(ChecksumEntry::new(hash, path.clone()));
        added.push(path.clone());
    }
    added.sort();
    added.dedup();

    Ok(Reconciliation {
        added,
        removed,
        kept,
    })
}

/// Scan `source`, reconcile it into the manifest at `target` and rewrite the
/// manifest. Scan, read, hash and write errors are all fatal.
pub fn update_manifest(
    source: &Path,
    target: &Path,
    options: &UpdateOptions,
    hasher: &dyn Hasher,
    observer: &mut dyn Observer,
) -> Result<Reconciliation> {
    let target_abs = paths::absolute(target).map_err(|source| Error::ResolvePath {
        path: target.to_path_buf(),
        source,
    })?;
    let source_paths = scan_files(source, Some(target_abs.as_path()), &options.scan)?;
    let mut index = read_manifest(&target_abs, hasher.algorithm())?.into_index();

    let outcome = reconcile(
        &mut index,
        &source_paths,
        options.delete_missing,
        hasher,
        observer,
    )?;
    tracing::info!(
        target = %target_abs.display(),
        added = outcome.added.len(),
        removed = outcome.removed.len(),
        kept = outcome.kept,
        "reconciled manifest"
    );

    write_manifest(&index.into_set(), &target_abs)?;
    Ok(outcome)
}
