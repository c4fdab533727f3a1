//! `verify`: re-hash the files a manifest lists and classify each entry.
//!
//! Given a directory, every manifest found beneath it (by extension) is
//! verified on its own. Nothing here aborts on a bad file or manifest; the
//! only fatal error is a `path` that does not exist.

mod report;

pub use report::{EntryReport, EntryStatus, ManifestReport, VerifyReport, WalkFailure};

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::checksum::Hasher;
use crate::error::{Error, Result};
use crate::manifest::{read_manifest, ChecksumEntry};
use crate::paths;
use crate::progress::Observer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    /// Re-hash every file and compare digests.
    #[default]
    Full,
    /// Only check that every listed file exists.
    Basic,
}

#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    pub mode: VerifyMode,
    /// Follow symlinked directories while searching for manifests.
    pub follow_symlinks: bool,
}

/// Verify `path`: a single manifest, or every manifest under a directory
/// whose file name ends in `.<extension>` of the hasher's algorithm.
pub fn verify_path(
    path: &Path,
    options: &VerifyOptions,
    hasher: &dyn Hasher,
    observer: &mut dyn Observer,
) -> Result<VerifyReport> {
    let abs = paths::absolute(path).map_err(|source| Error::ResolvePath {
        path: path.to_path_buf(),
        source,
    })?;
    let meta = fs::metadata(&abs).map_err(|source| Error::ReadManifest {
        path: path.to_path_buf(),
        source,
    })?;

    let mut report = VerifyReport::default();
    if meta.is_dir() {
        verify_tree(&abs, options, hasher, observer, &mut report);
    } else {
        let manifest = verify_manifest(&abs, options.mode, hasher, observer);
        observer.manifest_verified(&manifest);
        report.manifests.push(manifest);
    }

    tracing::info!(
        path = %abs.display(),
        manifests = report.manifests.len(),
        entries = report.checked_entries(),
        failed = report.failed_entries(),
        "verify finished"
    );
    Ok(report)
}

fn verify_tree(
    root: &Path,
    options: &VerifyOptions,
    hasher: &dyn Hasher,
    observer: &mut dyn Observer,
    report: &mut VerifyReport,
) {
    let suffix = format!(".{}", hasher.algorithm().extension());
    let walker = WalkDir::new(root)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let failure = WalkFailure {
                    path: err.path().map(Path::to_path_buf),
                    error: err.to_string(),
                };
                tracing::warn!(error = %failure.error, "walk error while searching for manifests");
                observer.walk_failed(&failure);
                report.walk_failures.push(failure);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(&suffix) {
            continue;
        }
        let manifest = verify_manifest(entry.path(), options.mode, hasher, observer);
        observer.manifest_verified(&manifest);
        report.manifests.push(manifest);
    }
}

/// Verify one manifest. A manifest that cannot be read yields a report with
/// `error` set instead of entries.
pub fn verify_manifest(
    manifest: &Path,
    mode: VerifyMode,
    hasher: &dyn Hasher,
    observer: &mut dyn Observer,
) -> ManifestReport {
    let algorithm = hasher.algorithm();
    let set = match read_manifest(manifest, algorithm) {
        Ok(set) => set,
        Err(err) => {
            let error = match &err {
                Error::ReadManifest { source, .. } => source.to_string(),
                other => other.to_string(),
            };
            tracing::warn!(manifest = %manifest.display(), %error, "cannot read manifest");
            return ManifestReport {
                manifest: manifest.to_path_buf(),
                algorithm,
                entries: Vec::new(),
                error: Some(error),
            };
        }
    };

    let entries = set
        .iter()
        .map(|entry| verify_entry(entry, mode, hasher, observer))
        .collect();
    ManifestReport {
        manifest: manifest.to_path_buf(),
        algorithm,
        entries,
        error: None,
    }
}

/// Classify a single entry.
pub fn verify_entry(
    entry: &ChecksumEntry,
    mode: VerifyMode,
    hasher: &dyn Hasher,
    observer: &mut dyn Observer,
) -> EntryReport {
    let status = match mode {
        VerifyMode::Full => match hasher.hash_file(&entry.path, observer) {
            Ok(actual) if actual == entry.hash => EntryStatus::Ok,
            Ok(actual) => EntryStatus::Mismatched { actual },
            Err(err) => EntryStatus::Unreadable {
                error: err.to_string(),
            },
        },
        VerifyMode::Basic => match fs::metadata(&entry.path) {
            Ok(meta) if meta.is_dir() => EntryStatus::Unreadable {
                error: "is a directory".to_string(),
            },
            Ok(_) => EntryStatus::Ok,
            Err(err) => EntryStatus::Unreadable {
                error: err.to_string(),
            },
        },
    };

    match &status {
        EntryStatus::Ok => tracing::debug!(path = %entry.path.display(), "ok"),
        EntryStatus::Mismatched { actual } => tracing::warn!(
            path = %entry.path.display(),
            expected = %entry.hash,
            %actual,
            "checksum mismatch"
        ),
        EntryStatus::Unreadable { error } => {
            tracing::warn!(path = %entry.path.display(), %error, "unreadable")
        }
    }

    EntryReport {
        path: entry.path.clone(),
        expected: entry.hash.clone(),
        status,
    }
}

#[cfg(test)]
mod tests;
