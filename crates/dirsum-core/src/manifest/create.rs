//! `new`: scan a directory and write a fresh manifest.

use std::path::{Path, PathBuf};

use super::{write_manifest, ChecksumEntry, ChecksumSet};
use crate::checksum::Hasher;
use crate::error::{Error, Result};
use crate::paths;
use crate::progress::Observer;
use crate::scan::{scan_files, ScanOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReport {
    /// Absolute path of the manifest written.
    pub output: PathBuf,
    pub entries: usize,
}

/// Hash every file under `source` (except `output` itself) and write the
/// manifest. The first scan or hash error aborts before anything is written.
pub fn create_manifest(
    source: &Path,
    output: &Path,
    scan: &ScanOptions,
    hasher: &dyn Hasher,
    observer: &mut dyn Observer,
) -> Result<CreateReport> {
    let output_abs = paths::absolute(output).map_err(|source| Error::ResolvePath {
        path: output.to_path_buf(),
        source,
    })?;
    let files = scan_files(source, Some(output_abs.as_path()), scan)?;
    tracing::info!(
        source = %source.display(),
        files = files.len(),
        algorithm = %hasher.algorithm(),
        "creating manifest"
    );

    let mut set = ChecksumSet::new();
    for path in files {
        let hash = hasher
            .hash_file(&path, observer)
            .map_err(|source| Error::Hash {
                path: path.clone(),
                source,
            })?;
        set.push(ChecksumEntry { hash, path });
    }

    write_manifest(&set, &output_abs)?;
    Ok(CreateReport {
        output: output_abs,
        entries: set.len(),
    })
}
