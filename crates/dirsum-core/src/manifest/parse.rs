//! Reading manifests.

use std::path::Path;

use super::{ChecksumEntry, ChecksumSet};
use crate::checksum::Algorithm;
use crate::error::{Error, Result};
use crate::paths;

/// Lines of a manifest with `\n` or `\r\n` terminators removed.
fn lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes.split_inclusive(|&b| b == b'\n').map(|line| {
        line.strip_suffix(b"\r\n")
            .or_else(|| line.strip_suffix(b"\n"))
            .unwrap_or(line)
    })
}

/// Parse manifest text. Lines that do not match `<hex> *<path>` for the
/// algorithm's digest length are skipped without comment. Relative paths are
/// resolved against `manifest_dir`, which should be absolute.
pub fn parse_manifest(
    text: impl AsRef<[u8]>,
    manifest_dir: &Path,
    algorithm: Algorithm,
) -> ChecksumSet {
    let pattern = algorithm.line_pattern();

    lines(text.as_ref())
        .filter_map(|line| pattern.captures(line))
        .map(|caps| {
            let recorded = paths::from_bytes(&caps[2]);
            let path = if recorded.is_absolute() {
                paths::clean(&recorded)
            } else {
                paths::clean(&manifest_dir.join(&recorded))
            };
            ChecksumEntry {
                hash: String::from_utf8_lossy(&caps[1]).to_ascii_lowercase(),
                path,
            }
        })
        .collect()
}

/// The algorithm of the first line that looks like a manifest entry, if any.
pub fn detect_algorithm(text: impl AsRef<[u8]>) -> Option<Algorithm> {
    lines(text.as_ref()).find_map(|line| {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.line_pattern().is_match(line))
    })
}

/// Read and parse the manifest at `path`.
///
/// A manifest with no entries for `algorithm` but lines in another
/// algorithm's format is an [`Error::AlgorithmMismatch`], so that callers
/// never mistake it for an empty manifest.
pub fn read_manifest(path: &Path, algorithm: Algorithm) -> Result<ChecksumSet> {
    let abs = paths::absolute(path).map_err(|source| Error::ResolvePath {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes = std::fs::read(&abs).map_err(|source| Error::ReadManifest {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = abs.parent().unwrap_or_else(|| Path::new(""));
    let set = parse_manifest(&bytes, dir, algorithm);

    if set.is_empty() {
        if let Some(found) = detect_algorithm(&bytes).filter(|found| *found != algorithm) {
            return Err(Error::AlgorithmMismatch {
                path: path.to_path_buf(),
                expected: algorithm,
                found,
            });
        }
    }

    tracing::debug!(
        manifest = %abs.display(),
        entries = set.len(),
        "parsed manifest"
    );
    Ok(set)
}
