//! Rendering and writing manifests.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::set::manifest_order;
use super::ChecksumSet;
use crate::error::{Error, Result};
use crate::paths;

/// Render `set` as manifest text for a file at `output_path` (absolute).
///
/// Entries are sorted into manifest order and their paths made relative to
/// the manifest's directory; paths that cannot be expressed that way (another
/// root or drive) are written absolute.
pub fn render_manifest(set: &ChecksumSet, output_path: &Path) -> Vec<u8> {
    let base = output_path.parent().unwrap_or_else(|| Path::new(""));
    let mut entries: Vec<_> = set.iter().collect();
    entries.sort_by(|a, b| manifest_order(a, b));

    let mut out = Vec::new();
    for entry in entries {
        let shown: PathBuf =
            paths::relative_to(&entry.path, base).unwrap_or_else(|| entry.path.clone());
        out.extend_from_slice(entry.hash.as_bytes());
        out.extend_from_slice(b" *");
        out.extend_from_slice(&paths::to_bytes(&shown));
        out.push(b'\n');
    }
    out
}

/// Write `set` to `output_path`: render into a temp file beside the target,
/// sync it, then rename over the target.
pub fn write_manifest(set: &ChecksumSet, output_path: &Path) -> Result<()> {
    let output = paths::absolute(output_path).map_err(|source| Error::ResolvePath {
        path: output_path.to_path_buf(),
        source,
    })?;
    let write_err = |source: std::io::Error| Error::WriteManifest {
        path: output_path.to_path_buf(),
        source,
    };

    let dir = output.parent().unwrap_or_else(|| Path::new("."));
    let text = render_manifest(set, &output);

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&text).map_err(write_err)?;
    if let Some(perms) = manifest_permissions(&output) {
        tmp.as_file().set_permissions(perms).map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&output).map_err(|e| write_err(e.error))?;

    tracing::debug!(manifest = %output.display(), entries = set.len(), "wrote manifest");
    Ok(())
}

/// Keep the permissions of a manifest being replaced; new files get 0644.
fn manifest_permissions(target: &Path) -> Option<fs::Permissions> {
    if let Ok(meta) = fs::metadata(target) {
        return Some(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}
