//! Directory scanning for `new` and `update`.
//!
//! Any walk error aborts the scan: a manifest built from a partial listing
//! would silently drop files.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::paths;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Descend into symlinked directories and hash symlink targets.
    pub follow_symlinks: bool,
}

/// List every non-directory entry under `source` as an absolute, cleaned
/// path, in file-name order. `exclude` (typically the manifest being
/// written) is skipped when it matches exactly after both are made absolute.
pub fn scan_files(
    source: &Path,
    exclude: Option<&Path>,
    options: &ScanOptions,
) -> Result<Vec<PathBuf>> {
    let root = paths::absolute(source).map_err(|source_err| Error::ResolvePath {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    let exclude = exclude
        .map(|p| {
            paths::absolute(p).map_err(|source| Error::ResolvePath {
                path: p.to_path_buf(),
                source,
            })
        })
        .transpose()?;

    let mut files = Vec::new();
    let walker = WalkDir::new(&root)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| Error::Scan {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.clone()),
            source,
        })?;

        if entry.file_type().is_dir() || is_unfollowed_dir_link(&entry) {
            continue;
        }

        let path = entry.into_path();
        if exclude.as_deref() == Some(path.as_path()) {
            tracing::debug!(path = %path.display(), "skipping target manifest");
            continue;
        }
        files.push(path);
    }

    tracing::debug!(root = %root.display(), files = files.len(), "scan complete");
    Ok(files)
}

/// A symlink to a directory seen while not following links.
fn is_unfollowed_dir_link(entry: &walkdir::DirEntry) -> bool {
    entry.path_is_symlink()
        && std::fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_lists_files_recursively_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub").join("c.txt"), "c").unwrap();
        fs::create_dir(root.join("empty")).unwrap();

        let files = scan_files(root, None, &ScanOptions::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(paths::absolute(root).unwrap()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("sub").join("c.txt"),
            ]
        );
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn scan_excludes_manifest_by_exact_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sums.md5"), "").unwrap();
        fs::write(root.join("sub").join("sums.md5"), "").unwrap();

        let manifest = root.join("sums.md5");
        let files = scan_files(root, Some(manifest.as_path()), &ScanOptions::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with(Path::new("sub").join("sums.md5")));
    }

    #[test]
    fn scan_missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_files(&dir.path().join("nope"), None, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Scan { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn scan_skips_directory_symlinks_when_not_following() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("real")).unwrap();
        fs::write(root.join("real").join("f.txt"), "f").unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let files = scan_files(root, None, &ScanOptions::default()).unwrap();
        assert_eq!(files.len(), 1);

        let followed = scan_files(
            root,
            None,
            &ScanOptions {
                follow_symlinks: true,
            },
        )
        .unwrap();
        assert_eq!(followed.len(), 2);
    }
}
