//! Lexical path helpers.
//!
//! Manifest paths are compared as absolute, lexically cleaned paths. Nothing
//! here touches the filesystem apart from reading the working directory in
//! [`absolute`], so symlinks are never resolved.

use std::borrow::Cow;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Absolute, cleaned form of `path` (relative paths are joined to the
/// current working directory).
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    Ok(clean(&std::path::absolute(path)?))
}

/// Lexically normalize a path: drop `.` components and fold `name/..`.
/// A `..` directly under the root stays at the root.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Express `path` relative to `base`. Both must be absolute and cleaned.
/// Returns `None` when they do not share a root (e.g. different drives).
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let is_root = |c: &Component<'_>| matches!(c, Component::Prefix(_) | Component::RootDir);
    let path_root: Vec<_> = path_parts.iter().take_while(|c| is_root(c)).collect();
    let base_root: Vec<_> = base_parts.iter().take_while(|c| is_root(c)).collect();
    if path_root.is_empty() || path_root != base_root {
        return None;
    }

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

/// Bytes written into a manifest for `path`. On unix these are the raw
/// file name bytes; elsewhere paths are written as (lossy) UTF-8.
#[cfg(unix)]
pub fn to_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
pub fn to_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// Inverse of [`to_bytes`].
#[cfg(unix)]
pub fn from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub fn from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
