//! Sequence and keyed views of manifest entries.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::ChecksumEntry;

/// Entries in manifest order. Duplicate paths are kept as they appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumSet {
    entries: Vec<ChecksumEntry>,
}

impl ChecksumSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ChecksumEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChecksumEntry> {
        self.entries.iter()
    }

    /// Sort into manifest order: lowercased directory, then lowercased path.
    /// Exact path and hash break remaining ties so any input order renders
    /// the same bytes.
    pub fn sort(&mut self) {
        self.entries.sort_by(manifest_order);
    }

    /// Keyed view; for duplicate paths the last entry wins.
    pub fn into_index(self) -> ChecksumIndex {
        let mut index = ChecksumIndex::default();
        for entry in self.entries {
            index.insert(entry);
        }
        index
    }
}

impl FromIterator<ChecksumEntry> for ChecksumSet {
    fn from_iter<I: IntoIterator<Item = ChecksumEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChecksumSet {
    type Item = ChecksumEntry;
    type IntoIter = std::vec::IntoIter<ChecksumEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChecksumSet {
    type Item = &'a ChecksumEntry;
    type IntoIter = std::slice::Iter<'a, ChecksumEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn sort_key(path: &Path) -> (String, String) {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    (
        dir.to_string_lossy().to_lowercase(),
        path.to_string_lossy().to_lowercase(),
    )
}

pub(crate) fn manifest_order(a: &ChecksumEntry, b: &ChecksumEntry) -> Ordering {
    sort_key(&a.path)
        .cmp(&sort_key(&b.path))
        .then_with(|| a.path.cmp(&b.path))
        .then_with(|| a.hash.cmp(&b.hash))
}

/// One hash per path, used while reconciling. Iteration order carries no
/// meaning; convert back with [`ChecksumIndex::into_set`] before writing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumIndex {
    by_path: HashMap<PathBuf, String>,
}

impl ChecksumIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the hash for `entry.path`.
    pub fn insert(&mut self, entry: ChecksumEntry) -> Option<String> {
        self.by_path.insert(entry.path, entry.hash)
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.by_path.keys().map(PathBuf::as_path)
    }

    /// Remove every entry whose path fails `keep`; returns the removed paths.
    pub fn retain_paths(&mut self, mut keep: impl FnMut(&Path) -> bool) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        self.by_path.retain(|path, _| {
            if keep(path) {
                true
            } else {
                removed.push(path.clone());
                false
            }
        });
        removed.sort();
        removed
    }

    /// Back to a sequence, already in manifest order.
    pub fn into_set(self) -> ChecksumSet {
        let mut set: ChecksumSet = self
            .by_path
            .into_iter()
            .map(|(path, hash)| ChecksumEntry { hash, path })
            .collect();
        set.sort();
        set
    }
}
