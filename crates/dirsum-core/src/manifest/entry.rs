use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// One manifest line: a lowercase hex digest and the file it covers.
///
/// `path` is absolute and cleaned in memory; it is only made relative again
/// when rendered into a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChecksumEntry {
    pub hash: String,
    pub path: PathBuf,
}

impl ChecksumEntry {
    pub fn new(hash: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            hash: hash.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ChecksumEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} *{}", self.hash, self.path.display())
    }
}
