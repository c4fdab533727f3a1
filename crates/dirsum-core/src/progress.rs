//! Progress hooks for a presentation layer.
//!
//! The core never prints. Operations report what they are doing through an
//! [`Observer`]; every method has a no-op default so callers implement only
//! what they render.

use std::io;
use std::path::Path;

use crate::verify::{ManifestReport, WalkFailure};

/// Bytes hashed so far for the file currently being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashProgress {
    pub bytes_done: u64,
    pub total_bytes: u64,
}

impl HashProgress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}

pub trait Observer {
    /// A file is about to be opened for hashing.
    fn file_started(&mut self, _path: &Path) {}

    /// Called after every chunk fed to the digest.
    fn bytes_hashed(&mut self, _path: &Path, _progress: HashProgress) {}

    /// The file handle has been closed; carries the digest or the I/O error.
    fn file_finished(&mut self, _path: &Path, _outcome: Result<&str, &io::Error>) {}

    /// One manifest has been fully verified.
    fn manifest_verified(&mut self, _report: &ManifestReport) {}

    /// A directory walk during `verify` hit an error and moved on.
    fn walk_failed(&mut self, _failure: &WalkFailure) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_handles_empty_and_overshoot() {
        let empty = HashProgress {
            bytes_done: 0,
            total_bytes: 0,
        };
        assert_eq!(empty.fraction(), 1.0);

        let half = HashProgress {
            bytes_done: 50,
            total_bytes: 100,
        };
        assert!((half.fraction() - 0.5).abs() < 1e-9);

        // File grew while being read.
        let grown = HashProgress {
            bytes_done: 150,
            total_bytes: 100,
        };
        assert_eq!(grown.fraction(), 1.0);
    }
}
