//! Error type for fatal manifest operations.
//!
//! Per-entry verify failures are not errors; they are classified in
//! [`crate::verify::EntryStatus`] instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::checksum::Algorithm;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read manifest {}", .path.display())]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write manifest {}", .path.display())]
    WriteManifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to scan {}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to hash {}", .path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve path {}", .path.display())]
    ResolvePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest {} holds {found} digests, not {expected}", .path.display())]
    AlgorithmMismatch {
        path: PathBuf,
        expected: Algorithm,
        found: Algorithm,
    },

    #[error("unknown checksum algorithm: {0} (expected md5 or sha256)")]
    UnknownAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, Error>;
