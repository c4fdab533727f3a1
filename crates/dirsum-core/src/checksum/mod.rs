//! Streaming file digests.
//!
//! Files are read in fixed-size chunks so memory use does not depend on file
//! size. The handle is dropped before returning, on success or failure.

mod algorithm;

pub use algorithm::Algorithm;

use md5::Md5;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::progress::{HashProgress, Observer};

const BUF_SIZE: usize = 64 * 1024;

/// Computes the digest of one file. Implemented by [`Algorithm`]; operations
/// take `&dyn Hasher` so callers can substitute their own.
pub trait Hasher {
    fn algorithm(&self) -> Algorithm;

    fn hash_file(&self, path: &Path, observer: &mut dyn Observer) -> io::Result<String>;
}

impl Hasher for Algorithm {
    fn algorithm(&self) -> Algorithm {
        *self
    }

    fn hash_file(&self, path: &Path, observer: &mut dyn Observer) -> io::Result<String> {
        hash_path(path, *self, observer)
    }
}

/// Hash the file at `path` and return the digest as lowercase hex.
pub fn hash_path(
    path: &Path,
    algorithm: Algorithm,
    observer: &mut dyn Observer,
) -> io::Result<String> {
    observer.file_started(path);
    let result = open_and_digest(path, algorithm, observer);
    observer.file_finished(path, result.as_deref());
    result
}

fn open_and_digest(
    path: &Path,
    algorithm: Algorithm,
    observer: &mut dyn Observer,
) -> io::Result<String> {
    let file = File::open(path)?;
    let total_bytes = file.metadata()?.len();
    match algorithm {
        Algorithm::Md5 => digest_reader::<Md5>(file, path, total_bytes, observer),
        Algorithm::Sha256 => digest_reader::<Sha256>(file, path, total_bytes, observer),
    }
}

fn digest_reader<D: Digest>(
    mut reader: impl Read,
    path: &Path,
    total_bytes: u64,
    observer: &mut dyn Observer,
) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buf = [0u8; BUF_SIZE];
    let mut bytes_done = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        bytes_done += n as u64;
        observer.bytes_hashed(
            path,
            HashProgress {
                bytes_done,
                total_bytes,
            },
        );
    }
    Ok(hex::encode(hasher.finalize()))
}
