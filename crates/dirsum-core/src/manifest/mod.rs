//! Checksum manifests: the in-memory entry collections and the text format.
//!
//! A manifest holds one `<hex digest> *<path>` line per file. Paths are
//! relative to the manifest's own directory when possible, absolute
//! otherwise. Lines that do not match are ignored on read, so comments and
//! blank lines survive a hand-edited file (until the next rewrite).
//!
//! Paths are read and written as raw bytes on unix.

mod create;
mod entry;
mod parse;
mod set;
mod write;

pub use create::{create_manifest, CreateReport};
pub use entry::ChecksumEntry;
pub use parse::{detect_algorithm, parse_manifest, read_manifest};
pub use set::{ChecksumIndex, ChecksumSet};
pub use write::{render_manifest, write_manifest};
