//! Checksum manifests for directory trees.
//!
//! `new` writes a manifest of per-file digests, `update` folds newly added
//! (and optionally removed) files into an existing manifest, and `verify`
//! re-hashes files against one or more manifests.

pub mod checksum;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod paths;
pub mod progress;
pub mod reconcile;
pub mod scan;
pub mod verify;

pub use checksum::{Algorithm, Hasher};
pub use error::{Error, Result};
