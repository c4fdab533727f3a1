//! Verify outcomes. These are classifications, not errors: a run collects
//! them all and the caller decides the exit status.

use serde::Serialize;
use std::path::PathBuf;

use crate::checksum::Algorithm;

/// Outcome for one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Ok,
    /// Read fine, digest differs from the recorded one.
    Mismatched { actual: String },
    /// Could not be opened or read; carries the I/O error text.
    Unreadable { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub path: PathBuf,
    pub expected: String,
    #[serde(flatten)]
    pub status: EntryStatus,
}

impl EntryReport {
    pub fn is_ok(&self) -> bool {
        self.status == EntryStatus::Ok
    }
}

/// All entries of one manifest, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestReport {
    pub manifest: PathBuf,
    pub algorithm: Algorithm,
    pub entries: Vec<EntryReport>,
    /// Set when the manifest itself could not be read; `entries` is empty then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ManifestReport {
    /// OK only when the manifest was read and every entry is OK.
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.entries.iter().all(EntryReport::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| !e.is_ok())
    }
}

/// A directory-walk error that was reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkFailure {
    pub path: Option<PathBuf>,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub manifests: Vec<ManifestReport>,
    pub walk_failures: Vec<WalkFailure>,
}

impl VerifyReport {
    /// True when every manifest is OK and the walk had no errors.
    pub fn is_clean(&self) -> bool {
        self.walk_failures.is_empty() && self.manifests.iter().all(ManifestReport::is_ok)
    }

    pub fn failed_entries(&self) -> usize {
        self.manifests.iter().map(|m| m.failures().count()).sum()
    }

    pub fn checked_entries(&self) -> usize {
        self.manifests.iter().map(|m| m.entries.len()).sum()
    }
}
