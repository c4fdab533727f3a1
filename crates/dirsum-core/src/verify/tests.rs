//! Tests for verify classification and manifest discovery.

use super::*;
use crate::checksum::Algorithm;
use crate::manifest::create_manifest;
use crate::progress::NoopObserver;
use crate::scan::ScanOptions;
use std::fs;
use std::path::PathBuf;

fn make_manifest(root: &Path, name: &str) -> PathBuf {
    let manifest = root.join(name);
    create_manifest(
        root,
        &manifest,
        &ScanOptions::default(),
        &Algorithm::from_manifest_path(&manifest).unwrap_or_default(),
        &mut NoopObserver,
    )
    .unwrap();
    manifest
}

fn status_of<'a>(report: &'a ManifestReport, name: &str) -> &'a EntryStatus {
    &report
        .entries
        .iter()
        .find(|e| e.path.ends_with(name))
        .unwrap()
        .status
}

#[derive(Default)]
struct Collect {
    manifests: Vec<PathBuf>,
    walk_failures: usize,
}

impl Observer for Collect {
    fn manifest_verified(&mut self, report: &ManifestReport) {
        self.manifests.push(report.manifest.clone());
    }

    fn walk_failed(&mut self, _failure: &WalkFailure) {
        self.walk_failures += 1;
    }
}

#[test]
fn classifies_ok_mismatched_and_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("same.txt"), "same").unwrap();
    fs::write(root.join("edited.txt"), "before").unwrap();
    fs::write(root.join("deleted.txt"), "soon gone").unwrap();
    let manifest = make_manifest(root, "sums.md5");

    fs::write(root.join("edited.txt"), "after").unwrap();
    fs::remove_file(root.join("deleted.txt")).unwrap();

    let report = verify_manifest(
        &manifest,
        VerifyMode::Full,
        &Algorithm::Md5,
        &mut NoopObserver,
    );

    assert!(!report.is_ok());
    assert_eq!(status_of(&report, "same.txt"), &EntryStatus::Ok);
    assert!(matches!(status_of(&report, "edited.txt"), EntryStatus::Mismatched { .. }));
    assert!(matches!(status_of(&report, "deleted.txt"), EntryStatus::Unreadable { .. }));
    assert_eq!(report.failures().count(), 2);
}

#[test]
fn untouched_tree_verifies_clean() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("nested")).unwrap();
    fs::write(root.join("nested").join("n.bin"), [0u8, 1, 2, 3]).unwrap();
    fs::write(root.join("top.txt"), "top").unwrap();
    let manifest = make_manifest(root, "sums.md5");

    let report = verify_path(
        &manifest,
        &VerifyOptions::default(),
        &Algorithm::Md5,
        &mut NoopObserver,
    )
    .unwrap();
    assert!(report.is_clean());
    assert_eq!(report.checked_entries(), 2);
    assert_eq!(report.failed_entries(), 0);
}

#[test]
fn basic_mode_checks_existence_only() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("edited.txt"), "before").unwrap();
    fs::write(root.join("deleted.txt"), "x").unwrap();
    let manifest = make_manifest(root, "sums.md5");

    fs::write(root.join("edited.txt"), "after").unwrap();
    fs::remove_file(root.join("deleted.txt")).unwrap();

    let report = verify_manifest(
        &manifest,
        VerifyMode::Basic,
        &Algorithm::Md5,
        &mut NoopObserver,
    );
    assert_eq!(status_of(&report, "edited.txt"), &EntryStatus::Ok);
    assert!(matches!(status_of(&report, "deleted.txt"), EntryStatus::Unreadable { .. }));
}

#[test]
fn duplicate_entries_are_each_verified() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a.txt"), "x").unwrap();
    let good = Algorithm::Md5
        .hash_file(&root.join("a.txt"), &mut NoopObserver)
        .unwrap();
    let manifest = root.join("dups.md5");
    fs::write(
        &manifest,
        format!("{good} *a.txt\n{} *a.txt\n", "0".repeat(32)),
    )
    .unwrap();

    let report = verify_manifest(
        &manifest,
        VerifyMode::Full,
        &Algorithm::Md5,
        &mut NoopObserver,
    );
    assert_eq!(report.entries.len(), 2);
    assert!(report.entries[0].is_ok());
    assert!(!report.entries[1].is_ok());
}

#[test]
fn directory_mode_finds_manifests_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let a = root.join("a");
    let b = root.join("b");
    fs::create_dir(&a).unwrap();
    fs::create_dir(&b).unwrap();
    fs::write(a.join("f.txt"), "f").unwrap();
    fs::write(b.join("g.txt"), "g").unwrap();
    make_manifest(&a, "a.md5");
    let broken = make_manifest(&b, "b.md5");
    fs::write(b.join("g.txt"), "changed").unwrap();
    // Different algorithm, not picked up by an md5 run.
    make_manifest(&a, "a.sha256");

    let mut observer = Collect::default();
    let report = verify_path(
        root,
        &VerifyOptions::default(),
        &Algorithm::Md5,
        &mut observer,
    )
    .unwrap();

    assert_eq!(report.manifests.len(), 2);
    assert_eq!(observer.manifests.len(), 2);
    assert!(report.manifests[0].is_ok());
    assert!(!report.manifests[1].is_ok());
    assert_eq!(report.manifests[1].manifest, broken);
    assert!(!report.is_clean());
    assert_eq!(report.failed_entries(), 1);
}

#[test]
fn unreadable_manifest_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.md5");
    let report = verify_manifest(
        &missing,
        VerifyMode::Full,
        &Algorithm::Md5,
        &mut NoopObserver,
    );
    assert!(report.error.is_some());
    assert!(!report.is_ok());
}

#[test]
fn missing_path_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = verify_path(
        &dir.path().join("nothing-here"),
        &VerifyOptions::default(),
        &Algorithm::Md5,
        &mut NoopObserver,
    )
    .unwrap_err();
    assert!(matches!(err, Error::ReadManifest { .. }));
}

#[test]
fn report_serializes_status_tags() {
    let entry = EntryReport {
        path: PathBuf::from("/data/x.bin"),
        expected: "0".repeat(32),
        status: EntryStatus::Mismatched {
            actual: "1".repeat(32),
        },
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["status"], "mismatched");
    assert_eq!(json["actual"], "1".repeat(32));
    assert_eq!(json["path"], "/data/x.bin");
}

#[test]
fn manifest_in_another_algorithm_is_not_clean() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a.txt"), "x").unwrap();
    let manifest = make_manifest(root, "sums.md5");

    let report = verify_manifest(
        &manifest,
        VerifyMode::Full,
        &Algorithm::Sha256,
        &mut NoopObserver,
    );
    assert!(report.entries.is_empty());
    assert!(report.error.as_deref().is_some_and(|e| e.contains("md5")));
    assert!(!report.is_ok());
}

#[cfg(unix)]
#[test]
fn walk_errors_are_reported_and_the_walk_continues() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let a = root.join("a");
    let b = root.join("b");
    fs::create_dir(&a).unwrap();
    fs::create_dir(&b).unwrap();
    fs::write(a.join("f.txt"), "f").unwrap();
    fs::write(b.join("g.txt"), "g").unwrap();
    make_manifest(&a, "a.md5");
    make_manifest(&b, "b.md5");
    // Sorts between a/ and b/; following it fails.
    std::os::unix::fs::symlink(root.join("gone"), root.join("ab-dangling")).unwrap();

    let options = VerifyOptions {
        follow_symlinks: true,
        ..VerifyOptions::default()
    };
    let mut observer = Collect::default();
    let report = verify_path(root, &options, &Algorithm::Md5, &mut observer).unwrap();

    assert_eq!(report.walk_failures.len(), 1);
    assert_eq!(observer.walk_failures, 1);
    assert!(report.walk_failures[0]
        .path
        .as_deref()
        .is_some_and(|p| p.ends_with("ab-dangling")));
    assert_eq!(report.manifests.len(), 2);
    assert!(report.manifests.iter().all(ManifestReport::is_ok));
    assert!(!report.is_clean());
}
