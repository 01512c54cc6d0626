//! Integration tests for scanning, through the library and the binary

use assert_cmd::Command;
use disk_reclaim::scanner::{Category, ScanConfig, ScanType, Scanner, SizeCache};
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const MB: u64 = 1024 * 1024;

fn disk_reclaim() -> Command {
    Command::cargo_bin("disk-reclaim").unwrap()
}

/// Sparse file with the given apparent size
fn sized_file(path: &Path, size: u64) {
    File::create(path).unwrap().set_len(size).unwrap();
}

/// root/
///   a.mp4 (50 MB)
///   sub/ b.txt (10 MB)
///        ignored_dir/ c.bin (999 MB)
fn create_scenario() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("sub/ignored_dir")).unwrap();
    sized_file(&root.join("a.mp4"), 50 * MB);
    sized_file(&root.join("sub/b.txt"), 10 * MB);
    sized_file(&root.join("sub/ignored_dir/c.bin"), 999 * MB);
    dir
}

fn scanner() -> Scanner {
    Scanner::new(Arc::new(SizeCache::new()))
}

#[test]
fn test_ignored_subtree_is_never_counted() {
    let dir = create_scenario();
    let root = dir.path().canonicalize().unwrap();
    let config = ScanConfig::new(&root, 2).unwrap().with_ignore(["ignored_dir"]);

    let result = scanner().scan(&config).unwrap();

    assert_eq!(result.files.len(), 2);
    assert_eq!(result.files[0].path, root.join("a.mp4"));
    assert_eq!(result.files[0].size, 50 * MB);
    assert_eq!(result.files[0].category, Category::Media);
    assert_eq!(result.files[0].depth, 0);
    assert_eq!(result.files[1].path, root.join("sub/b.txt"));
    assert_eq!(result.files[1].size, 10 * MB);
    assert_eq!(result.files[1].category, Category::Document);
    assert_eq!(result.files[1].depth, 1);

    let folders: Vec<_> = result
        .folders
        .iter()
        .map(|f| (f.path.clone(), f.size))
        .collect();
    assert_eq!(
        folders,
        vec![(root.clone(), 60 * MB), (root.join("sub"), 10 * MB)]
    );
    assert_eq!(result.root_size, 60 * MB);
}

#[test]
fn test_without_ignore_everything_is_counted() {
    let dir = create_scenario();
    let config = ScanConfig::new(dir.path(), 2).unwrap();

    let result = scanner().scan(&config).unwrap();

    assert_eq!(result.root_size, 1059 * MB);
    // c.bin is "other": counted in sizes but not listed
    assert_eq!(result.files.len(), 2);
    assert_eq!(result.folders[0].size, 1059 * MB);
    assert_eq!(result.folders[1].size, 1009 * MB);
}

#[test]
fn test_max_depth_zero_with_only_subdirectories() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("one")).unwrap();
    fs::create_dir_all(dir.path().join("two/inner")).unwrap();
    sized_file(&dir.path().join("one/movie.mkv"), 5 * MB);
    sized_file(&dir.path().join("two/inner/doc.pdf"), 5 * MB);

    let result = scanner().scan(&ScanConfig::new(dir.path(), 0).unwrap()).unwrap();

    assert!(result.files.is_empty());
    // root, one, two
    assert_eq!(result.folders.len(), 3);
    assert!(result.folders.iter().all(|f| f.size == 0));
    assert_eq!(result.folders_above(0).count(), 0);
}

#[test]
fn test_max_depth_zero_keeps_root_files() {
    let dir = create_scenario();
    let result = scanner().scan(&ScanConfig::new(dir.path(), 0).unwrap()).unwrap();

    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].category, Category::Media);
}

#[test]
fn test_rescan_of_unchanged_tree_is_identical() {
    let dir = create_scenario();
    let config = ScanConfig::new(dir.path(), 3)
        .unwrap()
        .with_ignore(["ignored_dir"])
        .with_threads(4);
    let scanner = scanner();

    let first = scanner.scan(&config).unwrap();
    let stats = scanner.cache().stats();
    let second = scanner.scan(&config).unwrap();

    assert_eq!(first.files, second.files);
    assert_eq!(first.folders, second.folders);
    assert_eq!(first.root_size, second.root_size);
    assert_eq!(scanner.cache().stats().misses, stats.misses);
}

#[test]
fn test_modified_file_is_recomputed() {
    let dir = create_scenario();
    let config = ScanConfig::new(dir.path(), 2).unwrap();
    let scanner = scanner();
    let movie = dir.path().join("a.mp4");

    let first = scanner.scan(&config).unwrap();
    assert_eq!(first.files[0].size, 50 * MB);

    let file = File::options().write(true).open(&movie).unwrap();
    file.set_len(70 * MB).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let second = scanner.scan(&config).unwrap();
    let movie_entry = second
        .files
        .iter()
        .find(|f| f.path.ends_with("a.mp4"))
        .unwrap();
    assert_eq!(movie_entry.size, 70 * MB);
}

#[test]
fn test_specific_scan_type_excludes_other_categories() {
    let dir = create_scenario();
    let config = ScanConfig::new(dir.path(), 2)
        .unwrap()
        .with_scan_type(ScanType::Only(Category::Document));

    let result = scanner().scan(&config).unwrap();

    assert_eq!(result.files.len(), 1);
    assert!(result.files[0].path.ends_with("b.txt"));
}

#[test]
fn test_tar_gz_reported_as_archive() {
    let dir = TempDir::new().unwrap();
    File::create(dir.path().join("archive.tar.gz"))
        .unwrap()
        .write_all(b"gz")
        .unwrap();

    let result = scanner().scan(&ScanConfig::new(dir.path(), 1).unwrap()).unwrap();
    assert_eq!(result.files[0].category, Category::Archive);
}

#[test]
fn test_scan_cli_basic() {
    let dir = create_scenario();

    disk_reclaim()
        .args(["scan", "-i", "ignored_dir", "-t", "5"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Large files:"))
        .stdout(predicate::str::contains("a.mp4 (media)"))
        .stdout(predicate::str::contains("b.txt (document)"))
        .stdout(predicate::str::contains("c.bin").not());
}

#[test]
fn test_scan_cli_threshold_filters() {
    let dir = create_scenario();

    disk_reclaim()
        .args(["scan", "-t", "20"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.mp4"))
        .stdout(predicate::str::contains("b.txt").not());
}

#[test]
fn test_scan_cli_json_output() {
    let dir = create_scenario();

    let output = disk_reclaim()
        .args(["scan", "--json", "-i", "ignored_dir"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["files"].is_array());
    assert!(json["folders"].is_array());
    assert_eq!(json["files"][0]["category"], "media");
    assert_eq!(json["root_size"], 60 * MB);
    assert_eq!(json["folders"][0]["size"], 60 * MB);
    assert_eq!(json["folders"][1]["size"], 10 * MB);
    assert_eq!(json["interrupted"], false);
}

#[test]
fn test_scan_cli_nonexistent_path_is_empty() {
    disk_reclaim()
        .args(["-q", "scan", "/nonexistent/path/12345"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"));
}

#[test]
fn test_scan_cli_negative_depth_fails() {
    let dir = TempDir::new().unwrap();

    disk_reclaim()
        .args(["scan", "-d", "-1"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("max depth"));
}

#[test]
fn test_scan_cli_shows_summary() {
    let dir = create_scenario();

    disk_reclaim()
        .arg("scan")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:"))
        .stdout(predicate::str::contains("files and"));
}

#[test]
fn test_scan_cli_with_verbose_flag() {
    let dir = TempDir::new().unwrap();

    disk_reclaim()
        .arg("-v")
        .arg("scan")
        .arg(dir.path())
        .assert()
        .success();
}
