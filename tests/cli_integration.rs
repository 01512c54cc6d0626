use assert_cmd::Command;
use predicates::prelude::*;

fn disk_reclaim() -> Command {
    Command::cargo_bin("disk-reclaim").unwrap()
}

#[test]
fn shows_help() {
    disk_reclaim()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("free it"));
}

#[test]
fn shows_version() {
    disk_reclaim()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn requires_subcommand() {
    disk_reclaim()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn scan_subcommand_help() {
    disk_reclaim()
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("large files and folders"));
}

#[test]
fn scan_long_help_explains_cached_sizes() {
    disk_reclaim()
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modification time"))
        .stdout(predicate::str::contains("stale"));
}

#[test]
fn scan_ignore_flag_keeps_positional_path() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("node_modules")).unwrap();
    std::fs::File::create(dir.path().join("node_modules/big.mp4"))
        .unwrap()
        .set_len(2 * 1024 * 1024)
        .unwrap();
    std::fs::File::create(dir.path().join("kept.mp4"))
        .unwrap()
        .set_len(2 * 1024 * 1024)
        .unwrap();

    disk_reclaim()
        .args(["scan", "-t", "1", "-i", "node_modules"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("kept.mp4"))
        .stdout(predicate::str::contains("big.mp4").not());
}

#[test]
fn scan_ignore_rejects_paths() {
    disk_reclaim()
        .args(["scan", "-i", "a/b", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not paths"));
}

#[test]
fn packages_subcommand_help() {
    disk_reclaim()
        .args(["packages", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installed system packages"));
}

#[test]
fn remove_requires_a_path() {
    disk_reclaim()
        .arg("remove")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PATH"));
}

#[test]
fn verbose_and_quiet_conflict() {
    disk_reclaim()
        .args(["-v", "-q", "scan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn invalid_scan_type_rejected() {
    disk_reclaim()
        .args(["scan", "--scan-type", "video"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scan type"));
}

#[test]
fn generates_completions() {
    disk_reclaim()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disk-reclaim"));
}

#[test]
fn missing_explicit_config_fails() {
    disk_reclaim()
        .args(["--config", "/nonexistent/config.toml", "scan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
