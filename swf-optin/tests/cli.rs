//! CLI integration tests for swf-optin
//!
//! These run the built binary against synthetic SWF files in a temporary
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// FileAttributes then End, behind a 5 byte frame header
fn minimal_swf(signature: &[u8; 3]) -> Vec<u8> {
    let mut data = signature.to_vec();
    data.push(10);
    data.extend(&21u32.to_le_bytes());
    data.extend([0x78, 0x00, 0x05, 0x5F, 0x00]);
    data.extend([0x44, 0x11, 0x08, 0x00, 0x00, 0x00]);
    data.extend([0x00, 0x00]);
    data
}

fn swf_optin() -> Command {
    Command::cargo_bin("swf-optin").unwrap()
}

fn write_fixture(dir: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

fn contains_enable_telemetry(path: &Path) -> bool {
    let data = fs::read(path).unwrap();
    data.windows(2).any(|w| w == [0x42, 0x17] || w == [0x62, 0x17])
}

#[test]
fn test_no_arguments_prints_usage() {
    swf_optin()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_file_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    swf_optin()
        .arg(dir.path().join("absent.swf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("File not found"));
}

#[test]
fn test_patch_in_place_with_password() {
    let dir = TempDir::new().unwrap();
    let input = minimal_swf(b"FWS");
    let path = write_fixture(&dir, "movie.swf", &input);

    swf_optin()
        .arg(&path)
        .arg("hunter2")
        .assert()
        .success()
        .stdout(predicate::str::contains("with password protection"));

    let patched = fs::read(&path).unwrap();
    assert_eq!(patched.len(), input.len() + 2 + 34);
    assert!(contains_enable_telemetry(&path));
}

#[test]
fn test_patch_without_password() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "movie.swf", &minimal_swf(b"FWS"));

    swf_optin()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("with no password"));
}

#[test]
fn test_empty_password_means_no_password() {
    let dir = TempDir::new().unwrap();
    let input = minimal_swf(b"FWS");
    let path = write_fixture(&dir, "movie.swf", &input);

    swf_optin()
        .arg(&path)
        .arg("")
        .assert()
        .success()
        .stdout(predicate::str::contains("with no password"));

    assert_eq!(fs::read(&path).unwrap().len(), input.len() + 4);
}

#[test]
fn test_dry_run_without_anchor() {
    let dir = TempDir::new().unwrap();
    // ShowFrame, End
    let mut input = b"FWS\x0A".to_vec();
    input.extend(&17u32.to_le_bytes());
    input.extend([0x78, 0x00, 0x05, 0x5F, 0x00, 0x40, 0x00, 0x00, 0x00]);
    let path = write_fixture(&dir, "movie.swf", &input);

    swf_optin()
        .arg(&path)
        .args(["--dry-run", "--allow-missing-anchor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing written"))
        .stdout(predicate::str::contains("file written").not());
    assert_eq!(fs::read(&path).unwrap(), input);
}

#[test]
fn test_second_run_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "movie.swf", &minimal_swf(b"FWS"));

    swf_optin().arg(&path).assert().success();
    let once = fs::read(&path).unwrap();

    swf_optin()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already"));
    assert_eq!(fs::read(&path).unwrap(), once);
}

#[test]
fn test_lzma_file_left_unchanged() {
    let dir = TempDir::new().unwrap();
    let input = minimal_swf(b"ZWS");
    let path = write_fixture(&dir, "movie.swf", &input);

    swf_optin()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("LZMA"));
    assert_eq!(fs::read(&path).unwrap(), input);
}

#[test]
fn test_output_and_dry_run() {
    let dir = TempDir::new().unwrap();
    let input = minimal_swf(b"FWS");
    let path = write_fixture(&dir, "movie.swf", &input);
    let out = dir.path().join("patched.swf");

    swf_optin()
        .arg(&path)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));
    assert_eq!(fs::read(&path).unwrap(), input);

    swf_optin()
        .arg(&path)
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success();
    assert_eq!(fs::read(&path).unwrap(), input);
    assert!(contains_enable_telemetry(&out));
}

#[test]
fn test_info_lists_records() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "movie.swf", &minimal_swf(b"FWS"));

    swf_optin()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("FileAttributes"))
        .stdout(predicate::str::contains("Ready for opt-in"));
}
