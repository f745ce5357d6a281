use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run(bin: &str, args: &[&Path]) -> Output {
    let config = tempdir().unwrap();
    Command::new(bin)
        .args(args)
        .env("WADDUP_CONFIG", config.path().join("missing.toml"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn dedupe(args: &[&Path]) -> Output {
    run(env!("CARGO_BIN_EXE_duplicate-finder"), args)
}

fn scan(args: &[&Path]) -> Output {
    run(env!("CARGO_BIN_EXE_waddup"), args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_dedupe_without_arguments_is_usage_error() {
    let output = dedupe(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_dedupe_with_one_argument_is_usage_error() {
    let src = tempdir().unwrap();
    let output = dedupe(&[src.path()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_dedupe_help_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_duplicate-finder"))
        .arg("--help")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("DESTINATION"));
}

#[test]
fn test_dedupe_reports_and_copies() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    fs::write(src.path().join("a.wad"), b"XXXX").unwrap();
    fs::write(src.path().join("b.wad"), b"XXXX").unwrap();
    fs::write(src.path().join("c.wad"), b"YY").unwrap();
    fs::write(src.path().join("notes.txt"), b"XXXX").unwrap();

    let output = dedupe(&[src.path(), dst.path()]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Found duplicate files with hash "));
    assert!(lines[1].ends_with("a.wad (4 bytes)"));
    assert!(lines[2].ends_with("b.wad (4 bytes)"));

    assert!(dst.path().join("000001_c.wad").is_file());
    assert!(dst.path().join("000002_a.wad").is_file());
    assert!(!dst.path().join("000003_notes.txt").exists());
}

#[test]
fn test_dedupe_no_duplicates_message() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    fs::write(src.path().join("a.wad"), b"only").unwrap();

    let output = dedupe(&[src.path(), dst.path()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "No duplicate WAD files found.\n");
    assert!(dst.path().join("000001_a.wad").is_file());
}

#[test]
fn test_dedupe_empty_source() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();

    let output = dedupe(&[src.path(), dst.path()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        format!("No files found in {}\n", src.path().display())
    );
}

#[test]
fn test_dedupe_missing_source_fails() {
    let root = tempdir().unwrap();
    let missing = root.path().join("missing");
    let dst = root.path().join("out");

    let output = dedupe(&[missing.as_path(), dst.as_path()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[WD001] Error:"));
}

#[test]
fn test_scan_considers_every_file() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("a.wad"), b"same").unwrap();
    fs::write(src.path().join("b.txt"), b"same").unwrap();

    let output = scan(&[src.path()]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("a.wad (4 bytes)"));
    assert!(text.contains("b.txt (4 bytes)"));
}

#[test]
fn test_scan_json_output() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("a.wad"), b"same").unwrap();
    fs::write(src.path().join("b.wad"), b"same").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_waddup"))
        .arg(src.path())
        .args(["--output", "json"])
        .env("WADDUP_CONFIG", src.path().join("missing.toml"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(json["duplicates"][0]["size"], 4);
    assert_eq!(json["summary"]["total_files"], 2);
}
