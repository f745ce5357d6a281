use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::tempdir;
use waddup::duplicates::{Finder, FinderConfig, Report, ReportEntry};
use waddup::scanner::extension_filter;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn sha256_hex(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

fn scan(root: &Path, config: FinderConfig) -> Report {
    Finder::new(root, None, config).unwrap().find_duplicates()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let report = scan(dir.path(), FinderConfig::default());

    assert_eq!(
        report.lines(),
        vec![format!("No files found in {}", dir.path().display())]
    );
    assert_eq!(report.summary().total_files, 0);
    assert_eq!(report.summary().duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.wad"), b"1");
    write(&dir.path().join("b.wad"), b"22");
    write(&dir.path().join("c.wad"), b"333");

    let report = scan(dir.path(), FinderConfig::default());

    assert!(report.is_empty());
    assert_eq!(report.summary().total_files, 3);
    assert_eq!(report.summary().files_to_hash, 0);
    assert_eq!(report.summary().hashed_files, 0);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.wad"), b"duplicate");
    write(&dir.path().join("b.wad"), b"duplicate");
    write(&dir.path().join("c.wad"), b"unique");

    let report = scan(dir.path(), FinderConfig::default());
    let groups: Vec<_> = report.groups().collect();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].digest, sha256_hex(b"duplicate"));
    assert_eq!(groups[0].size, 9);
    assert_eq!(groups[0].files.len(), 2);

    let summary = report.summary();
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 9);
}

#[test]
fn test_report_lines_format() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.wad");
    let b = dir.path().join("b.wad");
    write(&a, b"same");
    write(&b, b"same");

    let report = scan(dir.path(), FinderConfig::default());

    assert_eq!(
        report.lines(),
        vec![
            format!("Found duplicate files with hash {}:", sha256_hex(b"same")),
            format!("  {} (4 bytes)", a.display()),
            format!("  {} (4 bytes)", b.display()),
        ]
    );
}

#[test]
fn test_same_size_different_content_not_grouped() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.wad"), b"aaaa");
    write(&dir.path().join("b.wad"), b"bbbb");

    let report = scan(dir.path(), FinderConfig::default());

    assert!(report.is_empty());
    assert_eq!(report.summary().files_to_hash, 2);
    assert_eq!(report.summary().hashed_files, 2);
}

#[test]
fn test_groups_ordered_by_digest() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("a1", b"first".as_slice()),
        ("a2", b"first"),
        ("b1", b"second!"),
        ("b2", b"second!"),
        ("c1", b"third"),
        ("c2", b"third"),
    ] {
        write(&dir.path().join(name), content);
    }

    let report = scan(dir.path(), FinderConfig::default());
    let digests: Vec<_> = report.groups().map(|g| g.digest.clone()).collect();

    let mut sorted = digests.clone();
    sorted.sort();
    assert_eq!(digests.len(), 3);
    assert_eq!(digests, sorted);
}

#[test]
fn test_nested_directories_scanned() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("doom/maps/e1.wad"), b"episode");
    write(&dir.path().join("heretic/e1.wad"), b"episode");
    write(&dir.path().join("top.wad"), b"episode");

    let report = scan(dir.path(), FinderConfig::default());
    let groups: Vec<_> = report.groups().collect();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 3);
    // Children are visited in name order at each level
    assert!(groups[0].files[0].path.ends_with("doom/maps/e1.wad"));
    assert!(groups[0].files[1].path.ends_with("heretic/e1.wad"));
    assert!(groups[0].files[2].path.ends_with("top.wad"));
}

#[test]
fn test_extension_filter_applied() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.wad"), b"content");
    write(&dir.path().join("b.WAD"), b"content");
    write(&dir.path().join("c.txt"), b"content");

    let config = FinderConfig::default().with_filter(extension_filter("wad"));
    let report = scan(dir.path(), config);
    let groups: Vec<_> = report.groups().collect();

    assert_eq!(report.summary().total_files, 2);
    assert_eq!(groups.len(), 1);
    assert!(groups[0]
        .files
        .iter()
        .all(|f| f.path.extension().unwrap().eq_ignore_ascii_case("wad")));
}

#[test]
fn test_only_filtered_out_files_reports_no_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("readme.txt"), b"hello");

    let config = FinderConfig::default().with_filter(extension_filter("wad"));
    let report = scan(dir.path(), config);

    assert!(matches!(report.entries(), [ReportEntry::NoFiles { .. }]));
}

#[test]
fn test_parallel_hashing_matches_sequential() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        let content = format!("content-{}", i % 5);
        write(&dir.path().join(format!("{:02}.wad", i)), content.as_bytes());
    }

    let sequential = scan(dir.path(), FinderConfig::default());
    let parallel = scan(dir.path(), FinderConfig::default().with_io_threads(4));

    assert_eq!(sequential.lines(), parallel.lines());
    assert_eq!(sequential.summary().duplicate_groups, 5);
}

#[test]
fn test_report_serializes_to_json() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.wad"), b"x");
    write(&dir.path().join("b.wad"), b"x");

    let report = scan(dir.path(), FinderConfig::default());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["entries"][0]["kind"], "group");
    assert_eq!(json["entries"][0]["digest"], sha256_hex(b"x"));
    assert_eq!(json["summary"]["duplicate_groups"], 1);
}
