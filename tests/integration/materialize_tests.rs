use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tempfile::tempdir;
use waddup::duplicates::{Finder, FinderConfig, FinderError, ReportEntry};
use waddup::scanner::extension_filter;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn wad_config() -> FinderConfig {
    FinderConfig::default().with_filter(extension_filter("wad"))
}

#[test]
fn test_unique_files_then_group_representatives() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(&src.path().join("a.wad"), b"XXXX");
    write(&src.path().join("b.wad"), b"XXXX");
    write(&src.path().join("c.wad"), b"YY");

    let report = Finder::new(src.path(), Some(dst.path()), wad_config())
        .unwrap()
        .find_duplicates();

    assert_eq!(names_in(dst.path()), vec!["000001_c.wad", "000002_a.wad"]);
    assert_eq!(fs::read(dst.path().join("000001_c.wad")).unwrap(), b"YY");
    assert_eq!(fs::read(dst.path().join("000002_a.wad")).unwrap(), b"XXXX");

    let copies = report.copies();
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0].sequence, 1);
    assert_eq!(copies[1].sequence, 2);
    assert_eq!(copies[1].source, src.path().join("a.wad"));
    assert_eq!(report.groups().count(), 1);
}

#[test]
fn test_unique_files_copied_in_size_order() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(&src.path().join("big.wad"), b"0123456789");
    write(&src.path().join("small.wad"), b"0");
    write(&src.path().join("medium.wad"), b"01234");

    let report = Finder::new(src.path(), Some(dst.path()), wad_config())
        .unwrap()
        .find_duplicates();

    assert!(report.is_empty());
    assert_eq!(
        names_in(dst.path()),
        vec!["000001_small.wad", "000002_medium.wad", "000003_big.wad"]
    );
}

#[test]
fn test_same_name_in_different_directories() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(&src.path().join("one/map.wad"), b"a");
    write(&src.path().join("two/map.wad"), b"bb");

    Finder::new(src.path(), Some(dst.path()), wad_config())
        .unwrap()
        .find_duplicates();

    assert_eq!(names_in(dst.path()), vec!["000001_map.wad", "000002_map.wad"]);
}

#[test]
fn test_destination_created_with_parents() {
    let src = tempdir().unwrap();
    let root = tempdir().unwrap();
    let dst = root.path().join("deep/nested/out");
    write(&src.path().join("a.wad"), b"a");

    Finder::new(src.path(), Some(&dst), wad_config())
        .unwrap()
        .find_duplicates();

    assert!(dst.is_dir());
    assert_eq!(names_in(&dst), vec!["000001_a.wad"]);
}

#[test]
fn test_destination_is_a_file() {
    let src = tempdir().unwrap();
    let root = tempdir().unwrap();
    let dst = root.path().join("file");
    write(&dst, b"not a directory");

    let result = Finder::new(src.path(), Some(&dst), wad_config());
    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[test]
fn test_destination_inside_source_not_rescanned() {
    let src = tempdir().unwrap();
    let dst = src.path().join("unique");
    write(&src.path().join("a.wad"), b"same");
    write(&src.path().join("b.wad"), b"same");
    write(&dst.join("000001_old.wad"), b"same");

    let report = Finder::new(src.path(), Some(&dst), wad_config())
        .unwrap()
        .find_duplicates();

    let groups: Vec<_> = report.groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(report.summary().total_files, 2);
}

#[test]
fn test_no_files_leaves_destination_empty() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(&src.path().join("notes.txt"), b"text");

    let report = Finder::new(src.path(), Some(dst.path()), wad_config())
        .unwrap()
        .find_duplicates();

    assert!(matches!(report.entries(), [ReportEntry::NoFiles { .. }]));
    assert!(names_in(dst.path()).is_empty());
    assert!(report.copies().is_empty());
}

#[test]
fn test_copy_failure_continues_run() {
    let src = tempdir().unwrap();
    let root = tempdir().unwrap();
    let dst = root.path().join("out");
    write(&src.path().join("a.wad"), b"a");
    write(&src.path().join("b.wad"), b"bb");

    let finder = Finder::new(src.path(), Some(&dst), wad_config()).unwrap();
    fs::remove_dir(&dst).unwrap();
    let report = finder.find_duplicates();

    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ReportEntry::CopyFailed { .. })));
    assert!(report.lines()[0].starts_with("Failed to copy "));
    assert!(report.lines()[1].contains("000002_b.wad"));
    assert!(report.copies().is_empty());
    assert_eq!(report.summary().copies_attempted, 2);
    assert_eq!(report.summary().failed_copies, 2);
}

#[test]
fn test_existing_destination_file_overwritten() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write(&src.path().join("a.wad"), b"fresh");
    write(&dst.path().join("000001_a.wad"), b"stale content");

    Finder::new(src.path(), Some(dst.path()), wad_config())
        .unwrap()
        .find_duplicates();

    assert_eq!(fs::read(dst.path().join("000001_a.wad")).unwrap(), b"fresh");
}
