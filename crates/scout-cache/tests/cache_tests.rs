//! Integration tests for the incremental scan cache.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use scout_cache::{CachedScanner, ScanCache};
use scout_scan::{PatternMatcher, ProgressReporter, ScanParams, ScanResult, Scanner};

fn create_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir(root.join("src")).unwrap();
    fs::create_dir(root.join("sub")).unwrap();

    for i in 0..4 {
        fs::write(root.join(format!("file{i}.py")), format!("x = {i}")).unwrap();
    }
    for i in 0..3 {
        fs::write(root.join("src").join(format!("mod{i}.rs")), "pub fn f() {}").unwrap();
    }
    for i in 0..3 {
        fs::write(root.join("sub").join(format!("doc{i}.md")), "# doc").unwrap();
    }

    temp
}

fn cached_scanner(root: &Path) -> CachedScanner {
    CachedScanner::new(Scanner::new(), ScanCache::for_root(root))
}

fn fresh_result(params: &ScanParams) -> ScanResult {
    let matcher = PatternMatcher::with_patterns(&params.ignore_patterns);
    Scanner::new()
        .scan(params, &matcher, &mut ProgressReporter::silent())
        .unwrap()
        .result
}

#[test]
fn test_second_scan_answers_from_cache() {
    let temp = create_project();
    let params = ScanParams::new(temp.path());
    let matcher = PatternMatcher::new();
    let scanner = cached_scanner(temp.path());

    let first = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    assert!(!first.cached);
    assert!(!first.incremental);
    assert_eq!(first.result.total_files, 10);

    let second = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    assert!(second.cached);
    assert!(!second.incremental);
    assert!(second.delta.is_empty());
    assert_eq!(second.result, first.result);
}

#[test]
fn test_incremental_update_after_add_and_delete() {
    let temp = create_project();
    let params = ScanParams::new(temp.path());
    let matcher = PatternMatcher::new();
    let scanner = cached_scanner(temp.path());

    scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();

    fs::remove_file(temp.path().join("file0.py")).unwrap();
    fs::remove_file(temp.path().join("sub/doc0.md")).unwrap();
    fs::write(temp.path().join("src/extra.rs"), "pub fn g() {}").unwrap();

    let report = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    assert!(report.cached);
    assert!(report.incremental);
    assert_eq!(report.delta.new, 1);
    assert_eq!(report.delta.deleted, 2);
    assert_eq!(report.delta.changed, 0);
    assert_eq!(report.result.total_files, 9);
    assert!(report.result.files.contains(Path::new("src/extra.rs")));
    assert!(!report.result.files.contains(Path::new("file0.py")));
    assert!(report.result.ancestor_closure_holds());

    // The patched result matches a scan that never saw the cache.
    assert_eq!(report.result, fresh_result(&params));
}

#[test]
fn test_modified_file_reports_changed() {
    let temp = create_project();
    let params = ScanParams::new(temp.path());
    let matcher = PatternMatcher::new();
    let scanner = cached_scanner(temp.path());

    let first = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();

    // Coarse-timestamp filesystems need the mtime to actually move.
    thread::sleep(Duration::from_millis(20));
    fs::write(temp.path().join("file1.py"), "x = 'rewritten'").unwrap();

    let report = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    assert!(report.incremental);
    assert_eq!(report.delta.changed, 1);
    assert_eq!(report.delta.new, 0);
    assert_eq!(report.delta.deleted, 0);
    // Structure is unchanged by a content edit.
    assert_eq!(report.result, first.result);
}

#[test]
fn test_rewound_mtime_is_not_a_change() {
    let temp = create_project();
    let params = ScanParams::new(temp.path());
    let matcher = PatternMatcher::new();
    let scanner = cached_scanner(temp.path());

    scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();

    // A checkout or archive restore can move an mtime backwards; only a
    // forward-moving mtime counts as a change.
    let target = temp.path().join("file1.py");
    let past = std::time::SystemTime::now() - Duration::from_secs(3600);
    fs::File::options()
        .write(true)
        .open(&target)
        .unwrap()
        .set_modified(past)
        .unwrap();

    let report = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    assert!(report.cached);
    assert!(!report.incremental);
    assert_eq!(report.delta.changed, 0);
}

#[test]
fn test_incremental_update_settles() {
    let temp = create_project();
    let params = ScanParams::new(temp.path());
    let matcher = PatternMatcher::new();
    let scanner = cached_scanner(temp.path());

    scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    fs::write(temp.path().join("late.py"), "pass").unwrap();
    scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();

    // The rewritten entry absorbs the delta, so the next scan is a plain hit.
    let third = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    assert!(third.cached);
    assert!(!third.incremental);
    assert!(third.delta.is_empty());
}

#[test]
fn test_clear_cache_forces_full_scan() {
    let temp = create_project();
    let params = ScanParams::new(temp.path());
    let matcher = PatternMatcher::new();
    let scanner = cached_scanner(temp.path());

    scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    assert_eq!(scanner.clear_cache().unwrap(), 1);

    let report = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    assert!(!report.cached);
}

#[test]
fn test_different_params_use_separate_entries() {
    let temp = create_project();
    let matcher = PatternMatcher::new();
    let scanner = cached_scanner(temp.path());

    let deep = ScanParams::new(temp.path());
    let flat = ScanParams::builder()
        .root(temp.path())
        .recursive(false)
        .build()
        .unwrap();

    scanner
        .scan(&deep, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    let flat_report = scanner
        .scan(&flat, &matcher, &mut ProgressReporter::silent())
        .unwrap();

    // The recursive entry must not answer for the flat listing.
    assert!(!flat_report.cached);
    assert_eq!(flat_report.result.total_files, 4);
    assert_eq!(scanner.clear_cache().unwrap(), 2);
}

#[test]
fn test_cache_directory_never_scans_itself() {
    let temp = create_project();
    let params = ScanParams::new(temp.path());
    let matcher = PatternMatcher::new();
    let scanner = cached_scanner(temp.path());

    let first = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();
    // Entry files now exist on disk under the root.
    let second = scanner
        .scan(&params, &matcher, &mut ProgressReporter::silent())
        .unwrap();

    assert!(second.cached);
    assert!(!second.incremental);
    assert_eq!(second.result, first.result);
    assert!(!second
        .result
        .folders
        .iter()
        .any(|f| f.ends_with(".scout-cache")));
}
