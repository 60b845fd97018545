use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use scout_core::{
    ChangeSummary, ErrorSummary, FileCategory, PatternMatcher, ScanParams, ScanResult,
    ScanWarning, WarningKind,
};

#[test]
fn test_params_canonical_equality_is_cache_identity() {
    let a = ScanParams::builder()
        .root("/project")
        .max_depth(Some(4u32))
        .ignore_patterns(vec!["*.log".to_string(), "vendor".to_string()])
        .build()
        .unwrap();
    let b = ScanParams::builder()
        .root("/project")
        .max_depth(Some(4u32))
        .ignore_patterns(vec!["vendor".to_string(), "*.log".to_string()])
        .build()
        .unwrap();

    // Same canonical form means the same cache entry.
    assert_eq!(a.canonical(), b.canonical());

    let c = ScanParams::builder()
        .root("/project")
        .recursive(false)
        .build()
        .unwrap();
    assert_ne!(a.canonical(), c.canonical());
}

#[test]
fn test_params_serde_round_trip() {
    let params = ScanParams::builder()
        .root("/project")
        .max_depth(Some(2u32))
        .ignore_patterns(vec!["dist".to_string()])
        .build()
        .unwrap();

    let json = serde_json::to_string(&params).unwrap();
    let back: ScanParams = serde_json::from_str(&json).unwrap();
    assert_eq!(params, back);
}

#[test]
fn test_scan_result_serde_round_trip() {
    let mut result = ScanResult::new();
    result.insert_folder(PathBuf::from("src"));
    result.insert_file(PathBuf::from("src/lib.rs"));
    result.insert_file(PathBuf::from("README.md"));

    let json = serde_json::to_string(&result).unwrap();
    let back: ScanResult = serde_json::from_str(&json).unwrap();

    assert_eq!(back, result);
    assert_eq!(back.categories[&FileCategory::Code], 1);
    assert_eq!(back.categories[&FileCategory::Documentation], 1);
}

#[test]
fn test_files_and_folders_stay_disjoint() {
    let mut result = ScanResult::new();
    result.insert_folder(PathBuf::from("src"));
    result.insert_file_with_ancestors(PathBuf::from("src/deep/mod.rs"));

    let files: BTreeSet<_> = result.files.iter().cloned().collect();
    let folders: BTreeSet<_> = result.folders.iter().cloned().collect();
    assert!(files.is_disjoint(&folders));
    assert!(result.ancestor_closure_holds());
}

#[test]
fn test_matcher_drives_result_filtering() {
    let matcher = PatternMatcher::with_patterns(&["*.generated.ts"]);
    let candidates = [
        ("src/app.ts", false),
        ("src/api.generated.ts", false),
        ("node_modules", true),
    ];

    let mut result = ScanResult::new();
    for (path, is_dir) in candidates {
        let path = Path::new(path);
        if matcher.should_ignore(path, is_dir) {
            continue;
        }
        if is_dir {
            result.insert_folder(path.to_path_buf());
        } else {
            result.insert_file_with_ancestors(path.to_path_buf());
        }
    }

    assert!(result.files.contains(Path::new("src/app.ts")));
    assert!(!result.files.contains(Path::new("src/api.generated.ts")));
    assert!(!result.folders.contains(Path::new("node_modules")));
}

#[test]
fn test_error_summary_serializes_by_kind() {
    let warnings = vec![
        ScanWarning::permission_denied("/locked"),
        ScanWarning::parse_error("bad.py", "unexpected indent"),
    ];
    let summary = ErrorSummary::from_warnings(&warnings);
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["total"], 2);
    assert_eq!(json["by_kind"]["PermissionDenied"], 1);
    assert_eq!(json["by_kind"]["ParseError"], 1);

    assert_eq!(
        summary.by_kind.keys().copied().collect::<Vec<_>>(),
        vec![WarningKind::PermissionDenied, WarningKind::ParseError]
    );
}

#[test]
fn test_change_summary_defaults_to_empty() {
    let delta = ChangeSummary::default();
    assert!(delta.is_empty());
    assert_eq!(delta.changed + delta.new + delta.deleted, 0);
}
