//! JWalk-based directory scanner.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use jwalk::{Parallelism, WalkDir};
use tracing::debug;

use scout_core::{PatternMatcher, ScanError, ScanParams, ScanResult, ScanWarning, WarningKind};

use crate::progress::ProgressReporter;

/// Everything one walk produces: the structural result, recovered warnings,
/// and the per-file mtime snapshot the cache diffs against later.
#[derive(Debug)]
pub struct ScanOutput {
    /// Discovered files and folders.
    pub result: ScanResult,
    /// Per-entry failures recovered by skipping.
    pub warnings: Vec<ScanWarning>,
    /// Modification times of every discovered file, relative paths.
    pub file_timestamps: BTreeMap<PathBuf, SystemTime>,
}

/// Directory tree walker.
///
/// Execution knobs live here; everything that identifies a scan (and its
/// cache entry) lives in [`ScanParams`].
pub struct Scanner {
    threads: usize,
}

impl Scanner {
    /// Scanner using the shared rayon pool.
    pub fn new() -> Self {
        Self { threads: 0 }
    }

    /// Scanner with a dedicated pool of `threads` workers (0 = shared pool).
    pub fn with_threads(threads: usize) -> Self {
        Self { threads }
    }

    /// Walk the tree described by `params`.
    ///
    /// Fails only on root validation; every per-entry failure is recorded
    /// as a warning and traversal continues.
    pub fn scan(
        &self,
        params: &ScanParams,
        matcher: &PatternMatcher,
        reporter: &mut ProgressReporter,
    ) -> Result<ScanOutput, ScanError> {
        let root = validate_root(&params.root)?;
        reporter.start_scan(&root);

        let output = if params.recursive {
            self.walk_tree(&root, params.max_depth, matcher, reporter)
        } else {
            self.list_children(&root, matcher, reporter)?
        };

        reporter.finish_scan(output.result.total_files, output.result.total_folders);
        Ok(output)
    }

    /// Timestamp-only walk used by the cache diff.
    ///
    /// Same pruning and depth rules as [`scan`](Scanner::scan), but entries
    /// are only stat'ed, never categorized, and failures are skipped
    /// silently — the diff treats an unreadable file as absent.
    pub fn collect_timestamps(
        &self,
        params: &ScanParams,
        matcher: &PatternMatcher,
    ) -> Result<BTreeMap<PathBuf, SystemTime>, ScanError> {
        let root = validate_root(&params.root)?;
        let mut timestamps = BTreeMap::new();

        if params.recursive {
            for entry_result in self.walker(&root, params.max_depth, matcher) {
                let Ok(entry) = entry_result else { continue };
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                let Ok(rel) = path.strip_prefix(&root) else { continue };
                match entry.metadata() {
                    Ok(meta) => {
                        let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                        timestamps.insert(rel.to_path_buf(), mtime);
                    }
                    Err(err) => debug!(path = %path.display(), %err, "skipping unstatable file"),
                }
            }
        } else {
            let entries = std::fs::read_dir(&root).map_err(|e| ScanError::io(&root, e))?;
            for entry in entries.flatten() {
                let rel = PathBuf::from(entry.file_name());
                let Ok(file_type) = entry.file_type() else { continue };
                if !file_type.is_file() || matcher.should_ignore(&rel, false) {
                    continue;
                }
                if let Ok(meta) = entry.metadata() {
                    let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                    timestamps.insert(rel, mtime);
                }
            }
        }

        Ok(timestamps)
    }

    /// Build the pruning jwalk walker shared by `scan` and
    /// `collect_timestamps`. Ignored entries are removed from each read
    /// directory's child list, so an ignored directory's contents are never
    /// visited.
    fn walker(
        &self,
        root: &Path,
        max_depth: Option<u32>,
        matcher: &PatternMatcher,
    ) -> WalkDir {
        let parallelism = match self.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let filter_matcher = Arc::new(matcher.clone());
        let filter_root = root.to_path_buf();

        WalkDir::new(root)
            .parallelism(parallelism)
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(1)
            .max_depth(max_depth.map(|d| d as usize).unwrap_or(usize::MAX))
            .process_read_dir(move |_depth, _dir_path, _state, children| {
                children.retain(|entry_result| match entry_result {
                    Ok(entry) => {
                        let path = entry.path();
                        let rel = path.strip_prefix(&filter_root).unwrap_or(&path);
                        !filter_matcher.should_ignore(rel, entry.file_type().is_dir())
                    }
                    // Keep errors so the main loop can record them.
                    Err(_) => true,
                });
            })
    }

    fn walk_tree(
        &self,
        root: &Path,
        max_depth: Option<u32>,
        matcher: &PatternMatcher,
        reporter: &mut ProgressReporter,
    ) -> ScanOutput {
        let mut result = ScanResult::new();
        let mut warnings = Vec::new();
        let mut file_timestamps = BTreeMap::new();

        for entry_result in self.walker(root, max_depth, matcher) {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    warnings.push(match err.io_error() {
                        Some(io) => ScanWarning::from_io(path, io),
                        None => ScanWarning::new(path, err.to_string(), WarningKind::ReadError),
                    });
                    continue;
                }
            };

            let path = entry.path();
            let Ok(rel) = path.strip_prefix(root).map(Path::to_path_buf) else {
                continue;
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                result.insert_folder(rel);
            } else if file_type.is_file() {
                match entry.metadata() {
                    Ok(meta) => {
                        let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                        file_timestamps.insert(rel.clone(), mtime);
                    }
                    Err(err) => {
                        warnings.push(ScanWarning::new(
                            &path,
                            err.to_string(),
                            WarningKind::MetadataError,
                        ));
                    }
                }
                result.insert_file(rel);
            }
            // Symlinks and special files are not part of the result.

            reporter.update_progress(result.total_files, result.total_folders, Some(&path));
        }

        ScanOutput {
            result,
            warnings,
            file_timestamps,
        }
    }

    fn list_children(
        &self,
        root: &Path,
        matcher: &PatternMatcher,
        reporter: &mut ProgressReporter,
    ) -> Result<ScanOutput, ScanError> {
        let mut result = ScanResult::new();
        let mut warnings = Vec::new();
        let mut file_timestamps = BTreeMap::new();

        let entries = std::fs::read_dir(root).map_err(|e| ScanError::io(root, e))?;
        for entry_result in entries {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    warnings.push(ScanWarning::from_io(root, &err));
                    continue;
                }
            };

            let rel = PathBuf::from(entry.file_name());
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    warnings.push(ScanWarning::metadata_error(entry.path(), &err));
                    continue;
                }
            };

            // Non-recursive listings report files only; subdirectories
            // are not entered and not counted.
            if file_type.is_file() && !matcher.should_ignore(&rel, false) {
                match entry.metadata() {
                    Ok(meta) => {
                        let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                        file_timestamps.insert(rel.clone(), mtime);
                    }
                    Err(err) => warnings.push(ScanWarning::metadata_error(entry.path(), &err)),
                }
                result.insert_file(rel);
            }

            reporter.update_progress(result.total_files, result.total_folders, None);
        }

        Ok(ScanOutput {
            result,
            warnings,
            file_timestamps,
        })
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve and validate the scan root.
fn validate_root(root: &Path) -> Result<PathBuf, ScanError> {
    let root = root.canonicalize().map_err(|e| ScanError::io(root, e))?;
    if !root.is_dir() {
        return Err(ScanError::NotADirectory { path: root });
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("src")).unwrap();
        fs::create_dir(root.join("docs")).unwrap();
        fs::create_dir(root.join("src/nested")).unwrap();
        fs::create_dir(root.join("node_modules")).unwrap();

        fs::write(root.join("main.py"), "print('hi')").unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn f() {}").unwrap();
        fs::write(root.join("src/nested/util.rs"), "pub fn g() {}").unwrap();
        fs::write(root.join("docs/guide.md"), "# guide").unwrap();
        fs::write(root.join("node_modules/dep.js"), "module.exports = 1").unwrap();

        temp
    }

    fn scan(params: &ScanParams) -> ScanOutput {
        let matcher = PatternMatcher::with_patterns(&params.ignore_patterns);
        Scanner::new()
            .scan(params, &matcher, &mut ProgressReporter::silent())
            .unwrap()
    }

    #[test]
    fn test_recursive_scan() {
        let temp = create_test_tree();
        let output = scan(&ScanParams::new(temp.path()));

        // node_modules is pruned by the default patterns.
        assert_eq!(output.result.total_files, 4);
        assert_eq!(output.result.total_folders, 3);
        assert!(output.result.files.contains(Path::new("src/nested/util.rs")));
        assert!(!output.result.files.contains(Path::new("node_modules/dep.js")));
        assert!(output.result.ancestor_closure_holds());
    }

    #[test]
    fn test_timestamps_cover_all_files() {
        let temp = create_test_tree();
        let output = scan(&ScanParams::new(temp.path()));

        assert_eq!(
            output.file_timestamps.keys().collect::<Vec<_>>(),
            output.result.files.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_non_recursive_scan() {
        let temp = create_test_tree();
        let params = ScanParams::builder()
            .root(temp.path())
            .recursive(false)
            .build()
            .unwrap();
        let output = scan(&params);

        assert!(output.result.files.contains(Path::new("main.py")));
        assert_eq!(output.result.total_files, 1);
        // Files only; subdirectories are neither entered nor counted.
        assert!(output.result.folders.is_empty());
    }

    #[test]
    fn test_max_depth_limits_descent() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("x/y")).unwrap();
        fs::write(temp.path().join("x/y/z.py"), "pass").unwrap();

        let params = ScanParams::builder()
            .root(temp.path())
            .max_depth(Some(1u32))
            .build()
            .unwrap();
        let output = scan(&params);

        assert!(output.result.folders.contains(Path::new("x")));
        assert!(!output.result.folders.contains(Path::new("x/y")));
        assert!(output.result.files.is_empty());
    }

    #[test]
    fn test_custom_ignore_pattern_prunes_directory() {
        let temp = create_test_tree();
        let params = ScanParams::builder()
            .root(temp.path())
            .ignore_patterns(vec!["docs".to_string()])
            .build()
            .unwrap();
        let output = scan(&params);

        assert!(!output.result.folders.contains(Path::new("docs")));
        assert!(!output.result.files.contains(Path::new("docs/guide.md")));
    }

    #[test]
    fn test_missing_root_fails() {
        let err = Scanner::new()
            .scan(
                &ScanParams::new("/definitely/not/a/real/path"),
                &PatternMatcher::new(),
                &mut ProgressReporter::silent(),
            )
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_file_root_fails() {
        let temp = create_test_tree();
        let err = Scanner::new()
            .scan(
                &ScanParams::new(temp.path().join("main.py")),
                &PatternMatcher::new(),
                &mut ProgressReporter::silent(),
            )
            .unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_collect_timestamps_matches_scan() {
        let temp = create_test_tree();
        let params = ScanParams::new(temp.path());
        let matcher = PatternMatcher::new();

        let output = scan(&params);
        let timestamps = Scanner::new().collect_timestamps(&params, &matcher).unwrap();
        assert_eq!(timestamps, output.file_timestamps);
    }
}
