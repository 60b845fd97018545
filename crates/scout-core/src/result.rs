//! Scan result and report types.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorSummary, ScanWarning};
use crate::file_types::{FileCategory, detect_category};

/// The structural outcome of a scan: discovered files and folders.
///
/// All paths are relative to the scan root. Invariants:
/// - `files` and `folders` are disjoint;
/// - every ancestor directory (strictly below the root) of a path in
///   `files` is present in `folders`, including after incremental updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Discovered files, relative to the scan root.
    pub files: BTreeSet<PathBuf>,
    /// Discovered folders, relative to the scan root.
    pub folders: BTreeSet<PathBuf>,
    /// Number of files.
    pub total_files: u64,
    /// Number of folders.
    pub total_folders: u64,
    /// File counts per category, classified by extension/name.
    pub categories: BTreeMap<FileCategory, u64>,
}

impl ScanResult {
    /// An empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file, updating totals and category counts.
    pub fn insert_file(&mut self, path: PathBuf) {
        let category = detect_category(&path);
        if self.files.insert(path) {
            self.total_files += 1;
            *self.categories.entry(category).or_insert(0) += 1;
        }
    }

    /// Record a folder, updating totals.
    pub fn insert_folder(&mut self, path: PathBuf) {
        if self.folders.insert(path) {
            self.total_folders += 1;
        }
    }

    /// Remove a file, updating totals and category counts.
    pub fn remove_file(&mut self, path: &Path) {
        if self.files.remove(path) {
            self.total_files = self.total_files.saturating_sub(1);
            let category = detect_category(path);
            if let Some(count) = self.categories.get_mut(&category) {
                *count = count.saturating_sub(1);
            }
        }
    }

    /// Record a file together with every ancestor directory below the root.
    ///
    /// This is what keeps the ancestor-closure invariant intact during
    /// incremental updates, where new files arrive without a tree walk.
    pub fn insert_file_with_ancestors(&mut self, path: PathBuf) {
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.insert_folder(dir.to_path_buf());
            parent = dir.parent();
        }
        self.insert_file(path);
    }

    /// Check the ancestor-closure invariant. Intended for tests and debug
    /// assertions.
    pub fn ancestor_closure_holds(&self) -> bool {
        self.files.iter().all(|file| {
            let mut parent = file.parent();
            while let Some(dir) = parent {
                if dir.as_os_str().is_empty() {
                    break;
                }
                if !self.folders.contains(dir) {
                    return false;
                }
                parent = dir.parent();
            }
            true
        })
    }
}

/// Delta counts from an incremental cache update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Files whose mtime advanced since the cached snapshot.
    pub changed: u64,
    /// Files present now but absent from the cached snapshot.
    pub new: u64,
    /// Files in the cached snapshot that no longer exist.
    pub deleted: u64,
}

impl ChangeSummary {
    /// Whether the tree is unchanged relative to the snapshot.
    pub fn is_empty(&self) -> bool {
        self.changed == 0 && self.new == 0 && self.deleted == 0
    }
}

/// A scan result plus the metadata collaborators consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// The structural result.
    pub result: ScanResult,
    /// Whether the result came from the cache.
    pub cached: bool,
    /// Whether a structural incremental update was applied.
    pub incremental: bool,
    /// Delta counts (zero for fresh and verbatim-cached scans).
    pub delta: ChangeSummary,
    /// Wall-clock time for the request.
    pub scan_time: Duration,
    /// Recovered warnings from the scan.
    pub warnings: Vec<ScanWarning>,
}

impl ScanReport {
    /// Wrap a fresh (uncached) scan.
    pub fn fresh(result: ScanResult, scan_time: Duration, warnings: Vec<ScanWarning>) -> Self {
        Self {
            result,
            cached: false,
            incremental: false,
            delta: ChangeSummary::default(),
            scan_time,
            warnings,
        }
    }

    /// Aggregate warning counts for display.
    pub fn error_summary(&self) -> ErrorSummary {
        ErrorSummary::from_warnings(&self.warnings)
    }
}
