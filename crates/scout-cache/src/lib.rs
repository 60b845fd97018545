//! Incremental scan cache for scout.
//!
//! Scans are identified by a content hash of their canonical parameters.
//! Each cache entry pairs a structural result with the modification times
//! of every file in it; a later scan with the same parameters diffs those
//! times against the tree and, when nothing moved, answers from the entry
//! without walking at all. When files were added, changed, or removed the
//! cached result is patched in place instead of rebuilt.
//!
//! Entries are plain JSON files, one per key, written atomically via a
//! temp-file rename so concurrent processes sharing a cache directory
//! never observe a torn entry. Every read-side failure (missing file,
//! corrupt JSON) degrades to a cache miss.
//!
//! # Example
//!
//! ```rust,no_run
//! use scout_cache::{CachedScanner, ScanCache};
//! use scout_scan::{PatternMatcher, ProgressReporter, ScanParams, Scanner};
//!
//! let params = ScanParams::new("/path/to/scan");
//! let matcher = PatternMatcher::with_patterns(&params.ignore_patterns);
//! let scanner = CachedScanner::new(Scanner::new(), ScanCache::for_root(&params.root));
//!
//! let report = scanner
//!     .scan(&params, &matcher, &mut ProgressReporter::silent())
//!     .unwrap();
//! println!("cached: {}, files: {}", report.cached, report.result.total_files);
//! ```

mod cache;
mod cached;
mod key;

pub use cache::{CacheEntry, CacheError, ScanCache, DEFAULT_CACHE_DIR};
pub use cached::CachedScanner;
pub use key::CacheKey;

// Re-export core types for convenience
pub use scout_core::{ChangeSummary, ScanParams, ScanReport, ScanResult};
