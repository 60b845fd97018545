//! File system discovery engine for scout.
//!
//! This crate walks directory trees and reports which files and folders
//! exist, after ignore-pattern pruning.
//!
//! # Overview
//!
//! `scout-scan` is responsible for traversal. Key features:
//!
//! - **Parallel traversal** via jwalk/rayon
//! - **Pruning** of ignored directories, so their contents are never read
//! - **Progress reporting** with rate-limited terminal output
//! - **Configurable** depth limit and non-recursive listing
//!
//! # Example
//!
//! ```rust,no_run
//! use scout_scan::{PatternMatcher, ProgressReporter, ScanParams, Scanner};
//!
//! let params = ScanParams::new("/path/to/scan");
//! let matcher = PatternMatcher::with_patterns(&params.ignore_patterns);
//! let scanner = Scanner::new();
//!
//! let output = scanner
//!     .scan(&params, &matcher, &mut ProgressReporter::silent())
//!     .unwrap();
//!
//! println!("Total files: {}", output.result.total_files);
//! println!("Total folders: {}", output.result.total_folders);
//! ```

mod progress;
mod scanner;

pub use progress::{ProgressMode, ProgressReporter, ScanPhase};
pub use scanner::{ScanOutput, Scanner};

// Re-export core types for convenience
pub use scout_core::{
    PatternMatcher, ScanError, ScanParams, ScanResult, ScanWarning, WarningKind,
};
