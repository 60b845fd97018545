//! Core types for scout.
//!
//! This crate provides the shared data structures used across the scout
//! workspace: scan parameters, results and reports, the error/warning split,
//! ignore-pattern matching, and file type classification.

mod error;
mod file_types;
mod ignore;
mod params;
mod result;

pub use error::{ErrorSummary, ScanError, ScanWarning, WarningKind};
pub use file_types::{FileCategory, Language, detect_category, detect_language};
pub use ignore::{DEFAULT_PATTERNS, PROJECT_IGNORE_FILE, PatternMatcher, load_project_patterns};
pub use params::{ScanParams, ScanParamsBuilder};
pub use result::{ChangeSummary, ScanReport, ScanResult};
