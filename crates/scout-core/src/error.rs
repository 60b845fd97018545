//! Error types for discovery operations.
//!
//! Fatal errors ([`ScanError`]) abort a scan; everything that can be
//! recovered by skipping a single entry becomes a [`ScanWarning`] collected
//! alongside the result.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Root path does not exist.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Root path exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Permission denied on the root path itself.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// The disk filled up while writing; always fatal.
    #[error("No space left on device at {path}")]
    DiskFull { path: PathBuf },

    /// Generic I/O error on the root path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid scan parameters.
    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },
}

impl ScanError {
    /// Create an error with path context, classified by I/O error kind.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::StorageFull => Self::DiskFull { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of recovered warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied for an entry.
    PermissionDenied,
    /// Error reading a directory or file.
    ReadError,
    /// Error reading entry metadata.
    MetadataError,
    /// A source file could not be parsed.
    ParseError,
    /// A cache entry could not be read or written.
    CacheError,
}

/// Non-fatal warning recovered during a scan or analysis pass.
///
/// Warnings accumulate in a plain `Vec` owned by the operation and are
/// returned to the caller with the result; there is no process-wide handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// Classify an I/O failure on a single entry into the matching kind.
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::PermissionDenied {
            Self::permission_denied(path)
        } else {
            Self::read_error(path, error)
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Read error: {error}"),
            path,
            kind: WarningKind::ReadError,
        }
    }

    /// Create a metadata error warning.
    pub fn metadata_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Metadata error: {error}"),
            path,
            kind: WarningKind::MetadataError,
        }
    }

    /// Create a parse error warning.
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind: WarningKind::ParseError,
        }
    }
}

/// Aggregated counts of recovered warnings, returned alongside results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// Total number of warnings.
    pub total: u64,
    /// Counts broken down by warning kind.
    pub by_kind: BTreeMap<WarningKind, u64>,
}

impl ErrorSummary {
    /// Build a summary from a warning list.
    pub fn from_warnings(warnings: &[ScanWarning]) -> Self {
        let mut by_kind = BTreeMap::new();
        for warning in warnings {
            *by_kind.entry(warning.kind).or_insert(0) += 1;
        }
        Self {
            total: warnings.len() as u64,
            by_kind,
        }
    }

    /// Whether any warnings were recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io_classification() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));

        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_warning_io_classification() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let warning = ScanWarning::from_io("/locked/dir", &denied);
        assert_eq!(warning.kind, WarningKind::PermissionDenied);

        let broken = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad entry");
        let warning = ScanWarning::from_io("/weird", &broken);
        assert_eq!(warning.kind, WarningKind::ReadError);
    }

    #[test]
    fn test_warning_creation() {
        let warning = ScanWarning::permission_denied("/test/path");
        assert_eq!(warning.kind, WarningKind::PermissionDenied);
        assert!(warning.message.contains("Permission denied"));
    }

    #[test]
    fn test_error_summary_counts() {
        let warnings = vec![
            ScanWarning::permission_denied("/a"),
            ScanWarning::permission_denied("/b"),
            ScanWarning::parse_error("/c.py", "bad syntax"),
        ];
        let summary = ErrorSummary::from_warnings(&warnings);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_kind[&WarningKind::PermissionDenied], 2);
        assert_eq!(summary.by_kind[&WarningKind::ParseError], 1);
        assert!(!summary.is_empty());
    }
}
