//! Scan parameter types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Parameters identifying a scan.
///
/// These four fields are the cache identity of a scan: two parameter sets
/// whose [`canonical`](ScanParams::canonical) forms are equal address the
/// same cache entry. Execution knobs (thread count, progress mode) live on
/// the scanner, not here.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanParams {
    /// Root path to scan.
    pub root: PathBuf,

    /// Descend into subdirectories.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Maximum depth below the root (None = unbounded).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Caller-supplied ignore patterns, applied on top of the defaults.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl ScanParamsBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.root {
            Some(root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl From<ScanParamsBuilderError> for ScanError {
    fn from(err: ScanParamsBuilderError) -> Self {
        Self::InvalidParams {
            message: err.to_string(),
        }
    }
}

impl ScanParams {
    /// Create a builder.
    pub fn builder() -> ScanParamsBuilder {
        ScanParamsBuilder::default()
    }

    /// Create params for a recursive, unbounded scan of a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: true,
            max_depth: None,
            ignore_patterns: Vec::new(),
        }
    }

    /// Return the canonical form used for cache keying: same fields with
    /// the ignore patterns sorted. Pattern order affects matching never,
    /// so it must not affect the key.
    pub fn canonical(&self) -> Self {
        let mut patterns = self.ignore_patterns.clone();
        patterns.sort();
        Self {
            root: self.root.clone(),
            recursive: self.recursive,
            max_depth: self.max_depth,
            ignore_patterns: patterns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_builder() {
        let params = ScanParams::builder()
            .root("/home/user/project")
            .recursive(false)
            .max_depth(Some(3u32))
            .build()
            .unwrap();

        assert_eq!(params.root, PathBuf::from("/home/user/project"));
        assert!(!params.recursive);
        assert_eq!(params.max_depth, Some(3));
    }

    #[test]
    fn test_params_simple() {
        let params = ScanParams::new("/home/user/project");
        assert!(params.recursive);
        assert_eq!(params.max_depth, None);
        assert!(params.ignore_patterns.is_empty());
    }

    #[test]
    fn test_builder_rejects_empty_root() {
        let result = ScanParams::builder().root("").build();
        let err = ScanError::from(result.unwrap_err());
        assert!(matches!(err, ScanError::InvalidParams { .. }));
        assert!(err.to_string().contains("Root path cannot be empty"));
    }

    #[test]
    fn test_canonical_sorts_patterns() {
        let a = ScanParams::builder()
            .root("/p")
            .ignore_patterns(vec!["b".to_string(), "a".to_string()])
            .build()
            .unwrap();
        let b = ScanParams::builder()
            .root("/p")
            .ignore_patterns(vec!["a".to_string(), "b".to_string()])
            .build()
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(a.canonical(), b.canonical());
    }
}
