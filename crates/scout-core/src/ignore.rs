//! Ignore-pattern matching for scan filtering.
//!
//! Patterns are shell-style globs applied in three ways: against the full
//! normalized relative path, against every individual path segment, and (for
//! patterns with a trailing `/`) against directories only. A directory that
//! matches is pruned, so nothing under it needs its own pattern.

use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;

/// Default patterns for directories and files nobody wants in a scan.
pub const DEFAULT_PATTERNS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // Node.js
    "node_modules",
    "npm-debug.log",
    "yarn-error.log",
    "yarn.lock",
    "package-lock.json",
    // Python
    "__pycache__",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    ".pytest_cache",
    ".coverage",
    "htmlcov",
    ".tox",
    ".venv",
    "venv",
    // Build and distribution
    "build",
    "dist",
    "*.egg-info",
    "target",
    // IDE and editor
    ".vscode",
    ".idea",
    "*.swp",
    "*.swo",
    "*~",
    // OS cruft
    ".DS_Store",
    "._*",
    ".Spotlight-V100",
    ".Trashes",
    "Thumbs.db",
    "ehthumbs.db",
    // Logs and temporary files
    "*.log",
    "*.tmp",
    "*.temp",
    "logs",
    "tmp",
    // Scout's own state
    ".scout-cache",
    "*.cache",
];

/// Name of the per-project ignore file read from the scan root.
pub const PROJECT_IGNORE_FILE: &str = ".scoutignore";

/// Ordered glob ignore-rule evaluator.
///
/// Patterns only accumulate: defaults, then project-file patterns, then
/// caller patterns. A path is ignored if any pattern matches; nothing
/// un-ignores.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<String>,
    path_set: GlobSet,
    segment_set: GlobSet,
    dir_set: GlobSet,
}

impl PatternMatcher {
    /// Matcher with only the default patterns.
    pub fn new() -> Self {
        Self::with_patterns::<&str>(&[])
    }

    /// Matcher with the defaults plus extra patterns, in that order.
    ///
    /// Malformed globs are skipped with a warning; a bad pattern can cause
    /// a false negative but never aborts a scan.
    pub fn with_patterns<S: AsRef<str>>(extra: &[S]) -> Self {
        let patterns: Vec<String> = DEFAULT_PATTERNS
            .iter()
            .map(|p| (*p).to_string())
            .chain(extra.iter().map(|p| p.as_ref().to_string()))
            .collect();
        Self::from_pattern_list(patterns)
    }

    /// Matcher for a scan of `root`: defaults, then `.scoutignore` patterns
    /// found at the root, then caller patterns.
    pub fn for_root<S: AsRef<str>>(root: &Path, caller: &[S]) -> Self {
        let mut patterns: Vec<String> =
            DEFAULT_PATTERNS.iter().map(|p| (*p).to_string()).collect();
        patterns.extend(load_project_patterns(root));
        patterns.extend(caller.iter().map(|p| p.as_ref().to_string()));
        Self::from_pattern_list(patterns)
    }

    fn from_pattern_list(patterns: Vec<String>) -> Self {
        let mut path_builder = GlobSetBuilder::new();
        let mut segment_builder = GlobSetBuilder::new();
        let mut dir_builder = GlobSetBuilder::new();

        for pattern in &patterns {
            let normalized = pattern.replace('\\', "/");
            if let Some(stripped) = normalized.strip_suffix('/') {
                match Glob::new(stripped) {
                    Ok(glob) => {
                        dir_builder.add(glob);
                    }
                    Err(err) => warn!(pattern = %pattern, %err, "skipping malformed ignore pattern"),
                }
                continue;
            }
            match Glob::new(&normalized) {
                Ok(glob) => {
                    path_builder.add(glob.clone());
                    segment_builder.add(glob);
                }
                Err(err) => warn!(pattern = %pattern, %err, "skipping malformed ignore pattern"),
            }
        }

        // An empty set matches nothing, so build failures degrade to
        // "ignore nothing" rather than failing the caller.
        let empty = || GlobSetBuilder::new().build().expect("empty globset");
        Self {
            patterns,
            path_set: path_builder.build().unwrap_or_else(|_| empty()),
            segment_set: segment_builder.build().unwrap_or_else(|_| empty()),
            dir_set: dir_builder.build().unwrap_or_else(|_| empty()),
        }
    }

    /// Decide whether a (relative) path is excluded from the scan.
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        let normalized = normalized.trim_end_matches('/');

        if self.path_set.is_match(normalized) {
            return true;
        }

        for component in Path::new(normalized).components() {
            if let Component::Normal(segment) = component {
                if self.segment_set.is_match(segment.to_string_lossy().as_ref()) {
                    return true;
                }
            }
        }

        is_dir && self.dir_set.is_match(normalized)
    }

    /// The full ordered pattern list this matcher was built from.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Read extra ignore patterns from a `.scoutignore` file at the project
/// root. Missing or unreadable files yield no patterns.
pub fn load_project_patterns(root: &Path) -> Vec<String> {
    let path: PathBuf = root.join(PROJECT_IGNORE_FILE);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Vec::new();
    };
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
