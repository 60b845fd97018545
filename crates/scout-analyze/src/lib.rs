//! Dependency analysis for scout.
//!
//! This crate turns a scanned file list into a cross-file dependency
//! graph and answers impact queries over it:
//!
//! - **Parsing** - per-extension dispatch to a syntax-tree parser (Rust)
//!   or pattern-matching parsers (Python, JavaScript/TypeScript)
//! - **Resolution** - guessed import targets rewritten to scanned paths
//! - **Impact analysis** - single-hop reverse dependency lookup
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use scout_analyze::DependencyMapper;
//! use scout_scan::{PatternMatcher, ProgressReporter, ScanParams, Scanner};
//!
//! let params = ScanParams::new("/path/to/project");
//! let matcher = PatternMatcher::with_patterns(&params.ignore_patterns);
//! let output = Scanner::new()
//!     .scan(&params, &matcher, &mut ProgressReporter::silent())
//!     .unwrap();
//!
//! let mapper = DependencyMapper::new();
//! let files: Vec<_> = output.result.files.iter().cloned().collect();
//! let analysis = mapper.analyze_codebase(&params.root, &files);
//!
//! for path in analysis.map.impact_of(Path::new("core/config.py")) {
//!     println!("would be impacted: {}", path.display());
//! }
//! ```

mod mapper;
mod parser;
mod parsers;
mod types;

pub use mapper::{AnalysisOutput, DependencyMapper, StoreError, DEPENDENCY_STORE_FILE};
pub use parser::{ParseError, ParserRegistry, SourceParser};
pub use parsers::{JsParser, PythonParser, RustParser};
pub use types::{Dependency, DependencyKind, DependencyMap, FileDependencies};
