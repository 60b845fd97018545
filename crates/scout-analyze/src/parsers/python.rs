//! Pattern-matching parser for Python sources.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::{ParseError, SourceParser};
use crate::types::{Dependency, DependencyKind, FileDependencies};

static IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*import[ \t]+([\w.]+(?:[ \t]*,[ \t]*[\w.]+)*)").unwrap());

static FROM_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*from[ \t]+(\.*[\w.]*)[ \t]+import[ \t]+(.+)$").unwrap());

static EXPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:def|class)[ \t]+(\w+)").unwrap());

static CLASS_BASES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^class[ \t]+\w+[ \t]*\(([^)]*)\)").unwrap());

/// Best-effort parser: line-anchored regexes over the raw text. Less
/// precise than a real grammar (a multi-line string containing an import
/// statement fools it), which is an accepted trade for zero parse
/// failures.
pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for PythonParser {
    fn can_handle(&self, extension: &str) -> bool {
        extension == "py"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<FileDependencies, ParseError> {
        let mut imports = Vec::new();

        for caps in IMPORT_RE.captures_iter(content) {
            let all = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let line = line_of(content, all);
            for module in caps[1].split(',') {
                let module = module.trim();
                if module.is_empty() {
                    continue;
                }
                imports.push(Dependency {
                    source_file: path.to_path_buf(),
                    target_file: module_file(module, None),
                    kind: DependencyKind::Import,
                    line_number: line,
                    symbol: CompactString::from(module),
                    resolved: false,
                });
            }
        }

        for caps in FROM_IMPORT_RE.captures_iter(content) {
            let line = line_of(content, caps.get(0).map(|m| m.start()).unwrap_or(0));
            let module = caps[1].trim_matches('.');
            for name in caps[2].split(',') {
                let name = name
                    .trim()
                    .trim_start_matches('(')
                    .trim_end_matches(')')
                    .trim();
                let name = name.split_whitespace().next().unwrap_or("");
                if name.is_empty() || (name == "*" && module.is_empty()) {
                    continue;
                }
                imports.push(Dependency {
                    source_file: path.to_path_buf(),
                    target_file: module_file(module, Some(name)),
                    kind: DependencyKind::FromImport,
                    line_number: line,
                    symbol: CompactString::from(name),
                    resolved: false,
                });
            }
        }

        // Base classes are dependency edges but not import statements.
        let mut inherits = Vec::new();
        for caps in CLASS_BASES_RE.captures_iter(content) {
            let line = line_of(content, caps.get(0).map(|m| m.start()).unwrap_or(0));
            for base in caps[1].split(',') {
                let base = base.trim();
                if base.is_empty() || base == "object" || base.contains('=') {
                    continue;
                }
                let name = base.rsplit('.').next().unwrap_or(base);
                inherits.push(Dependency {
                    source_file: path.to_path_buf(),
                    target_file: module_file(base, None),
                    kind: DependencyKind::Inherit,
                    line_number: line,
                    symbol: CompactString::from(name),
                    resolved: false,
                });
            }
        }

        let exports: BTreeSet<CompactString> = EXPORT_RE
            .captures_iter(content)
            .map(|caps| CompactString::from(&caps[1]))
            .collect();

        let mut dependencies = imports.clone();
        dependencies.append(&mut inherits);

        Ok(FileDependencies {
            file_path: path.to_path_buf(),
            imports,
            exports,
            dependencies,
        })
    }
}

/// Guess the file a module name refers to: dots become separators,
/// `.py` is appended. A purely relative `from . import x` falls back to
/// the imported name itself.
fn module_file(module: &str, name: Option<&str>) -> PathBuf {
    if module.is_empty() {
        let name = name.unwrap_or_default();
        return PathBuf::from(format!("{name}.py"));
    }
    PathBuf::from(format!("{}.py", module.replace('.', "/")))
}

fn line_of(content: &str, offset: usize) -> u32 {
    content[..offset].matches('\n').count() as u32 + 1
}
