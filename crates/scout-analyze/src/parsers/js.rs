//! Pattern-matching parser for JavaScript and TypeScript sources.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::{ParseError, SourceParser};
use crate::types::{Dependency, DependencyKind, FileDependencies};

/// `(pattern, symbol_group, module_group)`; a symbol group of 0 means
/// the module doubles as the symbol (side-effect import).
static IMPORT_PATTERNS: Lazy<Vec<(Regex, usize, usize)>> = Lazy::new(|| {
    vec![
        // ES modules
        (
            Regex::new(r#"import\s+\{([^}]*)\}\s+from\s+['"]([^'"]+)['"]"#).unwrap(),
            1,
            2,
        ),
        (
            Regex::new(r#"import\s+(\w+)\s+from\s+['"]([^'"]+)['"]"#).unwrap(),
            1,
            2,
        ),
        (Regex::new(r#"import\s+['"]([^'"]+)['"]"#).unwrap(), 0, 1),
        // CommonJS
        (
            Regex::new(r#"(?:const|let|var)\s+(\w+)\s*=\s*require\s*\(\s*['"]([^'"]+)['"]"#)
                .unwrap(),
            1,
            2,
        ),
    ]
});

static EXPORT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"export\s+(?:default\s+)?(?:const|let|var|function|class)\s+(\w+)").unwrap(),
        Regex::new(r"export\s*\{\s*([^}]+)\s*\}").unwrap(),
        Regex::new(r"module\.exports\s*=\s*(\w+)").unwrap(),
    ]
});

/// Best-effort parser shared by the JavaScript family. Same trade as the
/// Python one: regexes over raw text, no grammar.
pub struct JsParser;

impl JsParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for JsParser {
    fn can_handle(&self, extension: &str) -> bool {
        matches!(extension, "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs")
    }

    fn parse(&self, path: &Path, content: &str) -> Result<FileDependencies, ParseError> {
        let mut imports = Vec::new();

        for (pattern, symbol_group, module_group) in IMPORT_PATTERNS.iter() {
            for caps in pattern.captures_iter(content) {
                let line = line_of(content, caps.get(0).map(|m| m.start()).unwrap_or(0));
                let module = caps[*module_group].to_string();
                let symbol = if *symbol_group == 0 {
                    module.clone()
                } else {
                    caps[*symbol_group].to_string()
                };
                // Brace lists keep only the first name as the symbol.
                let symbol = symbol
                    .split(',')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_string();

                imports.push(Dependency {
                    source_file: path.to_path_buf(),
                    target_file: module_file(&module),
                    kind: DependencyKind::Import,
                    line_number: line,
                    symbol: CompactString::from(symbol),
                    resolved: false,
                });
            }
        }
        imports.sort_by_key(|d| d.line_number);

        let mut exports = BTreeSet::new();
        for pattern in EXPORT_PATTERNS.iter() {
            for caps in pattern.captures_iter(content) {
                for name in caps[1].split(',') {
                    let name = name.split_whitespace().next().unwrap_or("");
                    if !name.is_empty() {
                        exports.insert(CompactString::from(name));
                    }
                }
            }
        }

        Ok(FileDependencies {
            file_path: path.to_path_buf(),
            imports: imports.clone(),
            exports,
            dependencies: imports,
        })
    }
}

/// Guess the file a module specifier refers to. Relative specifiers lose
/// their `./` prefix; bare specifiers (packages) stay as-is and simply
/// never resolve.
fn module_file(module: &str) -> PathBuf {
    let module = module.strip_prefix("./").unwrap_or(module);
    if Path::new(module).extension().is_some() {
        PathBuf::from(module)
    } else {
        PathBuf::from(format!("{module}.js"))
    }
}

fn line_of(content: &str, offset: usize) -> u32 {
    content[..offset].matches('\n').count() as u32 + 1
}
