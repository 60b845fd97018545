//! Syntax-tree parser for Rust sources.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use compact_str::{CompactString, ToCompactString};
use syn::spanned::Spanned;

use crate::parser::{ParseError, SourceParser};
use crate::types::{Dependency, DependencyKind, FileDependencies};

/// Precise parser: walks the full grammar via `syn`, so it sees exactly
/// the `use` items and top-level definitions, never string look-alikes
/// inside comments or literals.
pub struct RustParser;

impl RustParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for RustParser {
    fn can_handle(&self, extension: &str) -> bool {
        extension == "rs"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<FileDependencies, ParseError> {
        let ast = syn::parse_file(content).map_err(|err| ParseError::new(err.to_string()))?;

        let mut imports = Vec::new();
        let mut inherits = Vec::new();
        let mut exports = BTreeSet::new();

        for item in &ast.items {
            match item {
                syn::Item::Use(item_use) => {
                    let line = item_use.span().start().line as u32;
                    collect_use_tree(&item_use.tree, None, path, line, &mut imports);
                }
                syn::Item::Fn(f) => {
                    exports.insert(f.sig.ident.to_compact_string());
                }
                syn::Item::Struct(s) => {
                    exports.insert(s.ident.to_compact_string());
                }
                syn::Item::Enum(e) => {
                    exports.insert(e.ident.to_compact_string());
                }
                syn::Item::Trait(t) => {
                    exports.insert(t.ident.to_compact_string());
                }
                syn::Item::Impl(item_impl) => {
                    if let Some((_, trait_path, _)) = &item_impl.trait_ {
                        if let Some(edge) = inherit_edge(trait_path, path, item_impl) {
                            inherits.push(edge);
                        }
                    }
                }
                _ => {}
            }
        }

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

/// Flatten one use tree into dependency edges, one per imported leaf.
/// The target guess is the first path segment as a sibling module file;
/// resolution later matches it against the scanned set.
fn collect_use_tree(
    tree: &syn::UseTree,
    root_segment: Option<&str>,
    source: &Path,
    line: u32,
    out: &mut Vec<Dependency>,
) {
    match tree {
        syn::UseTree::Path(use_path) => {
            let segment = use_path.ident.to_string();
            let root = root_segment.unwrap_or(&segment);
            let root = root.to_string();
            collect_use_tree(&use_path.tree, Some(&root), source, line, out);
        }
        syn::UseTree::Name(name) => {
            push_edge(root_segment, name.ident.to_compact_string(), source, line, out);
        }
        syn::UseTree::Rename(rename) => {
            push_edge(root_segment, rename.ident.to_compact_string(), source, line, out);
        }
        syn::UseTree::Glob(_) => {
            push_edge(root_segment, CompactString::from("*"), source, line, out);
        }
        syn::UseTree::Group(group) => {
            for item in &group.items {
                collect_use_tree(item, root_segment, source, line, out);
            }
        }
    }
}

/// `impl Trait for Type` records an inheritance-style edge on the
/// trait's defining module.
fn inherit_edge(
    trait_path: &syn::Path,
    source: &Path,
    item_impl: &syn::ItemImpl,
) -> Option<Dependency> {
    let first = trait_path.segments.first()?.ident.to_string();
    let symbol = trait_path.segments.last()?.ident.to_compact_string();
    Some(Dependency {
        source_file: source.to_path_buf(),
        target_file: PathBuf::from(format!("{first}.rs")),
        kind: DependencyKind::Inherit,
        line_number: item_impl.span().start().line as u32,
        symbol,
        resolved: false,
    })
}

fn push_edge(
    root_segment: Option<&str>,
    symbol: CompactString,
    source: &Path,
    line: u32,
    out: &mut Vec<Dependency>,
) {
    // A bare `use foo;` is a module import; anything deeper pulls a
    // symbol out of a module.
    let (module, kind) = match root_segment {
        Some(root) => (root.to_string(), DependencyKind::FromImport),
        None => (symbol.to_string(), DependencyKind::Import),
    };

    out.push(Dependency {
        source_file: source.to_path_buf(),
        target_file: PathBuf::from(format!("{module}.rs")),
        kind,
        line_number: line,
        symbol,
        resolved: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> FileDependencies {
        RustParser::new()
            .parse(Path::new("src/main.rs"), content)
            .unwrap()
    }

    #[test]
    fn test_use_items_become_imports() {
        let deps = parse("use helpers::parse;\nuse config;\n\nfn main() {}\n");

        assert_eq!(deps.imports.len(), 2);
        assert_eq!(deps.imports[0].target_file, Path::new("helpers.rs"));
        assert_eq!(deps.imports[0].kind, DependencyKind::FromImport);
        assert_eq!(deps.imports[0].symbol, "parse");
        assert_eq!(deps.imports[0].line_number, 1);
        assert_eq!(deps.imports[1].target_file, Path::new("config.rs"));
        assert_eq!(deps.imports[1].kind, DependencyKind::Import);
    }

    #[test]
    fn test_grouped_use_flattens() {
        let deps = parse("use helpers::{parse, render as draw, *};\n");

        let symbols: Vec<_> = deps.imports.iter().map(|d| d.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["parse", "render", "*"]);
        assert!(deps
            .imports
            .iter()
            .all(|d| d.target_file == Path::new("helpers.rs")));
    }

    #[test]
    fn test_top_level_items_become_exports() {
        let deps = parse(
            "fn run() {}\nstruct Config;\nenum Mode { A }\ntrait Render {}\nconst X: u8 = 0;\n",
        );

        assert!(deps.exports.contains("run"));
        assert!(deps.exports.contains("Config"));
        assert!(deps.exports.contains("Mode"));
        assert!(deps.exports.contains("Render"));
        assert!(!deps.exports.contains("X"));
    }

    #[test]
    fn test_trait_impl_becomes_inherit_edge() {
        let deps = parse("use render::Draw;\n\nstruct Shape;\n\nimpl Draw for Shape {}\n");

        let inherit: Vec<_> = deps
            .dependencies
            .iter()
            .filter(|d| d.kind == DependencyKind::Inherit)
            .collect();
        assert_eq!(inherit.len(), 1);
        assert_eq!(inherit[0].symbol, "Draw");
        assert_eq!(inherit[0].target_file, Path::new("Draw.rs"));
        // The use edge is an import; the impl edge is not.
        assert_eq!(deps.imports.len(), 1);
        assert_eq!(deps.dependencies.len(), 2);
    }

    #[test]
    fn test_comments_are_not_imports() {
        let deps = parse("// use fake::thing;\nfn main() {}\n");
        assert!(deps.imports.is_empty());
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let result = RustParser::new().parse(Path::new("bad.rs"), "fn main( {");
        assert!(result.is_err());
    }
}
