//! Dependency graph types.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::Display;

/// How one file refers to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DependencyKind {
    /// Whole-module import.
    Import,
    /// Import of specific symbols out of a module.
    FromImport,
    /// Call into another file's symbol.
    Call,
    /// Type inheriting from another file's type.
    Inherit,
}

/// A single edge in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// File the reference appears in.
    pub source_file: PathBuf,
    /// Referenced file. Starts as the parser's best guess and is rewritten
    /// to a concrete scanned path during resolution when one matches.
    pub target_file: PathBuf,
    pub kind: DependencyKind,
    /// 1-based line of the referencing statement.
    pub line_number: u32,
    /// Imported or referenced symbol.
    pub symbol: CompactString,
    /// False whenever the target could not be mapped to a scanned file,
    /// e.g. a third-party module. Never a failure.
    pub resolved: bool,
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDependencies {
    pub file_path: PathBuf,
    /// Import statements, in source order.
    pub imports: Vec<Dependency>,
    /// Top-level symbols this file defines.
    pub exports: BTreeSet<CompactString>,
    /// Outgoing edges. Currently the imports; kept separate so richer
    /// edges (calls, inheritance) can be added without reshaping consumers.
    pub dependencies: Vec<Dependency>,
}

/// Codebase-wide dependency graph, keyed by relative file path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyMap {
    entries: BTreeMap<PathBuf, FileDependencies>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf, deps: FileDependencies) {
        self.entries.insert(path, deps);
    }

    pub fn get(&self, path: &Path) -> Option<&FileDependencies> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &FileDependencies)> {
        self.entries.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut FileDependencies> {
        self.entries.values_mut()
    }

    /// Files whose recorded dependencies reference `target`.
    ///
    /// Single-hop reverse lookup only; callers wanting transitive
    /// dependents iterate this themselves.
    pub fn impact_of(&self, target: &Path) -> BTreeSet<PathBuf> {
        self.entries
            .iter()
            .filter(|(_, deps)| deps.dependencies.iter().any(|d| d.target_file == target))
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl FromIterator<(PathBuf, FileDependencies)> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = (PathBuf, FileDependencies)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
