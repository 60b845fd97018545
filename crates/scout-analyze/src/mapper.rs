//! Codebase-wide dependency mapping.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use rayon::prelude::*;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use scout_core::{ScanWarning, WarningKind};

use crate::parser::ParserRegistry;
use crate::types::{DependencyMap, FileDependencies};

/// File name of the dependency store, conventionally placed in the scan
/// cache directory.
pub const DEPENDENCY_STORE_FILE: &str = "dependencies.json";

/// Failure writing the dependency store. Load failures never surface;
/// a missing or corrupt store reads as empty.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Dependency store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dependency store serialization failed: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

/// Result of a codebase analysis.
#[derive(Debug)]
pub struct AnalysisOutput {
    pub map: DependencyMap,
    /// Per-file failures recovered by skipping the file.
    pub warnings: Vec<ScanWarning>,
    /// Files a parser claimed and processed.
    pub files_analyzed: u64,
    /// Files no parser claimed.
    pub files_skipped: u64,
}

/// Maps import edges across a scanned file set.
///
/// Parsing dispatches per extension through a [`ParserRegistry`]; a
/// resolution pass then rewrites each edge's guessed target to a scanned
/// path when exactly one matches (same relative path, or a unique
/// basename). Everything else stays `resolved: false`.
pub struct DependencyMapper {
    registry: ParserRegistry,
}

impl DependencyMapper {
    pub fn new() -> Self {
        Self {
            registry: ParserRegistry::with_defaults(),
        }
    }

    pub fn with_registry(registry: ParserRegistry) -> Self {
        Self { registry }
    }

    /// Analyze one file, relative to `root`. Returns None when no parser
    /// claims the extension or when reading/parsing fails; failures are
    /// logged, never propagated.
    pub fn analyze_file(&self, root: &Path, file: &Path) -> Option<FileDependencies> {
        if !self.registry.supports(file) {
            return None;
        }
        match self.try_analyze(root, file) {
            Ok(deps) => Some(deps),
            Err(warning) => {
                debug!(path = %warning.path.display(), message = %warning.message, "skipping file");
                None
            }
        }
    }

    /// Analyze every parseable file in `files` (relative paths under
    /// `root`), in parallel, then resolve edge targets against the full
    /// file set.
    pub fn analyze_codebase(&self, root: &Path, files: &[PathBuf]) -> AnalysisOutput {
        let results: DashMap<PathBuf, FileDependencies> = DashMap::new();
        let failures: DashMap<PathBuf, ScanWarning> = DashMap::new();

        files
            .par_iter()
            .filter(|file| self.registry.supports(file))
            .for_each(|file| match self.try_analyze(root, file) {
                Ok(deps) => {
                    results.insert(file.clone(), deps);
                }
                Err(warning) => {
                    failures.insert(file.clone(), warning);
                }
            });

        let mut map: DependencyMap = results.into_iter().collect();
        let mut warnings: Vec<ScanWarning> = failures.into_iter().map(|(_, w)| w).collect();
        warnings.sort_by(|a, b| a.path.cmp(&b.path));

        let files_analyzed = map.len() as u64;
        let files_skipped = files.len() as u64 - files_analyzed - warnings.len() as u64;

        resolve_targets(&mut map, files);

        AnalysisOutput {
            map,
            warnings,
            files_analyzed,
            files_skipped,
        }
    }

    /// Files that directly depend on `target`. One hop, never transitive.
    pub fn get_impact_analysis(
        &self,
        target: &Path,
        map: &DependencyMap,
    ) -> std::collections::BTreeSet<PathBuf> {
        map.impact_of(target)
    }

    /// Write the map wholesale, atomically replacing any previous store.
    pub fn save(&self, map: &DependencyMap, path: &Path) -> Result<(), StoreError> {
        let Some(parent) = path.parent() else {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "store path has no parent directory",
                ),
            });
        };
        // A bare relative file name has an empty parent; treat it as the
        // current directory.
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };

        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(&mut tmp, map)
            .map_err(|source| StoreError::Serialize { source })?;
        tmp.persist(path).map_err(|err| StoreError::Io {
            path: path.to_path_buf(),
            source: err.error,
        })?;

        debug!(path = %path.display(), entries = map.len(), "saved dependency store");
        Ok(())
    }

    /// Read a previously saved map. Missing or undecodable stores read as
    /// empty rather than failing.
    pub fn load(&self, path: &Path) -> DependencyMap {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return DependencyMap::new();
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read dependency store");
                return DependencyMap::new();
            }
        };

        match serde_json::from_slice(&data) {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %path.display(), %err, "discarding undecodable dependency store");
                DependencyMap::new()
            }
        }
    }

    fn try_analyze(&self, root: &Path, file: &Path) -> Result<FileDependencies, ScanWarning> {
        let extension = file
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or_default();
        let parser = self
            .registry
            .parser_for(extension)
            .ok_or_else(|| ScanWarning::parse_error(file, "no parser for extension"))?;

        let content = fs::read_to_string(root.join(file))
            .map_err(|err| ScanWarning::read_error(file, &err))?;

        parser
            .parse(file, &content)
            .map_err(|err| ScanWarning {
                path: file.to_path_buf(),
                message: err.to_string(),
                kind: WarningKind::ParseError,
            })
    }
}

impl Default for DependencyMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite guessed edge targets to scanned paths. Exact relative-path
/// matches win; otherwise a basename shared with exactly one scanned
/// file. A file never resolves to itself.
fn resolve_targets(map: &mut DependencyMap, files: &[PathBuf]) {
    let mut by_name: BTreeMap<&OsStr, Vec<&PathBuf>> = BTreeMap::new();
    for file in files {
        if let Some(name) = file.file_name() {
            by_name.entry(name).or_default().push(file);
        }
    }
    let exact: std::collections::BTreeSet<&PathBuf> = files.iter().collect();

    for deps in map.values_mut() {
        for dep in deps
            .imports
            .iter_mut()
            .chain(deps.dependencies.iter_mut())
        {
            if dep.target_file == dep.source_file {
                continue;
            }
            if exact.contains(&dep.target_file) {
                dep.resolved = true;
                continue;
            }
            let Some(name) = dep.target_file.file_name() else {
                continue;
            };
            if let Some(candidates) = by_name.get(name) {
                if let [only] = candidates.as_slice() {
                    if **only != dep.source_file {
                        dep.target_file = (*only).clone();
                        dep.resolved = true;
                    }
                }
            }
        }
    }
}
