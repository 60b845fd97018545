//! On-disk cache entries and their storage.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use scout_core::{ScanParams, ScanResult};

use crate::key::CacheKey;

/// Directory name used for a project's cache, relative to the scan root.
pub const DEFAULT_CACHE_DIR: &str = ".scout-cache";

/// Failure while writing or clearing cache state.
///
/// Read-side failures never surface as errors; a damaged or unreadable
/// entry is treated as a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache entry serialization failed: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

/// One cached scan: the parameters that produced it, the structural
/// result, and the mtime snapshot the next lookup diffs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When this entry was written.
    pub cache_time: DateTime<Utc>,
    /// Canonical parameters of the scan.
    pub params: ScanParams,
    /// Modification time of every file in the result, relative paths.
    pub file_timestamps: BTreeMap<PathBuf, SystemTime>,
    /// Discovered files and folders.
    pub result: ScanResult,
}

impl CacheEntry {
    pub fn new(
        params: &ScanParams,
        file_timestamps: BTreeMap<PathBuf, SystemTime>,
        result: ScanResult,
    ) -> Self {
        Self {
            cache_time: Utc::now(),
            params: params.canonical(),
            file_timestamps,
            result,
        }
    }
}

/// JSON-file cache, one entry file per [`CacheKey`].
///
/// Writes go through a temp file in the cache directory followed by a
/// rename, so a concurrently reading process sees either the old entry
/// or the new one, never a torn write.
#[derive(Debug, Clone)]
pub struct ScanCache {
    cache_dir: PathBuf,
}

impl ScanCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Cache stored inside the scanned tree under [`DEFAULT_CACHE_DIR`].
    /// The directory name is in the default ignore patterns, so the cache
    /// never shows up in its own scans.
    pub fn for_root(root: &Path) -> Self {
        Self::new(root.join(DEFAULT_CACHE_DIR))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }

    /// Load the entry for `key`. Read and decode errors degrade to a miss.
    pub fn load(&self, key: &CacheKey) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read cache entry, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&data) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(path = %path.display(), %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    /// Write `entry` under `key`, atomically replacing any previous entry.
    pub fn store(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(|source| CacheError::Io {
            path: self.cache_dir.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(&self.cache_dir).map_err(|source| CacheError::Io {
            path: self.cache_dir.clone(),
            source,
        })?;
        serde_json::to_writer(&mut tmp, entry)
            .map_err(|source| CacheError::Serialize { source })?;

        let path = self.entry_path(key);
        tmp.persist(&path).map_err(|err| CacheError::Io {
            path: path.clone(),
            source: err.error,
        })?;

        debug!(path = %path.display(), "stored cache entry");
        Ok(())
    }

    /// Remove all entry files. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.cache_dir.clone(),
                    source,
                });
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|source| CacheError::Io { path, source })?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
