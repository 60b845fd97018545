//! Cache-aware scanning.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Instant, SystemTime};

use tracing::{debug, warn};

use scout_core::{
    ChangeSummary, PatternMatcher, ScanError, ScanParams, ScanReport, ScanWarning, WarningKind,
};
use scout_scan::{ProgressReporter, Scanner};

use crate::cache::{CacheEntry, ScanCache};
use crate::key::CacheKey;

/// Difference between a cached mtime snapshot and the tree on disk.
#[derive(Debug, Default)]
struct TimestampDelta {
    new: Vec<PathBuf>,
    changed: Vec<PathBuf>,
    deleted: Vec<PathBuf>,
}

impl TimestampDelta {
    fn diff(
        cached: &BTreeMap<PathBuf, SystemTime>,
        current: &BTreeMap<PathBuf, SystemTime>,
    ) -> Self {
        let mut delta = Self::default();
        for (path, mtime) in current {
            match cached.get(path) {
                None => delta.new.push(path.clone()),
                // Only a forward-moving mtime counts as a change; a restore
                // that rewinds timestamps leaves the snapshot authoritative.
                Some(old) if mtime > old => delta.changed.push(path.clone()),
                Some(_) => {}
            }
        }
        for path in cached.keys() {
            if !current.contains_key(path) {
                delta.deleted.push(path.clone());
            }
        }
        delta
    }

    fn is_empty(&self) -> bool {
        self.new.is_empty() && self.changed.is_empty() && self.deleted.is_empty()
    }

    fn summary(&self) -> ChangeSummary {
        ChangeSummary {
            new: self.new.len() as u64,
            changed: self.changed.len() as u64,
            deleted: self.deleted.len() as u64,
        }
    }
}

/// Scanner front end that answers from cache when the tree is unchanged
/// and patches the cached result when it is not.
///
/// Lookup order:
/// 1. no entry for the parameters: full walk, store, fresh report
/// 2. entry present, no mtime differences: cached result verbatim
/// 3. entry present, differences: cached result updated structurally
///    from the diff, entry rewritten
///
/// Cache write failures never fail the scan; they surface as warnings
/// on the report.
pub struct CachedScanner {
    scanner: Scanner,
    cache: ScanCache,
}

impl CachedScanner {
    pub fn new(scanner: Scanner, cache: ScanCache) -> Self {
        Self { scanner, cache }
    }

    pub fn cache(&self) -> &ScanCache {
        &self.cache
    }

    pub fn scan(
        &self,
        params: &ScanParams,
        matcher: &PatternMatcher,
        reporter: &mut ProgressReporter,
    ) -> Result<ScanReport, ScanError> {
        let started = Instant::now();
        let key = CacheKey::for_params(params);

        let Some(entry) = self.cache.load(&key) else {
            return self.full_scan(params, matcher, reporter, &key, started);
        };

        let current = self.scanner.collect_timestamps(params, matcher)?;
        let delta = TimestampDelta::diff(&entry.file_timestamps, &current);

        if delta.is_empty() {
            debug!(key = %key, "cache hit, tree unchanged");
            return Ok(ScanReport {
                result: entry.result,
                cached: true,
                incremental: false,
                delta: ChangeSummary::default(),
                scan_time: started.elapsed(),
                warnings: Vec::new(),
            });
        }

        debug!(
            key = %key,
            new = delta.new.len(),
            changed = delta.changed.len(),
            deleted = delta.deleted.len(),
            "cache hit, applying incremental update"
        );

        let mut result = entry.result;
        for path in &delta.deleted {
            result.remove_file(path);
        }
        for path in &delta.new {
            result.insert_file_with_ancestors(path.clone());
        }
        // Changed files keep their place; only their mtimes move.

        let mut warnings = Vec::new();
        let updated = CacheEntry::new(params, current, result.clone());
        if let Err(err) = self.cache.store(&key, &updated) {
            warn!(%err, "failed to update cache entry");
            warnings.push(ScanWarning::new(
                self.cache.cache_dir(),
                err.to_string(),
                WarningKind::CacheError,
            ));
        }

        Ok(ScanReport {
            result,
            cached: true,
            incremental: true,
            delta: delta.summary(),
            scan_time: started.elapsed(),
            warnings,
        })
    }

    /// Drop all cached entries. Returns how many were removed.
    pub fn clear_cache(&self) -> Result<usize, crate::cache::CacheError> {
        self.cache.clear()
    }

    fn full_scan(
        &self,
        params: &ScanParams,
        matcher: &PatternMatcher,
        reporter: &mut ProgressReporter,
        key: &CacheKey,
        started: Instant,
    ) -> Result<ScanReport, ScanError> {
        let output = self.scanner.scan(params, matcher, reporter)?;
        let mut warnings = output.warnings;

        let entry = CacheEntry::new(params, output.file_timestamps, output.result.clone());
        if let Err(err) = self.cache.store(key, &entry) {
            warn!(%err, "failed to store cache entry");
            warnings.push(ScanWarning::new(
                self.cache.cache_dir(),
                err.to_string(),
                WarningKind::CacheError,
            ));
        }

        Ok(ScanReport::fresh(output.result, started.elapsed(), warnings))
    }
}
