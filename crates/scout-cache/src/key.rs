//! Cache keys derived from scan parameters.

use scout_core::ScanParams;

/// Content-addressed identity of a scan.
///
/// The key is a blake3 hash over the canonical form of the parameters,
/// so two parameter sets that differ only in ignore-pattern order map to
/// the same cache entry. The hash is computed over the raw fields rather
/// than a serialized form, which keeps non-UTF-8 roots addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_params(params: &ScanParams) -> Self {
        let canonical = params.canonical();
        let mut hasher = blake3::Hasher::new();

        hasher.update(canonical.root.as_os_str().as_encoded_bytes());
        hasher.update(&[0]);
        hasher.update(&[canonical.recursive as u8]);
        match canonical.max_depth {
            Some(depth) => {
                hasher.update(&[1]);
                hasher.update(&depth.to_le_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }
        for pattern in &canonical.ignore_patterns {
            hasher.update(pattern.as_bytes());
            hasher.update(&[0]);
        }

        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the entry holding this key's snapshot.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
