//! Result cache keyed by a digest of what was compared
//!
//! Measures are pure functions of their inputs, so a result can be reused
//! whenever the same measure sees the same two inputs under the same
//! filtering. Permutation p-values are random, but once computed they are
//! treated as the answer for that key.

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use simx_core::MeasureResult;
use std::fmt;

/// Hex SHA-256 digest of `(measure, input a, input b, filtered)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(measure_id: &str, input_a: &str, input_b: &str, filtered: bool) -> Self {
        let mut hasher = Sha256::new();
        for part in [measure_id, input_a, input_b] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hasher.update([filtered as u8]);
        CacheKey(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait ResultCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<MeasureResult>;
    fn put(&self, key: CacheKey, result: MeasureResult);
}

/// Session-scoped in-memory cache
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<AHashMap<CacheKey, MeasureResult>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<MeasureResult> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: CacheKey, result: MeasureResult) {
        self.entries.write().insert(key, result);
    }
}

/// Cache that never hits
pub struct NoCache;

impl ResultCache for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<MeasureResult> {
        None
    }

    fn put(&self, _key: CacheKey, _result: MeasureResult) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic() {
        let k1 = CacheKey::new("jaccard", "age:1-10", "age:11-20", true);
        let k2 = CacheKey::new("jaccard", "age:1-10", "age:11-20", true);
        assert_eq!(k1, k2);
        assert_eq!(k1.as_str().len(), 64);
    }

    #[test]
    fn test_key_distinguishes_parts() {
        let base = CacheKey::new("jaccard", "a", "b", true);
        assert_ne!(base, CacheKey::new("overlap", "a", "b", true));
        assert_ne!(base, CacheKey::new("jaccard", "b", "a", true));
        assert_ne!(base, CacheKey::new("jaccard", "a", "b", false));
        // length prefixes keep part boundaries apart
        assert_ne!(CacheKey::new("x", "ab", "c", true), CacheKey::new("x", "a", "bc", true));
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        let key = CacheKey::new("pearson", "x", "y", false);
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), MeasureResult::new(0.5, 0.01, 10, 10));
        assert_eq!(cache.get(&key).unwrap().score_value, 0.5);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_no_cache() {
        let cache = NoCache;
        let key = CacheKey::new("pearson", "x", "y", false);
        cache.put(key.clone(), MeasureResult::new(0.5, 0.01, 10, 10));
        assert!(cache.get(&key).is_none());
    }
}
