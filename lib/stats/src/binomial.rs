//! Memoized binomial coefficients
//!
//! The cache is a pure function table keyed by (n, k). Concurrent misses on
//! the same key compute the same value, so a racing overwrite is harmless.

use ahash::AHashMap;
use parking_lot::RwLock;

#[derive(Default)]
pub struct BinomialCache {
    values: RwLock<AHashMap<(u64, u64), f64>>,
}

impl BinomialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// n choose k as a float; 0 when k > n
    pub fn choose(&self, n: u64, k: u64) -> f64 {
        if k > n {
            return 0.0;
        }
        let k = k.min(n - k);
        if k == 0 {
            return 1.0;
        }
        if let Some(v) = self.values.read().get(&(n, k)) {
            return *v;
        }
        let value = binomial(n, k);
        self.values.write().insert((n, k), value);
        value
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

fn binomial(n: u64, k: u64) -> f64 {
    (1..=k).fold(1.0, |acc, i| acc * (n - k + i) as f64 / i as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_small_values() {
        let cache = BinomialCache::new();
        assert_eq!(cache.choose(4, 2), 6.0);
        assert_eq!(cache.choose(5, 0), 1.0);
        assert_eq!(cache.choose(5, 5), 1.0);
        assert_eq!(cache.choose(1, 2), 0.0);
        assert_eq!(cache.choose(10, 3), 120.0);
        assert_eq!(cache.choose(10, 7), 120.0);
    }

    #[test]
    fn test_memoized() {
        let cache = BinomialCache::new();
        cache.choose(100, 2);
        cache.choose(100, 98);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.choose(100, 2), 4950.0);
    }

    #[test]
    fn test_concurrent_population() {
        let cache = Arc::new(BinomialCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || (2..200).map(|n| cache.choose(n, 2)).sum::<f64>())
            })
            .collect();
        let sums: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(sums.iter().all(|s| *s == sums[0]));
        // C(2, 2) short-circuits without an entry
        assert_eq!(cache.len(), 197);
    }
}
