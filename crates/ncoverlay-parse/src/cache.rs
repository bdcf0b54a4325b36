use std::collections::VecDeque;

use crate::elements::EvaluatedMeta;

/// Default number of recent results kept.
pub const CACHE_CAPACITY: usize = 64;

/// Hit/miss counters for an [`EvaluationCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Bounded FIFO cache of evaluation results keyed by exact input.
///
/// Evaluation is deterministic, so a cached result is always current.
#[derive(Debug, Clone)]
pub struct EvaluationCache {
    entries: VecDeque<(String, EvaluatedMeta)>,
    capacity: usize,
    stats: CacheStats,
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            stats: CacheStats::default(),
        }
    }

    /// Return the cached result for `input`, or compute and store it.
    pub fn get_or_insert_with<F>(&mut self, input: &str, compute: F) -> EvaluatedMeta
    where
        F: FnOnce(&str) -> EvaluatedMeta,
    {
        if let Some(meta) = self.lookup(input) {
            self.stats.hits += 1;
            tracing::trace!(input, "evaluation cache hit");
            return meta;
        }

        self.stats.misses += 1;
        let meta = compute(input);
        self.insert(input, &meta);
        meta
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    fn lookup(&self, input: &str) -> Option<EvaluatedMeta> {
        self.entries
            .iter()
            .find(|(key, _)| key == input)
            .map(|(_, meta)| meta.clone())
    }

    /// Insert a result, evicting the oldest if full.
    fn insert(&mut self, input: &str, meta: &EvaluatedMeta) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((input.to_string(), meta.clone()));
        self.stats.size = self.entries.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> EvaluatedMeta {
        EvaluatedMeta {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_hit_after_miss() {
        let mut cache = EvaluationCache::new();
        let mut calls = 0;

        let first = cache.get_or_insert_with("a", |s| {
            calls += 1;
            titled(s)
        });
        let second = cache.get_or_insert_with("a", |s| {
            calls += 1;
            titled(s)
        });

        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                size: 1,
                hits: 1,
                misses: 1,
            }
        );
    }

    #[test]
    fn test_evicts_oldest() {
        let mut cache = EvaluationCache::with_capacity(2);
        for key in ["a", "b", "c"] {
            cache.get_or_insert_with(key, titled);
        }
        assert_eq!(cache.len(), 2);

        let mut recomputed = false;
        cache.get_or_insert_with("a", |s| {
            recomputed = true;
            titled(s)
        });
        assert!(recomputed);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let mut cache = EvaluationCache::with_capacity(0);
        cache.get_or_insert_with("a", titled);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = EvaluationCache::new();
        cache.get_or_insert_with("a", titled);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
