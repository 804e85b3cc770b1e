//! Per-route match memoization

use dashmap::DashMap;

use viaduct_core::Params;

/// Number of memoized request strings per route.
pub const DEFAULT_CACHE_CAPACITY: usize = 250;

/// Bounded read-through memo of raw request strings to match results.
///
/// Entries are immutable once computed, so a racy duplicate recompute
/// is harmless and reads stay lock-free. At capacity the map is
/// dropped wholesale rather than evicted entry by entry.
#[derive(Debug)]
pub(crate) struct MatchCache {
    entries: DashMap<String, Option<Params>>,
    capacity: usize,
}

impl MatchCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    /// Look up a key, computing and memoizing the result on a miss.
    pub(crate) fn get_or_compute(
        &self,
        key: &str,
        compute: impl FnOnce() -> Option<Params>,
    ) -> Option<Params> {
        if let Some(hit) = self.entries.get(key) {
            return hit.clone();
        }
        let value = compute();
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(key.to_string(), value.clone());
        value
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
