/// Binding cache: per-MemberKey memoized resolution.
///
/// Resolution is lazy and happens on the first call for a key. Entries are
/// never invalidated or evicted; bindings do not change while one engine
/// instance runs.
///
/// Concurrent first callers may each run the resolver. The first successful
/// result to reach the write lock is stored; later duplicates are discarded,
/// so every caller ends up with one complete binding. Failed resolutions are
/// never stored: the next call asks the native side again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use rustc_hash::FxHashMap;
use crate::binding::member::{MemberKey, ResolvedBinding};
use crate::binding::symbol_resolver::SymbolResolver;
use crate::error::Result;

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls answered from the cache
    pub hits: u64,
    /// Calls that had to ask the resolver
    pub misses: u64,
    /// Successful resolver calls (can exceed entries under races)
    pub resolutions: u64,
    /// Failed resolver calls
    pub failures: u64,
}

#[derive(Default)]
struct StatsTracker {
    hits: AtomicU64,
    misses: AtomicU64,
    resolutions: AtomicU64,
    failures: AtomicU64,
}

impl StatsTracker {
    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

pub struct BindingCache {
    entries: RwLock<FxHashMap<MemberKey, Arc<ResolvedBinding>>>,
    stats: StatsTracker,
}

impl BindingCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            stats: StatsTracker::default(),
        }
    }

    /// Cached binding for `key`, resolving it on first use
    ///
    /// # Errors
    ///
    /// Resolver errors (`UnknownMember`, `IncompatibleAbi`) are returned
    /// as-is and not cached. A poisoned lock yields `Error::BackendError`.
    pub fn get_or_resolve(&self, key: &MemberKey, resolver: &SymbolResolver) -> Result<Arc<ResolvedBinding>> {
        if let Some(binding) = self.get(key)? {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(binding);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);

        // Resolve outside the lock; the resolver may be slow.
        let resolved = match resolver.resolve(key) {
            Ok(resolved) => resolved,
            Err(err) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        };
        self.stats.resolutions.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write()
            .map_err(|_| crate::bridge_err!("galaxy3d::BindingCache", "Binding cache lock poisoned"))?;
        let stored = entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(resolved));
        Ok(Arc::clone(stored))
    }

    /// Cached binding for `key` without resolving
    pub fn get(&self, key: &MemberKey) -> Result<Option<Arc<ResolvedBinding>>> {
        let entries = self.entries.read()
            .map_err(|_| crate::bridge_err!("galaxy3d::BindingCache", "Binding cache lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    pub fn contains(&self, key: &MemberKey) -> bool {
        self.entries.read().map(|entries| entries.contains_key(key)).unwrap_or(false)
    }

    /// Number of cached bindings
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}

impl Default for BindingCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "binding_cache_tests.rs"]
mod tests;
