//! Bounded memo of oracle values keyed by canonical position.
//!
//! [`EvaluationCache`] is a plain owned value for single-threaded use.
//! [`SharedEvaluationCache`] wraps one behind `Arc<Mutex<..>>` so several
//! searches can amortize oracle calls across threads.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

/// Counters describing cache traffic since construction or the last `clear`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Storage used by the evaluation step of the search.
pub trait ValueCache {
    fn lookup(&mut self, key: &str) -> Option<f64>;

    /// Inserts `value`, evicting one entry first when the cache is full.
    fn store(&mut self, key: String, value: f64);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn stats(&self) -> CacheStats;
}

impl<C: ValueCache + ?Sized> ValueCache for &mut C {
    fn lookup(&mut self, key: &str) -> Option<f64> {
        (**self).lookup(key)
    }

    fn store(&mut self, key: String, value: f64) {
        (**self).store(key, value)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn stats(&self) -> CacheStats {
        (**self).stats()
    }
}

/// Least-recently-used evaluation cache with a fixed capacity.
#[derive(Debug)]
pub struct EvaluationCache {
    entries: LruCache<String, f64>,
    stats: CacheStats,
}

impl EvaluationCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Like [`EvaluationCache::new`] but returns `None` for a zero capacity.
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(Self::new)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}

impl ValueCache for EvaluationCache {
    fn lookup(&mut self, key: &str) -> Option<f64> {
        match self.entries.get(key) {
            Some(value) => {
                self.stats.hits += 1;
                Some(*value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    fn store(&mut self, key: String, value: f64) {
        if let Some((evicted, _)) = self.entries.push(key, value) {
            // `push` also hands back the old value when the key was already present.
            if !self.entries.contains(&evicted) {
                self.stats.evictions += 1;
                log::trace!("Evicted cached evaluation for {}", evicted);
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Thread-safe handle to one [`EvaluationCache`]. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct SharedEvaluationCache {
    inner: Arc<Mutex<EvaluationCache>>,
}

impl SharedEvaluationCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::from_cache(EvaluationCache::new(capacity))
    }

    pub fn from_cache(cache: EvaluationCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EvaluationCache> {
        // A panic while holding the lock cannot leave a half-written entry, so
        // the cache stays usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ValueCache for SharedEvaluationCache {
    fn lookup(&mut self, key: &str) -> Option<f64> {
        self.lock().lookup(key)
    }

    fn store(&mut self, key: String, value: f64) {
        self.lock().store(key, value);
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    fn stats(&self) -> CacheStats {
        self.lock().stats()
    }
}
