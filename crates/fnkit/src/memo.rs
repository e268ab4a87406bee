//! Bounded memoization.
//!
//! `MemoCache` maps a derived key to a previously computed result. It keeps
//! a usage counter of stored entries; when a new entry would be stored with
//! the counter already at `max_entries`, the whole cache is cleared first.
//! There is no per-entry eviction, so after the bound is crossed an old key
//! is not guaranteed to hit again.
//!
//! There is no global cache. Either pass a `MemoCache` to each call of a
//! `Memoized` function, or let a `Memo` own one. A `Memo` keeps its cache in
//! a `RefCell`, which makes it `!Sync`; callers that want sharing decide
//! how to share it.

use std::cell::RefCell;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Entry bound used when no configuration is given.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Cache options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Stored entries before a full clear. Always at least 1.
    pub max_entries: usize,
}

impl CacheConfig {
    pub fn new() -> CacheConfig {
        CacheConfig {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn max_entries(mut self, max_entries: usize) -> CacheConfig {
        self.max_entries = max_entries.max(1);
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit/miss/eviction counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Full clears triggered by the entry bound.
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// A bounded key to value store with full-clear eviction.
#[derive(Clone, Debug)]
pub struct MemoCache<K, V> {
    entries: FxHashMap<K, V>,
    max_entries: usize,
    usage: usize,
    stats: CacheStats,
}

impl<K: Hash + Eq, V: Clone> MemoCache<K, V> {
    pub fn new(config: CacheConfig) -> Self {
        MemoCache {
            entries: FxHashMap::default(),
            max_entries: config.max_entries.max(1),
            usage: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self::new(CacheConfig::new().max_entries(max_entries))
    }

    /// Looks up `key`, recording a hit or a miss.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.stats.hits += 1;
                Some(value.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Looks up `key` without touching the counters.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores a result, clearing everything first if the bound is reached.
    pub fn insert(&mut self, key: K, value: V) {
        if self.usage >= self.max_entries {
            log::debug!(
                "memo cache reached {} entries, clearing {} cached results",
                self.max_entries,
                self.entries.len()
            );
            self.entries.clear();
            self.usage = 0;
            self.stats.evictions += 1;
        }
        self.entries.insert(key, value);
        self.usage += 1;
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Drops every entry and resets the usage counter. Stats are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.usage = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries stored since the last clear.
    pub fn usage(&self) -> usize {
        self.usage
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<K: Hash + Eq, V: Clone> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// A pure function paired with a key derivation. The cache is supplied at
/// each call.
pub struct Memoized<A, K, R> {
    f: Box<dyn Fn(&A) -> R>,
    key: Box<dyn Fn(&A) -> K>,
}

impl<A, K: Hash + Eq, R: Clone> Memoized<A, K, R> {
    pub fn new(f: impl Fn(&A) -> R + 'static, key: impl Fn(&A) -> K + 'static) -> Self {
        Memoized {
            f: Box::new(f),
            key: Box::new(key),
        }
    }

    /// Returns the cached result for `arg`'s key, or runs the function.
    pub fn call(&self, cache: &mut MemoCache<K, R>, arg: &A) -> R {
        let key = (self.key)(arg);
        if let Some(hit) = cache.get(&key) {
            return hit;
        }
        let result = (self.f)(arg);
        cache.insert(key, result.clone());
        result
    }
}

impl<A, R> Memoized<A, A, R>
where
    A: Hash + Eq + Clone + 'static,
    R: Clone + 'static,
{
    /// Keys on the argument itself.
    pub fn by_value(f: impl Fn(&A) -> R + 'static) -> Self {
        Memoized::new(f, |arg: &A| arg.clone())
    }
}

type Recursive<A, R> = Box<dyn Fn(&dyn Fn(&A) -> R, &A) -> R>;

/// A memoized function that owns its cache.
///
/// The cache borrow is released while the wrapped function runs, so the
/// function may recurse through the handle it is given.
pub struct Memo<A, K, R> {
    f: Recursive<A, R>,
    key: Box<dyn Fn(&A) -> K>,
    cache: RefCell<MemoCache<K, R>>,
}

impl<A, K: Hash + Eq, R: Clone> Memo<A, K, R> {
    pub fn new(
        f: impl Fn(&dyn Fn(&A) -> R, &A) -> R + 'static,
        key: impl Fn(&A) -> K + 'static,
        config: CacheConfig,
    ) -> Self {
        Memo {
            f: Box::new(f),
            key: Box::new(key),
            cache: RefCell::new(MemoCache::new(config)),
        }
    }

    /// Replaces the cache with an empty one built from `config`.
    pub fn with_config(self, config: CacheConfig) -> Self {
        Memo {
            cache: RefCell::new(MemoCache::new(config)),
            ..self
        }
    }

    pub fn call(&self, arg: &A) -> R {
        let key = (self.key)(arg);
        let cached = self.cache.borrow_mut().get(&key);
        if let Some(hit) = cached {
            return hit;
        }
        let recurse = |inner: &A| self.call(inner);
        let result = (self.f)(&recurse, arg);
        self.cache.borrow_mut().insert(key, result.clone());
        result
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }
}

/// Memoizes `f`, keyed on the argument.
pub fn memoize<A, R>(f: impl Fn(&A) -> R + 'static) -> Memo<A, A, R>
where
    A: Hash + Eq + Clone + 'static,
    R: Clone + 'static,
{
    Memo::new(move |_, arg: &A| f(arg), |arg: &A| arg.clone(), CacheConfig::default())
}

/// Memoizes `f`, keyed by `key`.
pub fn memoize_by<A, K, R>(
    f: impl Fn(&A) -> R + 'static,
    key: impl Fn(&A) -> K + 'static,
) -> Memo<A, K, R>
where
    A: 'static,
    K: Hash + Eq + 'static,
    R: Clone + 'static,
{
    Memo::new(move |_, arg: &A| f(arg), key, CacheConfig::default())
}

/// Memoizes a function that calls itself through the handle it receives.
pub fn memoize_recursive<A, R>(f: impl Fn(&dyn Fn(&A) -> R, &A) -> R + 'static) -> Memo<A, A, R>
where
    A: Hash + Eq + Clone + 'static,
    R: Clone + 'static,
{
    Memo::new(f, |arg: &A| arg.clone(), CacheConfig::default())
}
