//! Cache Store Module
//!
//! Main cache engine: a case-insensitive key map with a fixed capacity
//! threshold, least-recently-used eviction on overflow, and synchronous
//! eviction notifications.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == Eviction Subscriber ==
/// Callback invoked once per eviction with the evicted key (original casing)
/// and a handle to the evicted value.
pub type EvictionSubscriber<V> = Box<dyn Fn(&str, &Arc<V>) + Send + Sync>;

// == Inner Store ==
/// Entry map plus counters, guarded by the engine mutex.
///
/// Keys are stored lowercased; the original casing lives on the entry.
#[derive(Debug)]
struct CacheStore<V> {
    /// Key-value storage, keyed by the lowercased key
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance counters
    stats: CacheStats,
    /// Use sequence, bumped on every read or write of any entry
    use_seq: u64,
}

impl<V> CacheStore<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            use_seq: 0,
        }
    }

    /// Looks up an entry, refreshing its recency on a hit.
    fn get(&mut self, key: &str) -> Result<Arc<V>> {
        let norm = key.to_lowercase();
        self.use_seq += 1;
        let seq = self.use_seq;

        match self.entries.get_mut(&norm) {
            Some(entry) => {
                entry.touch(seq);
                self.stats.record_hit();
                trace!(key = %entry.key, "cache hit");
                Ok(Arc::clone(&entry.value))
            }
            None => {
                self.stats.record_miss();
                trace!(key, "cache miss");
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_lowercase())
    }

    /// Replaces the value of an existing entry, refreshing its recency.
    ///
    /// Hands the value back when no entry matches, so the caller can take
    /// the insert path instead.
    fn replace_existing(&mut self, key: &str, value: V) -> std::result::Result<(), V> {
        let norm = key.to_lowercase();
        self.use_seq += 1;
        let seq = self.use_seq;

        match self.entries.get_mut(&norm) {
            Some(entry) => {
                entry.replace(value, seq);
                trace!(key = %entry.key, "entry updated");
                Ok(())
            }
            None => Err(value),
        }
    }

    /// Inserts a new entry stamped as used right now.
    ///
    /// The caller must have handled capacity already.
    fn insert_new(&mut self, key: String, value: V) {
        self.use_seq += 1;
        let seq = self.use_seq;
        let norm = key.to_lowercase();
        self.entries.insert(norm, CacheEntry::new(key, value, seq));
        self.stats.set_total_entries(self.entries.len());
    }

    /// Removes and returns the least-recently-used entry.
    ///
    /// Selection is a linear scan for the smallest `last_accessed`; entries
    /// sharing an identical timestamp are ordered by use sequence, so the
    /// one used longest ago always wins. Returns None on an empty map.
    fn evict_lru(&mut self) -> Option<CacheEntry<V>> {
        let victim_key = self
            .entries
            .values()
            .min_by(|a, b| {
                a.last_accessed
                    .cmp(&b.last_accessed)
                    .then(a.use_seq.cmp(&b.use_seq))
            })
            .map(|entry| entry.key.to_lowercase())?;

        let victim = self.entries.remove(&victim_key)?;
        self.stats.record_eviction();
        self.stats.set_total_entries(self.entries.len());
        Some(victim)
    }

    /// Removes an entry by key.
    fn remove(&mut self, key: &str) -> Result<()> {
        let norm = key.to_lowercase();
        if self.entries.remove(&norm).is_some() {
            self.stats.record_removal();
            self.stats.set_total_entries(self.entries.len());
            debug!(key, "entry removed");
            Ok(())
        } else {
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}

// == Shared State ==
struct Shared<V> {
    store: Mutex<CacheStore<V>>,
    subscribers: Mutex<Vec<EvictionSubscriber<V>>>,
    capacity: usize,
}

// == Cache ==
/// Thread-safe cache engine handle.
///
/// Keys compare case-insensitively ("Key" and "key" name the same entry).
/// The entry count never exceeds the capacity threshold fixed at
/// construction: inserting a new key into a full cache first evicts the
/// least-recently-used entry and notifies subscribers.
///
/// Cloning is cheap and produces a handle to the same engine, so a cache
/// can be shared across threads.
///
/// # Example
/// ```
/// use cacher::Cache;
///
/// let cache: Cache<u32> = Cache::new(2).unwrap();
/// cache.add("answer", 42).unwrap();
/// assert_eq!(*cache.get("ANSWER").unwrap(), 42);
/// ```
pub struct Cache<V> {
    inner: Arc<Shared<V>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Cache<V> {
    // == Constructor ==
    /// Creates a new cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Fails with `InvalidCapacity` when `capacity` is 0 — a zero-capacity
    /// cache would evict on every insert.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            inner: Arc::new(Shared {
                store: Mutex::new(CacheStore::new()),
                subscribers: Mutex::new(Vec::new()),
                capacity,
            }),
        })
    }

    // == Subscribe ==
    /// Registers a callback fired once per eviction, synchronously on the
    /// thread whose insert triggered it, after the victim is removed and
    /// before the new entry lands. Subscribers run in registration order.
    ///
    /// The engine lock is held during the callback: a subscriber must not
    /// call back into the same cache.
    pub fn on_evicted<F>(&self, callback: F)
    where
        F: Fn(&str, &Arc<V>) + Send + Sync + 'static,
    {
        lock(&self.inner.subscribers).push(Box::new(callback));
    }

    // == Get ==
    /// Retrieves a handle to the value stored under `key`.
    ///
    /// A successful lookup counts as a use and refreshes the entry's
    /// recency.
    ///
    /// # Errors
    /// Fails with `NotFound` when no entry matches the key.
    pub fn get(&self, key: &str) -> Result<Arc<V>> {
        lock(&self.inner.store).get(key)
    }

    // == Add ==
    /// Inserts a new entry, strictly: an existing key is never overwritten.
    ///
    /// If the cache is full, the least-recently-used entry is evicted first
    /// and subscribers are notified.
    ///
    /// # Errors
    /// Fails with `AlreadyExists` when the key (case-insensitive) is
    /// already present; the cache is left untouched and nothing is evicted.
    pub fn add(&self, key: impl Into<String>, value: V) -> Result<()> {
        let key = key.into();
        let mut store = lock(&self.inner.store);

        if store.contains(&key) {
            return Err(CacheError::AlreadyExists(key));
        }

        self.insert_locked(&mut store, key, value);
        Ok(())
    }

    // == Add Or Update ==
    /// Inserts or overwrites the entry under `key` (upsert).
    ///
    /// Overwriting an existing entry refreshes its recency and never
    /// evicts, since the entry count does not grow. Inserting a new key
    /// into a full cache evicts the least-recently-used entry first.
    pub fn add_or_update(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut store = lock(&self.inner.store);

        match store.replace_existing(&key, value) {
            Ok(()) => {}
            Err(value) => self.insert_locked(&mut store, key, value),
        }
    }

    // == Remove ==
    /// Removes the entry under `key`.
    ///
    /// Explicit removal fires no eviction notification.
    ///
    /// # Errors
    /// Fails with `NotFound` when no entry matches the key.
    pub fn remove(&self, key: &str) -> Result<()> {
        lock(&self.inner.store).remove(key)
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        lock(&self.inner.store).len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Capacity ==
    /// Returns the capacity threshold fixed at construction.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    // == Stats ==
    /// Returns a snapshot of the engine's counters.
    pub fn stats(&self) -> CacheStats {
        lock(&self.inner.store).stats()
    }

    // == Insert (locked) ==
    /// Shared insert path for `add` and `add_or_update`: evicts if the
    /// cache is full, notifies subscribers, then inserts. Runs entirely
    /// under the store lock, so the capacity bound holds at all times.
    fn insert_locked(&self, store: &mut CacheStore<V>, key: String, value: V) {
        if store.len() >= self.inner.capacity {
            if let Some(victim) = store.evict_lru() {
                debug!(key = %victim.key, "evicted least recently used entry");
                for subscriber in lock(&self.inner.subscribers).iter() {
                    subscriber(&victim.key, &victim.value);
                }
            }
        }

        store.insert_new(key, value);
    }
}

// == Lock Helper ==
/// Acquires a mutex, recovering the guard if a panicking thread poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
