//! # Result Caches
//!
//! The engines memoize their results in a string-keyed cache. The cache is
//! injected through the service constructor as `Arc<dyn Cache<V>>`, so a
//! caller can pick an unbounded map, a bounded LRU, or its own backing
//! store.
//!
//! Both implementations here are synchronous: the locks are `parking_lot`,
//! never held across an `.await`, and non-poisoning.
//!
//! Values are cloned out on read. In-place mutation goes through
//! [`Cache::update`], which runs the closure under the write lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// String-keyed result cache.
pub trait Cache<V>: Send + Sync {
    /// Retrieve a clone of the value stored under `key`.
    fn get(&self, key: &str) -> Option<V>;

    /// Whether `key` is present. Does not count as a use.
    fn contains_key(&self, key: &str) -> bool;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: String, value: V);

    /// Mutate the value under `key` in place.
    ///
    /// Returns `false` without calling `f` if the key is absent.
    fn update(&self, key: &str, f: &mut dyn FnMut(&mut V)) -> bool;

    /// Remove and return the value under `key`.
    fn remove(&self, key: &str) -> Option<V>;

    /// Clones of every stored value, in no particular order.
    fn values(&self) -> Vec<V>;

    /// Drop every entry.
    fn clear(&self);

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// MemoryCache
// ---------------------------------------------------------------------------

/// Unbounded in-memory cache. Grows until [`Cache::clear`] is called.
#[derive(Debug)]
pub struct MemoryCache<V> {
    data: Arc<RwLock<HashMap<String, V>>>,
}

impl<V> Clone for MemoryCache<V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<V> MemoryCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.data.read().get(key).cloned()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    fn set(&self, key: String, value: V) {
        self.data.write().insert(key, value);
    }

    fn update(&self, key: &str, f: &mut dyn FnMut(&mut V)) -> bool {
        match self.data.write().get_mut(key) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    fn remove(&self, key: &str) -> Option<V> {
        self.data.write().remove(key)
    }

    fn values(&self) -> Vec<V> {
        self.data.read().values().cloned().collect()
    }

    fn clear(&self) {
        self.data.write().clear();
    }

    fn len(&self) -> usize {
        self.data.read().len()
    }
}

// ---------------------------------------------------------------------------
// LruCache
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct LruInner<V> {
    entries: HashMap<String, (V, u64)>,
    /// Recency tick → key. The smallest tick is the least recently used.
    order: BTreeMap<u64, String>,
    tick: u64,
}

impl<V> LruInner<V> {
    fn touch(&mut self, key: &str) {
        self.tick += 1;
        let tick = self.tick;
        if let Some((_, old)) = self.entries.get_mut(key) {
            self.order.remove(&*old);
            *old = tick;
            self.order.insert(tick, key.to_string());
        }
    }
}

/// Bounded cache evicting the least recently used entry.
///
/// Reads, writes and updates all count as a use.
#[derive(Debug)]
pub struct LruCache<V> {
    capacity: usize,
    inner: Mutex<LruInner<V>>,
}

impl<V> LruCache<V> {
    /// Create an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(LruInner {
                entries: HashMap::new(),
                order: BTreeMap::new(),
                tick: 0,
            }),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V: Clone + Send + Sync> Cache<V> for LruCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();
        let value = inner.entries.get(key).map(|(v, _)| v.clone())?;
        inner.touch(key);
        Some(value)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    fn set(&self, key: String, value: V) {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;
        if let Some((_, old)) = inner.entries.insert(key.clone(), (value, tick)) {
            inner.order.remove(&old);
        }
        inner.order.insert(tick, key);

        while inner.entries.len() > self.capacity {
            let Some((_, evicted)) = inner.order.pop_first() else {
                break;
            };
            inner.entries.remove(&evicted);
            tracing::debug!(key = %evicted, "evicted least recently used cache entry");
        }
    }

    fn update(&self, key: &str, f: &mut dyn FnMut(&mut V)) -> bool {
        let mut inner = self.inner.lock();
        match inner.entries.get_mut(key) {
            Some((value, _)) => f(value),
            None => return false,
        }
        inner.touch(key);
        true
    }

    fn remove(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();
        let (value, tick) = inner.entries.remove(key)?;
        inner.order.remove(&tick);
        Some(value)
    }

    fn values(&self) -> Vec<V> {
        self.inner
            .lock()
            .entries
            .values()
            .map(|(v, _)| v.clone())
            .collect()
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// SHA-256 hex digest of a value's JSON serialization.
///
/// Used to fold request options into a fixed-length cache key component.
/// Struct fields serialize in declaration order, so equal values (including
/// deep copies) always produce equal digests.
pub fn cache_digest<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}
