//! # In-Memory Storage Primitives
//!
//! [`MemoryStore`] is the thread-safe map behind the in-memory system and
//! workflow stores. [`LockTable`] hands out one mutex per key so that
//! mutations of a single system or workflow are linearized while other keys
//! proceed concurrently.
//!
//! Both use `parking_lot` locks. They are never held across blocking I/O,
//! and a panicking holder does not poison them.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{ArcMutexGuard, Mutex, RawMutex, RwLock};

/// Thread-safe, cloneable key-value map. Clones share the same data.
#[derive(Debug)]
pub struct MemoryStore<K, V> {
    data: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Clone for MemoryStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> MemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.data.write().insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.data.read().get(key).cloned()
    }

    pub fn list(&self) -> Vec<V> {
        self.data.read().values().cloned().collect()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.data.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One mutex per key, created on first use and dropped once the last
/// holder or waiter releases it.
#[derive(Debug)]
pub struct LockTable<K> {
    locks: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> LockTable<K> {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Block until `key` is free and hold it until the guard drops.
    pub fn lock(&self, key: &K) -> KeyGuard<'_, K> {
        // The table lock is released before waiting on the key.
        let mutex = Arc::clone(self.locks.lock().entry(key.clone()).or_default());
        KeyGuard {
            table: self,
            key: key.clone(),
            guard: Some(mutex.lock_arc()),
        }
    }

    /// Number of keys currently held or waited on.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone> Default for LockTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive hold on one key of a [`LockTable`].
pub struct KeyGuard<'a, K: Eq + Hash + Clone> {
    table: &'a LockTable<K>,
    key: K,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl<K: Eq + Hash + Clone> Drop for KeyGuard<'_, K> {
    fn drop(&mut self) {
        let mut locks = self.table.locks.lock();
        self.guard.take();
        // Waiters hold a clone of the Arc, so a count of 1 means the table's
        // own entry is the last reference.
        if locks.get(&self.key).is_some_and(|m| Arc::strong_count(m) == 1) {
            locks.remove(&self.key);
        }
    }
}

impl<K: Eq + Hash + Clone> std::fmt::Debug for KeyGuard<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGuard").finish_non_exhaustive()
    }
}
