use parking_lot::{Condvar, Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Concurrent map from a quantized timestamp to a shared item.
///
/// Invariants:
/// - at most one item is ever stored per key, even when `get_or_create` races
/// - `oldest`/`newest` reflect the smallest/largest key present
/// - `discard_older_than` only ever trims a prefix of the key space
///
/// Lookups share a read lock; insertion, removal and eviction take the write
/// lock. The data-available signal is a coarse wake-up hint: consumers must
/// re-scan from the oldest key after waking.
pub struct TimeKeyedStore<T> {
    items: RwLock<BTreeMap<i64, Arc<T>>>,
    pending: Mutex<bool>,
    data_available: Condvar,
}

impl<T> Default for TimeKeyedStore<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            pending: Mutex::new(false),
            data_available: Condvar::new(),
        }
    }
}

impl<T> fmt::Debug for TimeKeyedStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.items.read();
        f.debug_struct("TimeKeyedStore")
            .field("len", &items.len())
            .field("oldest", &items.keys().next())
            .field("newest", &items.keys().next_back())
            .finish()
    }
}

impl<T> TimeKeyedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the item stored under `key`, creating a default one if absent.
    pub fn get_or_create(&self, key: i64) -> Arc<T>
    where
        T: Default,
    {
        if let Some(item) = self.items.read().get(&key) {
            return Arc::clone(item);
        }

        // Another writer may have inserted between dropping the read lock and
        // taking the write lock; the entry API re-checks under exclusion.
        let mut items = self.items.write();
        Arc::clone(items.entry(key).or_insert_with(|| Arc::new(T::default())))
    }

    pub fn get(&self, key: i64) -> Option<Arc<T>> {
        self.items.read().get(&key).cloned()
    }

    /// Register an item that was built outside the store.
    ///
    /// An item already stored under `key` is kept and returned instead.
    pub fn add(&self, key: i64, item: Arc<T>) -> Arc<T> {
        let mut items = self.items.write();
        Arc::clone(items.entry(key).or_insert(item))
    }

    pub fn oldest(&self) -> Option<(i64, Arc<T>)> {
        self.items
            .read()
            .first_key_value()
            .map(|(key, item)| (*key, Arc::clone(item)))
    }

    pub fn newest(&self) -> Option<(i64, Arc<T>)> {
        self.items
            .read()
            .last_key_value()
            .map(|(key, item)| (*key, Arc::clone(item)))
    }

    pub fn oldest_key(&self) -> Option<i64> {
        self.items.read().keys().next().copied()
    }

    pub fn newest_key(&self) -> Option<i64> {
        self.items.read().keys().next_back().copied()
    }

    /// Remove the entry holding exactly this item instance.
    ///
    /// Returns `false` if it was already removed.
    pub fn remove(&self, item: &Arc<T>) -> bool {
        let mut items = self.items.write();
        let key = items
            .iter()
            .find(|(_, stored)| Arc::ptr_eq(stored, item))
            .map(|(key, _)| *key);

        match key {
            Some(key) => items.remove(&key).is_some(),
            None => false,
        }
    }

    /// Drop every entry whose key is strictly below `min_key`.
    ///
    /// Returns the number of entries removed.
    pub fn discard_older_than(&self, min_key: i64) -> usize {
        let mut items = self.items.write();
        let kept = items.split_off(&min_key);
        let discarded = std::mem::replace(&mut *items, kept);
        discarded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Visit items newest-first and return the first `Some` produced by `f`.
    ///
    /// The read lock is held for the whole scan.
    pub fn find_newest_first<R>(&self, mut f: impl FnMut(i64, &T) -> Option<R>) -> Option<R> {
        self.items
            .read()
            .iter()
            .rev()
            .find_map(|(key, item)| f(*key, item))
    }

    /// Block until a producer signals new data or `timeout` elapses.
    ///
    /// Returns `true` if woken by a signal. A signal raised while nobody was
    /// waiting is not lost: the next wait returns immediately.
    pub fn wait_for_data(&self, timeout: Duration) -> bool {
        let mut pending = self.pending.lock();
        if !*pending {
            let _ = self.data_available.wait_for(&mut pending, timeout);
        }
        std::mem::replace(&mut *pending, false)
    }

    pub fn notify_data_available(&self) {
        let mut pending = self.pending.lock();
        *pending = true;
        self.data_available.notify_all();
    }
}
