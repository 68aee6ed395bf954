use crate::check_max_size;
use datakit_core::{DataError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;

type ValueFactory<K, V> = Box<dyn Fn(&K) -> V + Send + Sync>;

/// Ceiling on the initial table size; larger maps grow on demand
const MAX_PRESIZE: usize = 1 << 16;

struct Stamped<V> {
    value: V,
    stamp: u64,
}

struct State<K, V> {
    entries: HashMap<K, Stamped<V>>,
    last_stamp: u64,
}

impl<K: Hash + Eq + Clone, V> State<K, V> {
    fn next_stamp(&mut self) -> u64 {
        self.last_stamp += 1;
        self.last_stamp
    }

    fn insert_new(&mut self, key: K, value: V) {
        let stamp = self.next_stamp();
        self.entries.insert(key, Stamped { value, stamp });
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let key = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.stamp)
            .map(|(key, _)| key.clone())?;
        let (key, entry) = self.entries.remove_entry(&key)?;
        Some((key, entry.value))
    }
}

/// Thread-safe LRU map optimised for lookups
///
/// Each access stamps the entry with the next value of a counter, so a read
/// costs one hash lookup. Finding the eviction victim is a linear scan for
/// the smallest stamp, paid only when the map overflows.
pub struct GetFirstLruMap<K, V> {
    max_size: usize,
    state: Mutex<State<K, V>>,
    value_factory: Option<ValueFactory<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> GetFirstLruMap<K, V> {
    /// Create a map holding at most `max_size` entries
    ///
    /// The table is pre-sized to `max_size / load_factor` buckets, capped at
    /// twice `max_size` and at a fixed ceiling.
    ///
    /// # Errors
    ///
    /// Returns `DataError::IllegalMaxSize` when `max_size <= 1` and
    /// `DataError::IllegalLoadFactor` when `load_factor` is not positive
    pub fn new(max_size: usize, load_factor: f32) -> Result<Self> {
        check_max_size(max_size)?;
        if load_factor.is_nan() || load_factor <= 0.0 {
            return Err(DataError::IllegalLoadFactor { load_factor });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let capacity = ((max_size as f64 / f64::from(load_factor)) as usize)
            .min(max_size.saturating_mul(2))
            .min(MAX_PRESIZE);
        Ok(Self {
            max_size,
            state: Mutex::new(State {
                entries: HashMap::with_capacity(capacity),
                last_stamp: 0,
            }),
            value_factory: None,
        })
    }

    /// Install the factory used by [`get_or_create`](Self::get_or_create)
    ///
    /// The factory runs while the map is locked, so concurrent misses on one
    /// key create a single value. It must not call back into the map.
    #[must_use]
    pub fn with_value_factory(mut self, factory: impl Fn(&K) -> V + Send + Sync + 'static) -> Self {
        self.value_factory = Some(Box::new(factory));
        self
    }

    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Look up `key` and mark it most recently used
    pub fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let stamp = state.next_stamp();
        let entry = state.entries.get_mut(key)?;
        entry.stamp = stamp;
        Some(entry.value.clone())
    }

    /// Look up `key` without affecting eviction order
    pub fn peek(&self, key: &K) -> Option<V> {
        let state = self.state.lock();
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite `key`, returning the previous value
    ///
    /// Overwriting keeps the entry and refreshes it. Inserting beyond
    /// `max_size` evicts the least recently used entry.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut state = self.state.lock();
        let stamp = state.next_stamp();
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.stamp = stamp;
            return Some(std::mem::replace(&mut entry.value, value));
        }
        state.entries.insert(key, Stamped { value, stamp });
        if state.entries.len() > self.max_size {
            state.evict_lru();
            log::debug!("get-first lru map evicted an entry (max_size {})", self.max_size);
        }
        None
    }

    pub fn put_all(&self, entries: impl IntoIterator<Item = (K, V)>) {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        state.entries.remove(key).map(|entry| entry.value)
    }

    /// Remove and return the least recently used value
    ///
    /// # Errors
    ///
    /// Returns `DataError::NoSuchElement` when the map is empty
    pub fn remove_lru_last(&self) -> Result<V> {
        let mut state = self.state.lock();
        state
            .evict_lru()
            .map(|(_, value)| value)
            .ok_or(DataError::empty("lru entry"))
    }

    /// Return the value for `key`, creating it with the value factory when absent
    ///
    /// # Errors
    ///
    /// Returns `DataError::MissingValueFactory` when no factory was installed
    pub fn get_or_create(&self, key: K) -> Result<V> {
        let factory = self.value_factory.as_ref().ok_or(DataError::MissingValueFactory)?;
        let mut state = self.state.lock();
        let stamp = state.next_stamp();
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.stamp = stamp;
            return Ok(entry.value.clone());
        }
        let value = factory(&key);
        state.insert_new(key, value.clone());
        if state.entries.len() > self.max_size {
            state.evict_lru();
            log::debug!("get-first lru map evicted an entry (max_size {})", self.max_size);
        }
        Ok(value)
    }

    /// Like [`get_or_create`](Self::get_or_create), but a full map hands the
    /// evicted least recently used value to `key` instead of creating one
    ///
    /// # Errors
    ///
    /// Returns `DataError::MissingValueFactory` when no factory was installed
    pub fn get_or_create_or_reuse(&self, key: K) -> Result<V> {
        let factory = self.value_factory.as_ref().ok_or(DataError::MissingValueFactory)?;
        let mut state = self.state.lock();
        let stamp = state.next_stamp();
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.stamp = stamp;
            return Ok(entry.value.clone());
        }
        let value = if state.entries.len() < self.max_size {
            factory(&key)
        } else {
            match state.evict_lru() {
                Some((_, reused)) => {
                    log::debug!("get-first lru map reusing an evicted value");
                    reused
                }
                None => factory(&key),
            }
        };
        state.insert_new(key, value.clone());
        Ok(value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.state
            .lock()
            .entries
            .values()
            .any(|entry| &entry.value == value)
    }

    /// Snapshot of the keys, in no particular order
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.state.lock().entries.keys().cloned().collect()
    }

    /// Snapshot of the values, in no particular order
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.state
            .lock()
            .entries
            .values()
            .map(|entry| entry.value.clone())
            .collect()
    }

    /// Snapshot of the entries, in no particular order
    #[must_use]
    pub fn entries(&self) -> Vec<(K, V)> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    /// Remove every entry and restart the access counter
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.last_stamp = 0;
    }
}
