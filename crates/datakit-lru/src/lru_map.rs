use crate::check_max_size;
use datakit_core::Result;
use indexmap::{Equivalent, IndexMap};
use std::hash::Hash;

/// Access-ordered map bounded to `max_size` entries
///
/// Entries are kept from least to most recently used. Reading or
/// overwriting an entry moves it to the back; inserting a new key into a
/// full map drops the front entry first.
#[derive(Debug, Clone)]
pub struct LruMap<K, V> {
    entries: IndexMap<K, V>,
    max_size: usize,
}

impl<K: Hash + Eq, V> LruMap<K, V> {
    /// # Errors
    ///
    /// Returns `DataError::IllegalMaxSize` when `max_size <= 1`
    pub fn new(max_size: usize) -> Result<Self> {
        check_max_size(max_size)?;
        Ok(Self {
            entries: IndexMap::with_capacity(max_size),
            max_size,
        })
    }

    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `key` and mark it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let last = self.touch(key)?;
        self.entries.get_index(last).map(|(_, value)| value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let last = self.touch(key)?;
        self.entries.get_index_mut(last).map(|(_, value)| value)
    }

    /// Look up `key` without changing its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`, returning the previous value
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.touch(&key).is_some() {
            return self.entries.insert(key, value);
        }
        if self.entries.len() >= self.max_size {
            self.remove_oldest();
        }
        self.entries.insert(key, value);
        None
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.shift_remove(key)
    }

    /// Drop the least recently used entry
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let evicted = self.entries.shift_remove_index(0);
        if evicted.is_some() {
            log::debug!("lru map evicted its oldest entry (max_size {})", self.max_size);
        }
        evicted
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Entries from least to most recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // Move `key` to the back, returning its new index.
    fn touch<Q>(&mut self, key: &Q) -> Option<usize>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        Some(last)
    }
}
