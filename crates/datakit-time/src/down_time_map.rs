use crate::down_time::Timed;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// A map whose entries remove themselves after a countdown
///
/// Putting a key again replaces the value and restarts its countdown. A
/// timer only ever removes the entry it was started for, so an expired
/// countdown never drops a newer value stored under the same key.
pub struct DownTimeMap<K, V> {
    down_time: Duration,
    runtime: Handle,
    entries: Arc<Mutex<HashMap<K, Timed<V>>>>,
    next_id: AtomicU64,
}

impl<K, V> DownTimeMap<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime
    #[must_use]
    pub fn new(down_time: Duration) -> Self {
        Self::with_handle(down_time, Handle::current())
    }

    #[must_use]
    pub fn with_handle(down_time: Duration, runtime: Handle) -> Self {
        Self {
            down_time,
            runtime,
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Store `value` under `key` for the map's default down time
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.put_for(key, value, self.down_time)
    }

    /// Store `value` under `key` for `down_time`, returning the value it replaced
    pub fn put_for(&self, key: K, value: V, down_time: Duration) -> Option<V> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let weak = Arc::downgrade(&self.entries);
        let timer_key = key.clone();
        let mut entries = self.entries.lock();
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(down_time).await;
            if let Some(entries) = weak.upgrade() {
                let mut entries = entries.lock();
                if entries.get(&timer_key).is_some_and(|entry| entry.id == id) {
                    entries.remove(&timer_key);
                    log::trace!("down-time map entry {id} expired");
                }
            }
        });
        entries
            .insert(key, Timed { id, value, timer })
            .map(Timed::cancel)
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().get(key).map(|entry| entry.value.clone())
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.lock().remove(key).map(Timed::cancel)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Snapshot of the live keys, in no particular order
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Snapshot of the live values, in no particular order
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.entries
            .lock()
            .values()
            .map(|entry| entry.value.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        for (_, entry) in self.entries.lock().drain() {
            entry.cancel();
        }
    }
}

impl<K, V> Drop for DownTimeMap<K, V> {
    fn drop(&mut self) {
        for entry in self.entries.lock().values() {
            entry.timer.abort();
        }
    }
}
