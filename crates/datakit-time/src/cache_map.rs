use crate::cache::{DEFAULT_CACHE_TIME, fresh};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Per-key values memoised for `cache_time`
///
/// Every key shares one lock: a slow loader for one key holds up readers of
/// all keys.
pub struct TimeCacheDataMap<K, V> {
    cache_time: Duration,
    slots: Mutex<HashMap<K, (V, Instant)>>,
}

impl<K: Hash + Eq + Clone, V: Clone> TimeCacheDataMap<K, V> {
    #[must_use]
    pub fn new(cache_time: Duration) -> Self {
        Self {
            cache_time,
            slots: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn cache_time(&self) -> Duration {
        self.cache_time
    }

    pub fn set_cache_time(&mut self, cache_time: Duration) {
        self.cache_time = cache_time;
    }

    /// Return the value cached for `key`, running `loader` when it is
    /// missing or stale
    pub async fn get_data<Fut>(&self, key: K, loader: impl FnOnce(K) -> Fut) -> V
    where
        Fut: Future<Output = V>,
    {
        let mut slots = self.slots.lock().await;
        self.fresh_or_load(&mut slots, key, loader).await
    }

    // Entries are inserted only once `loader` completes, so a dropped load
    // leaves the map untouched.
    async fn fresh_or_load<Fut>(
        &self,
        slots: &mut HashMap<K, (V, Instant)>,
        key: K,
        loader: impl FnOnce(K) -> Fut,
    ) -> V
    where
        Fut: Future<Output = V>,
    {
        if let Some(value) = fresh(slots.get(&key), self.cache_time) {
            return value;
        }
        log::debug!("cached value for a key missing or older than {:?}, reloading", self.cache_time);
        let value = loader(key.clone()).await;
        slots.insert(key, (value.clone(), Instant::now()));
        value
    }

    /// Like [`get_data`](Self::get_data), then run `then` before releasing the lock
    pub async fn get_data_locked<U, Fut, ThenFut>(
        &self,
        key: K,
        loader: impl FnOnce(K) -> Fut,
        then: impl FnOnce(K, V) -> ThenFut,
    ) -> U
    where
        Fut: Future<Output = V>,
        ThenFut: Future<Output = U>,
    {
        let mut slots = self.slots.lock().await;
        let value = self.fresh_or_load(&mut slots, key.clone(), loader).await;
        then(key, value).await
    }

    pub async fn clear_data(&self, key: &K) {
        self.slots.lock().await.remove(key);
    }

    /// Run `before` under the lock, then forget the value for `key`
    pub async fn clear_data_with<Fut>(&self, key: &K, before: impl FnOnce(&K) -> Fut)
    where
        Fut: Future<Output = ()>,
    {
        let mut slots = self.slots.lock().await;
        before(key).await;
        slots.remove(key);
    }

    pub async fn clear_all_data(&self) {
        self.slots.lock().await.clear();
    }

    /// Run `before` under the lock, then forget every value
    pub async fn clear_all_data_with<Fut>(&self, before: impl FnOnce() -> Fut)
    where
        Fut: Future<Output = ()>,
    {
        let mut slots = self.slots.lock().await;
        before().await;
        slots.clear();
    }

    /// Number of keys with a stored value, fresh or stale
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> Default for TimeCacheDataMap<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TIME)
    }
}

type KeyedLoader<K, V> = Box<dyn Fn(K) -> BoxFuture<'static, V> + Send + Sync>;

/// [`TimeCacheDataMap`] that remembers its loader
pub struct TimeCacheDataMapWithDefault<K, V> {
    cache: TimeCacheDataMap<K, V>,
    loader: KeyedLoader<K, V>,
}

impl<K, V> TimeCacheDataMapWithDefault<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + Send + 'static,
{
    pub fn new<Fut>(cache_time: Duration, loader: impl Fn(K) -> Fut + Send + Sync + 'static) -> Self
    where
        Fut: Future<Output = V> + Send + 'static,
    {
        Self {
            cache: TimeCacheDataMap::new(cache_time),
            loader: Box::new(move |key| loader(key).boxed()),
        }
    }

    pub async fn get_data(&self, key: K) -> V {
        self.cache.get_data(key, |key| (self.loader)(key)).await
    }

    pub async fn get_data_locked<U, ThenFut>(&self, key: K, then: impl FnOnce(K, V) -> ThenFut) -> U
    where
        ThenFut: Future<Output = U>,
    {
        self.cache
            .get_data_locked(key, |key| (self.loader)(key), then)
            .await
    }

    pub async fn clear_data(&self, key: &K) {
        self.cache.clear_data(key).await;
    }

    pub async fn clear_all_data(&self) {
        self.cache.clear_all_data().await;
    }

    #[must_use]
    pub const fn cache(&self) -> &TimeCacheDataMap<K, V> {
        &self.cache
    }
}
