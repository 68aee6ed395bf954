use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// How long a loaded value stays valid unless configured otherwise
pub const DEFAULT_CACHE_TIME: Duration = Duration::from_secs(60 * 60);

type Slot<T> = Option<(T, Instant)>;

/// The stored value, when it is younger than `cache_time`
pub(crate) fn fresh<T: Clone>(stored: Option<&(T, Instant)>, cache_time: Duration) -> Option<T> {
    stored
        .filter(|(_, loaded_at)| loaded_at.elapsed() < cache_time)
        .map(|(value, _)| value.clone())
}

/// Return the cached value when it is younger than `cache_time`, otherwise
/// run `loader` and store its result.
async fn fresh_or_load<T, Fut>(slot: &mut Slot<T>, cache_time: Duration, loader: impl FnOnce() -> Fut) -> T
where
    T: Clone,
    Fut: Future<Output = T>,
{
    if let Some(value) = fresh(slot.as_ref(), cache_time) {
        return value;
    }
    log::debug!("cached value missing or older than {cache_time:?}, reloading");
    let value = loader().await;
    *slot = Some((value.clone(), Instant::now()));
    value
}

/// A single value memoised for `cache_time`
///
/// Concurrent callers are serialised, so an expired value is reloaded once
/// and the other callers observe the fresh result.
pub struct TimeCacheData<T> {
    cache_time: Duration,
    slot: Mutex<Slot<T>>,
}

impl<T: Clone> TimeCacheData<T> {
    #[must_use]
    pub fn new(cache_time: Duration) -> Self {
        Self {
            cache_time,
            slot: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn cache_time(&self) -> Duration {
        self.cache_time
    }

    pub fn set_cache_time(&mut self, cache_time: Duration) {
        self.cache_time = cache_time;
    }

    /// Return the cached value, running `loader` when it is missing or stale
    pub async fn get_data<Fut>(&self, loader: impl FnOnce() -> Fut) -> T
    where
        Fut: Future<Output = T>,
    {
        let mut slot = self.slot.lock().await;
        fresh_or_load(&mut slot, self.cache_time, loader).await
    }

    /// Like [`get_data`](Self::get_data), then run `then` on the value before
    /// releasing the lock
    pub async fn get_data_locked<U, Fut, ThenFut>(
        &self,
        loader: impl FnOnce() -> Fut,
        then: impl FnOnce(T) -> ThenFut,
    ) -> U
    where
        Fut: Future<Output = T>,
        ThenFut: Future<Output = U>,
    {
        let mut slot = self.slot.lock().await;
        let value = fresh_or_load(&mut slot, self.cache_time, loader).await;
        then(value).await
    }

    /// Forget the cached value so the next access reloads it
    pub async fn clear_data(&self) {
        *self.slot.lock().await = None;
    }

    /// Run `before` under the lock, then forget the cached value
    pub async fn clear_data_with<Fut>(&self, before: impl FnOnce() -> Fut)
    where
        Fut: Future<Output = ()>,
    {
        let mut slot = self.slot.lock().await;
        before().await;
        *slot = None;
    }

    /// Whether a value younger than `cache_time` is held
    pub async fn is_fresh(&self) -> bool {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .is_some_and(|(_, loaded_at)| loaded_at.elapsed() < self.cache_time)
    }
}

impl<T: Clone> Default for TimeCacheData<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TIME)
    }
}

type DefaultLoader<T> = Box<dyn Fn() -> BoxFuture<'static, T> + Send + Sync>;

/// [`TimeCacheData`] that remembers its loader
pub struct TimeCacheDataWithDefault<T> {
    cache: TimeCacheData<T>,
    loader: DefaultLoader<T>,
}

impl<T: Clone + Send + 'static> TimeCacheDataWithDefault<T> {
    pub fn new<Fut>(cache_time: Duration, loader: impl Fn() -> Fut + Send + Sync + 'static) -> Self
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        Self {
            cache: TimeCacheData::new(cache_time),
            loader: Box::new(move || loader().boxed()),
        }
    }

    pub async fn get_data(&self) -> T {
        self.cache.get_data(|| (self.loader)()).await
    }

    pub async fn get_data_locked<U, ThenFut>(&self, then: impl FnOnce(T) -> ThenFut) -> U
    where
        ThenFut: Future<Output = U>,
    {
        self.cache.get_data_locked(|| (self.loader)(), then).await
    }

    pub async fn clear_data(&self) {
        self.cache.clear_data().await;
    }

    /// The underlying cache, for loads that bypass the stored loader
    #[must_use]
    pub const fn cache(&self) -> &TimeCacheData<T> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TimeCacheData<T> {
        &mut self.cache
    }
}
