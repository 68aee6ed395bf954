use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// An element together with the timer that will remove it
pub(crate) struct Timed<T> {
    pub(crate) id: u64,
    pub(crate) value: T,
    pub(crate) timer: JoinHandle<()>,
}

impl<T> Timed<T> {
    pub(crate) fn cancel(self) -> T {
        self.timer.abort();
        self.value
    }
}

/// A list whose elements remove themselves `down_time` after being added
///
/// Each element owns a timer task on the given runtime; removing the element
/// early aborts its timer. Methods are synchronous and may be called from
/// any thread.
pub struct DownTimeList<T> {
    down_time: Duration,
    runtime: Handle,
    entries: Arc<Mutex<Vec<Timed<T>>>>,
    next_id: AtomicU64,
}

impl<T: PartialEq + Clone + Send + 'static> DownTimeList<T> {
    /// Create a list whose timers run on the current tokio runtime
    ///
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
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn add(&self, value: T) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entries = Arc::downgrade(&self.entries);
        let down_time = self.down_time;
        // Held across the spawn so the timer cannot fire before the push.
        let mut guard = self.entries.lock();
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(down_time).await;
            expire(&entries, id);
        });
        guard.push(Timed { id, value, timer });
    }

    /// Remove the first element equal to `value`
    pub fn remove_first(&self, value: &T) -> bool {
        let mut entries = self.entries.lock();
        match entries.iter().position(|entry| &entry.value == value) {
            Some(index) => {
                entries.remove(index).cancel();
                true
            }
            None => false,
        }
    }

    /// Remove every element equal to `value`; true when any was present
    pub fn remove_all(&self, value: &T) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|entry| {
            let keep = &entry.value != value;
            if !keep {
                entry.timer.abort();
            }
            keep
        });
        entries.len() != before
    }

    pub fn clear(&self) {
        for entry in self.entries.lock().drain(..) {
            entry.cancel();
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.entries.lock().iter().any(|entry| &entry.value == value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of the live elements in insertion order
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.value.clone())
            .collect()
    }
}

fn expire<T>(entries: &Weak<Mutex<Vec<Timed<T>>>>, id: u64) {
    if let Some(entries) = entries.upgrade() {
        entries.lock().retain(|entry| entry.id != id);
        log::trace!("down-time list element {id} expired");
    }
}

impl<T> Drop for DownTimeList<T> {
    fn drop(&mut self) {
        for entry in self.entries.lock().iter() {
            entry.timer.abort();
        }
    }
}

/// [`DownTimeList`] guarded by an async mutex
///
/// Every operation awaits the lock instead of blocking the thread.
pub struct AsyncDownTimeList<T> {
    down_time: Duration,
    runtime: Handle,
    entries: Arc<tokio::sync::Mutex<Vec<Timed<T>>>>,
    next_id: AtomicU64,
}

impl<T: PartialEq + Clone + Send + 'static> AsyncDownTimeList<T> {
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
            entries: Arc::new(tokio::sync::Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    pub async fn add(&self, value: T) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let weak = Arc::downgrade(&self.entries);
        let down_time = self.down_time;
        let mut entries = self.entries.lock().await;
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(down_time).await;
            if let Some(entries) = weak.upgrade() {
                entries.lock().await.retain(|entry| entry.id != id);
                log::trace!("async down-time list element {id} expired");
            }
        });
        entries.push(Timed { id, value, timer });
    }

    pub async fn remove_first(&self, value: &T) -> bool {
        let mut entries = self.entries.lock().await;
        match entries.iter().position(|entry| &entry.value == value) {
            Some(index) => {
                entries.remove(index).cancel();
                true
            }
            None => false,
        }
    }

    pub async fn remove_all(&self, value: &T) -> bool {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|entry| {
            let keep = &entry.value != value;
            if !keep {
                entry.timer.abort();
            }
            keep
        });
        entries.len() != before
    }

    pub async fn clear(&self) {
        for entry in self.entries.lock().await.drain(..) {
            entry.cancel();
        }
    }

    pub async fn contains(&self, value: &T) -> bool {
        self.entries
            .lock()
            .await
            .iter()
            .any(|entry| &entry.value == value)
    }

    pub async fn to_vec(&self) -> Vec<T> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|entry| entry.value.clone())
            .collect()
    }
}

impl<T> Drop for AsyncDownTimeList<T> {
    fn drop(&mut self) {
        if let Ok(entries) = self.entries.try_lock() {
            for entry in entries.iter() {
                entry.timer.abort();
            }
        }
    }
}
