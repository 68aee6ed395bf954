//! Integration tests for the time-bounded containers
//! Runs on tokio's paused clock

use datakit::basic::IntArrayList;
use datakit::time::{DownTimeList, DownTimeMap, TimeCacheDataMapWithDefault, TimeCacheDataWithDefault};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_cached_array_list_snapshot() {
    let version = Arc::new(AtomicI32::new(0));
    let source = Arc::clone(&version);
    let cache = TimeCacheDataWithDefault::new(Duration::from_secs(60), move || {
        let source = Arc::clone(&source);
        async move {
            let v = source.fetch_add(1, Ordering::SeqCst);
            IntArrayList::from([v, v, v])
        }
    });

    assert_eq!(cache.get_data().await.to_string(), "[0,0,0]");
    tokio::time::advance(Duration::from_secs(30)).await;
    assert_eq!(cache.get_data().await.to_string(), "[0,0,0]");
    tokio::time::advance(Duration::from_secs(30)).await;
    assert_eq!(cache.get_data().await.to_string(), "[1,1,1]");
}

#[tokio::test(start_paused = true)]
async fn test_keyed_cache_loads_each_key_once() {
    let loads = Arc::new(AtomicI32::new(0));
    let counter = Arc::clone(&loads);
    let cache = TimeCacheDataMapWithDefault::new(Duration::from_secs(60), move |user: u64| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            format!("user-{user}")
        }
    });

    for _ in 0..3 {
        assert_eq!(cache.get_data(1).await, "user-1");
        assert_eq!(cache.get_data(2).await, "user-2");
    }
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_down_time_list_sequence() {
    let list = DownTimeList::new(Duration::from_secs(3));
    list.add(1);
    list.add(2);
    list.add(3);
    tokio::time::sleep(Duration::from_secs(1)).await;
    list.add(4);
    list.add(5);
    list.add(6);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(list.remove_first(&6));
    list.add(7);

    assert_eq!(list.to_vec(), vec![1, 2, 3, 4, 5, 7]);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(list.to_vec(), vec![4, 5, 7]);
    assert!(!list.contains(&6));
}

#[tokio::test(start_paused = true)]
async fn test_down_time_map_holds_lists() {
    let map = DownTimeMap::new(Duration::from_secs(2));
    map.put("session", IntArrayList::from([1, 2]));
    assert_eq!(map.get(&"session").map(|l| l.len()), Some(2));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(map.get(&"session").is_none());
}
