//! Time-bounded containers on top of tokio
//!
//! * [`TimeCacheData`] and [`TimeCacheDataMap`] memoise the result of an async
//!   loader for a fixed period and reload it on the first access after expiry.
//! * [`DownTimeList`], [`AsyncDownTimeList`] and [`DownTimeMap`] drop each
//!   element on their own once its countdown elapses.
//!
//! Timestamps come from `tokio::time`, so everything here follows a paused
//! test clock.

mod cache;
mod cache_map;
mod down_time;
mod down_time_map;

pub use cache::{DEFAULT_CACHE_TIME, TimeCacheData, TimeCacheDataWithDefault};
pub use cache_map::{TimeCacheDataMap, TimeCacheDataMapWithDefault};
pub use down_time::{AsyncDownTimeList, DownTimeList};
pub use down_time_map::DownTimeMap;
