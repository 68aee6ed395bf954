//! Least-recently-used maps
//!
//! [`LruMap`] keeps entries in access order and evicts from the front; it
//! suits workloads that write about as often as they read. [`GetFirstLruMap`]
//! is shareable between threads and makes reads cheap by stamping entries
//! instead of reordering them, paying a scan on eviction.

mod get_first;
mod lru_map;

pub use get_first::GetFirstLruMap;
pub use lru_map::LruMap;

use datakit_core::{DataError, Result};

fn check_max_size(max_size: usize) -> Result<()> {
    if max_size <= 1 {
        return Err(DataError::IllegalMaxSize { max_size });
    }
    Ok(())
}
