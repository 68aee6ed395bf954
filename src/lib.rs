//! Datakit: primitive array lists, sorted sets, LRU maps and time-bounded caches
//!
//! Each module re-exports one workspace crate.

pub use datakit_core::{DataError, Result};

pub mod basic {
    pub use datakit_basic::*;
}

pub mod sorted {
    pub use datakit_sorted::*;
}

pub mod lru {
    pub use datakit_lru::*;
}

pub mod time {
    pub use datakit_time::*;
}

pub use datakit_basic::{
    boolean_array_list, double_array_list, float_array_list, int_array_list, long_array_list,
};
