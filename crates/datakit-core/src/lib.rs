//! Shared definitions for the datakit collections
//!
//! Every fallible collection operation reports a [`DataError`].

/// Result alias used across the datakit crates
pub type Result<T, E = DataError> = std::result::Result<T, E>;

/// Error types raised by the collections
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("size = {size} ,the index = {index}")]
    IndexOutOfBounds { size: usize, index: usize },

    #[error("invalid range {from}..{to} for size {size}")]
    InvalidRange { from: usize, to: usize, size: usize },

    #[error("no such element: {what}")]
    NoSuchElement { what: &'static str },

    #[error("Illegal max size: {max_size}")]
    IllegalMaxSize { max_size: usize },

    #[error("Illegal load factor: {load_factor}")]
    IllegalLoadFactor { load_factor: f32 },

    #[error("no value factory installed")]
    MissingValueFactory,

    #[error("cannot allocate capacity for {requested} elements")]
    CapacityOverflow { requested: usize },
}

impl DataError {
    #[must_use]
    pub const fn index_out_of_bounds(size: usize, index: usize) -> Self {
        Self::IndexOutOfBounds { size, index }
    }

    #[must_use]
    pub const fn empty(what: &'static str) -> Self {
        Self::NoSuchElement { what }
    }

    /// Check that `index` addresses a live element of a collection of `size`
    ///
    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` when `index >= size`
    pub const fn check_index(size: usize, index: usize) -> Result<()> {
        if index >= size {
            Err(Self::index_out_of_bounds(size, index))
        } else {
            Ok(())
        }
    }
}
