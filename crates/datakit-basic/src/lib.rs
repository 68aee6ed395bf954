//! Primitive-specialised array lists
//!
//! `BasicArrayList<T>` stores `i32`, `i64`, `f32`, `f64` or `bool` values
//! unboxed, with an explicit capacity that doubles on overflow.

mod list;
mod value;

pub use list::{BasicArrayList, Cursor, DEFAULT_CAPACITY};
pub use value::BasicValue;

pub type IntArrayList = BasicArrayList<i32>;
pub type LongArrayList = BasicArrayList<i64>;
pub type FloatArrayList = BasicArrayList<f32>;
pub type DoubleArrayList = BasicArrayList<f64>;
pub type BooleanArrayList = BasicArrayList<bool>;

/// Build a [`BasicArrayList`] from literal elements, inferring the element type
#[macro_export]
macro_rules! basic_array_list {
    () => {
        $crate::BasicArrayList::new()
    };
    ($($element:expr),+ $(,)?) => {
        $crate::BasicArrayList::from([$($element),+])
    };
}

#[macro_export]
macro_rules! int_array_list {
    ($($element:expr),* $(,)?) => {{
        let list: $crate::IntArrayList = $crate::basic_array_list![$($element),*];
        list
    }};
}

#[macro_export]
macro_rules! long_array_list {
    ($($element:expr),* $(,)?) => {{
        let list: $crate::LongArrayList = $crate::basic_array_list![$($element),*];
        list
    }};
}

#[macro_export]
macro_rules! float_array_list {
    ($($element:expr),* $(,)?) => {{
        let list: $crate::FloatArrayList = $crate::basic_array_list![$($element),*];
        list
    }};
}

#[macro_export]
macro_rules! double_array_list {
    ($($element:expr),* $(,)?) => {{
        let list: $crate::DoubleArrayList = $crate::basic_array_list![$($element),*];
        list
    }};
}

#[macro_export]
macro_rules! boolean_array_list {
    ($($element:expr),* $(,)?) => {{
        let list: $crate::BooleanArrayList = $crate::basic_array_list![$($element),*];
        list
    }};
}
