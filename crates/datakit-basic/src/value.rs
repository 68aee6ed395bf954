//! Element types that can back a [`BasicArrayList`](crate::BasicArrayList)

use std::fmt::{self, Debug, Display};

/// A primitive value stored unboxed in a contiguous buffer
///
/// `Default` provides the filler for unused capacity slots.
pub trait BasicValue: Copy + PartialEq + Default + Debug + Display + sealed::Sealed {
    /// Short type name used in diagnostics (`Int`, `Long`, ...)
    const NAME: &'static str;

    /// Write the element as it appears in a list rendering
    ///
    /// Floating-point values always carry a fractional part, so `1.0` stays
    /// distinguishable from an integer.
    fn render(self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! basic_value {
    ($($ty:ty => $name:literal via $format:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl BasicValue for $ty {
                const NAME: &'static str = $name;

                fn render(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    $format::fmt(&self, f)
                }
            }
        )*
    };
}

basic_value! {
    i32 => "Int" via Display,
    i64 => "Long" via Display,
    f32 => "Float" via Debug,
    f64 => "Double" via Debug,
    bool => "Boolean" via Display,
}
