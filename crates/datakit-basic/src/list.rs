//! Growable array of unboxed primitive values

use crate::BasicValue;
use datakit_core::{DataError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Capacity used by [`BasicArrayList::new`] and by the first growth of an
/// empty buffer.
pub const DEFAULT_CAPACITY: usize = 10;

/// A dynamic array specialised for primitive values
///
/// Elements live in a single boxed slice; slots past `len` hold
/// `T::default()`. Appending to a full buffer doubles its capacity.
/// Not synchronised: wrap it in a lock to share it between threads.
pub struct BasicArrayList<T: BasicValue> {
    data: Box<[T]>,
    len: usize,
}

impl<T: BasicValue> BasicArrayList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics when `capacity` slots cannot be allocated; see
    /// [`try_with_capacity`](Self::try_with_capacity)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![T::default(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Create an empty list with `capacity` slots
    ///
    /// # Errors
    ///
    /// Returns `DataError::CapacityOverflow` when the buffer cannot be allocated
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            data: allocate(capacity)?,
            len: 0,
        })
    }

    /// Number of live elements
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing buffer
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// Get the element at `index`
    ///
    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` when `index >= len`
    pub fn get(&self, index: usize) -> Result<T> {
        DataError::check_index(self.len, index)?;
        Ok(self.data[index])
    }

    #[must_use]
    pub fn get_or_none(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).copied()
    }

    #[must_use]
    pub fn get_or(&self, index: usize, default: T) -> T {
        self.get_or_none(index).unwrap_or(default)
    }

    pub fn get_or_else(&self, index: usize, default: impl FnOnce() -> T) -> T {
        self.get_or_none(index).unwrap_or_else(default)
    }

    /// Append `element`, growing the buffer when it is full
    ///
    /// # Panics
    ///
    /// Panics when the grown buffer cannot be allocated; see
    /// [`try_add`](Self::try_add)
    pub fn add(&mut self, element: T) {
        if let Err(error) = self.try_add(element) {
            panic!("{}ArrayList: {error}", T::NAME);
        }
    }

    /// Append `element`, reporting a failed growth instead of panicking
    ///
    /// # Errors
    ///
    /// Returns `DataError::CapacityOverflow` when the buffer is full and
    /// doubling it overflows or cannot be allocated. The list is unchanged.
    pub fn try_add(&mut self, element: T) -> Result<()> {
        if self.len == self.data.len() {
            self.grow()?;
        }
        self.data[self.len] = element;
        self.len += 1;
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let new_capacity = if self.data.is_empty() {
            DEFAULT_CAPACITY
        } else {
            self.data
                .len()
                .checked_mul(2)
                .ok_or(DataError::CapacityOverflow { requested: usize::MAX })?
        };
        log::trace!(
            "{}ArrayList grows from {} to {new_capacity}",
            T::NAME,
            self.data.len()
        );
        let mut data = allocate(new_capacity)?;
        data[..self.len].copy_from_slice(self.as_slice());
        self.data = data;
        Ok(())
    }

    /// Replace the element at `index`, returning the previous one
    ///
    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` when `index >= len`
    pub fn set(&mut self, index: usize, element: T) -> Result<T> {
        DataError::check_index(self.len, index)?;
        Ok(std::mem::replace(&mut self.data[index], element))
    }

    /// Like [`set`](Self::set), but an out-of-range index drops the write
    pub fn set_or_discard(&mut self, index: usize, element: T) {
        if index < self.len {
            self.data[index] = element;
        }
    }

    /// Remove the element at `index`, shifting the tail left
    ///
    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` when `index >= len`
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        DataError::check_index(self.len, index)?;
        let removed = self.data[index];
        self.data.copy_within(index + 1..self.len, index);
        self.len -= 1;
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` when the list is empty
    pub fn remove_first(&mut self) -> Result<T> {
        self.remove_at(0)
    }

    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` when the list is empty
    pub fn remove_last(&mut self) -> Result<T> {
        match self.len.checked_sub(1) {
            Some(last) => self.remove_at(last),
            None => Err(DataError::index_out_of_bounds(0, 0)),
        }
    }

    /// Remove the first element equal to `element`
    ///
    /// Returns whether anything was removed.
    pub fn remove_element(&mut self, element: T) -> bool {
        match self.index_of(element) {
            Some(index) => {
                self.data.copy_within(index + 1..self.len, index);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn index_of(&self, element: T) -> Option<usize> {
        self.iter().position(|datum| datum == element)
    }

    #[must_use]
    pub fn last_index_of(&self, element: T) -> Option<usize> {
        self.iter().rposition(|datum| datum == element)
    }

    #[must_use]
    pub fn contains(&self, element: T) -> bool {
        self.index_of(element).is_some()
    }

    /// Drop every element; the buffer keeps its capacity
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Copy out `from..to`
    ///
    /// # Errors
    ///
    /// Returns `DataError::InvalidRange` when `to > len` or `from > to`
    pub fn sub_list(&self, from: usize, to: usize) -> Result<Self> {
        if to > self.len || from > to {
            return Err(DataError::InvalidRange {
                from,
                to,
                size: self.len,
            });
        }
        Ok(Self::from(&self.data[from..to]))
    }

    /// Copy out `from..to` clamped to the live range
    #[must_use]
    pub fn sub_list_clamped(&self, from: usize, to: usize) -> Self {
        let to = to.min(self.len);
        let from = from.min(to);
        Self::from(&self.data[from..to])
    }

    pub fn add_all(&mut self, elements: impl IntoIterator<Item = T>) {
        for element in elements {
            self.add(element);
        }
    }

    /// Append every `Some` element, skipping `None`
    pub fn add_all_present(&mut self, elements: impl IntoIterator<Item = Option<T>>) {
        self.add_all(elements.into_iter().flatten());
    }

    /// Remove one occurrence of each given element
    pub fn remove_all(&mut self, elements: impl IntoIterator<Item = T>) {
        for element in elements {
            self.remove_element(element);
        }
    }

    /// Keep only the elements for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(T) -> bool) {
        let mut write = 0;
        for read in 0..self.len {
            let datum = self.data[read];
            if keep(datum) {
                self.data[write] = datum;
                write += 1;
            }
        }
        self.len = write;
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, T>> {
        self.as_slice().iter().copied()
    }

    /// A cursor that can remove the element it last yielded
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor {
            list: self,
            index: 0,
            last: None,
        }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }
}

fn allocate<T: BasicValue>(capacity: usize) -> Result<Box<[T]>> {
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|_| DataError::CapacityOverflow { requested: capacity })?;
    data.resize(capacity, T::default());
    Ok(data.into_boxed_slice())
}

impl<T: BasicValue> Default for BasicArrayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BasicValue> Clone for BasicArrayList<T> {
    fn clone(&self) -> Self {
        Self::from(self.as_slice())
    }
}

impl<T: BasicValue> PartialEq for BasicArrayList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: BasicValue> From<&[T]> for BasicArrayList<T> {
    fn from(values: &[T]) -> Self {
        Self {
            data: values.into(),
            len: values.len(),
        }
    }
}

impl<T: BasicValue> From<Vec<T>> for BasicArrayList<T> {
    fn from(values: Vec<T>) -> Self {
        let len = values.len();
        Self {
            data: values.into_boxed_slice(),
            len,
        }
    }
}

impl<T: BasicValue, const N: usize> From<[T; N]> for BasicArrayList<T> {
    fn from(values: [T; N]) -> Self {
        Self::from(&values[..])
    }
}

impl<T: BasicValue> FromIterator<T> for BasicArrayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut list = Self::with_capacity(iter.size_hint().0);
        list.add_all(iter);
        list
    }
}

impl<T: BasicValue> Extend<T> for BasicArrayList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, T: BasicValue> IntoIterator for &'a BasicArrayList<T> {
    type Item = T;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: BasicValue> fmt::Display for BasicArrayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            element.render(f)?;
        }
        f.write_str("]")
    }
}

impl<T: BasicValue> fmt::Debug for BasicArrayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: BasicValue + Serialize> Serialize for BasicArrayList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: BasicValue + Deserialize<'de>> Deserialize<'de> for BasicArrayList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}

/// Forward cursor over a [`BasicArrayList`] supporting in-place removal
pub struct Cursor<'a, T: BasicValue> {
    list: &'a mut BasicArrayList<T>,
    index: usize,
    last: Option<usize>,
}

impl<T: BasicValue> Cursor<'_, T> {
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index < self.list.len()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<T> {
        let element = self.list.get_or_none(self.index)?;
        self.last = Some(self.index);
        self.index += 1;
        Some(element)
    }

    /// Remove the element returned by the latest [`next`](Self::next)
    ///
    /// # Errors
    ///
    /// Returns `DataError::NoSuchElement` when `next` has not yielded an
    /// element since the previous removal
    pub fn remove(&mut self) -> Result<T> {
        let index = self.last.take().ok_or(DataError::empty("cursor element"))?;
        self.index = index;
        self.list.remove_at(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BooleanArrayList, DoubleArrayList, FloatArrayList, IntArrayList, LongArrayList};

    #[test]
    fn test_add_and_display() {
        let mut list = IntArrayList::new();
        list.add(6);
        list.add(6);
        list.add(6);
        assert_eq!(list.len(), 3);
        assert_eq!(list.to_string(), "[6,6,6]");
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(IntArrayList::new().to_string(), "[]");
    }

    #[test]
    fn test_growth_doubles_capacity() {
        let mut list = IntArrayList::with_capacity(2);
        list.add(1);
        list.add(2);
        assert_eq!(list.capacity(), 2);
        list.add(3);
        assert_eq!(list.capacity(), 4);
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_capacity_grows_to_default() {
        let mut list = DoubleArrayList::with_capacity(0);
        list.add(1.5);
        assert_eq!(list.capacity(), DEFAULT_CAPACITY);
        assert_eq!(list.get(0).unwrap(), 1.5);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let list = IntArrayList::from([1, 2, 3]);
        assert_eq!(
            list.get(3),
            Err(DataError::IndexOutOfBounds { size: 3, index: 3 })
        );
        assert_eq!(list.get_or_none(3), None);
        assert_eq!(list.get_or(3, -1), -1);
        assert_eq!(list.get_or_else(1, || -1), 2);
    }

    #[test]
    fn test_get_ignores_spare_capacity() {
        let list = IntArrayList::with_capacity(10);
        assert!(list.get(0).is_err());
    }

    #[test]
    fn test_set_returns_previous() {
        let mut list = LongArrayList::from([1, 2, 3]);
        assert_eq!(list.set(1, 20).unwrap(), 2);
        assert_eq!(list.to_vec(), vec![1, 20, 3]);
        assert!(list.set(3, 4).is_err());
    }

    #[test]
    fn test_set_or_discard() {
        let mut list = IntArrayList::from([1, 2]);
        list.set_or_discard(5, 9);
        list.set_or_discard(0, 9);
        assert_eq!(list.to_vec(), vec![9, 2]);
    }

    #[test]
    fn test_remove_at_shifts_tail() {
        let mut list = IntArrayList::from([1, 2, 3, 4]);
        assert_eq!(list.remove_at(1).unwrap(), 2);
        assert_eq!(list.to_vec(), vec![1, 3, 4]);
        assert_eq!(list.remove_first().unwrap(), 1);
        assert_eq!(list.remove_last().unwrap(), 4);
        assert_eq!(list.to_vec(), vec![3]);
    }

    #[test]
    fn test_remove_from_empty() {
        let mut list = IntArrayList::new();
        assert!(list.remove_first().is_err());
        assert!(list.remove_last().is_err());
    }

    #[test]
    fn test_remove_element_first_occurrence() {
        let mut list = IntArrayList::from([5, 1, 5]);
        assert!(list.remove_element(5));
        assert_eq!(list.to_vec(), vec![1, 5]);
        assert!(!list.remove_element(7));
    }

    #[test]
    fn test_index_of_and_last_index_of() {
        let list = IntArrayList::from([4, 2, 4]);
        assert_eq!(list.index_of(4), Some(0));
        assert_eq!(list.last_index_of(4), Some(2));
        assert_eq!(list.index_of(9), None);
        assert!(list.contains(2));
        assert!(!list.contains(3));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut list = IntArrayList::from([1, 2, 3]);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.capacity(), 3);
    }

    #[test]
    fn test_sub_list() {
        let list = IntArrayList::from([1, 2, 3, 4]);
        assert_eq!(list.sub_list(1, 3).unwrap().to_vec(), vec![2, 3]);
        assert!(list.sub_list(2, 5).is_err());
        assert!(list.sub_list(3, 2).is_err());
        assert!(list.sub_list(4, 4).unwrap().is_empty());
    }

    #[test]
    fn test_sub_list_clamped() {
        let list = IntArrayList::from([1, 2, 3]);
        assert_eq!(list.sub_list_clamped(1, 10).to_vec(), vec![2, 3]);
        assert!(list.sub_list_clamped(5, 10).is_empty());
    }

    #[test]
    fn test_sub_list_does_not_leak_spare_slots() {
        let mut list = IntArrayList::new();
        list.add(1);
        assert!(list.sub_list(1, 3).is_err());
        assert_eq!(list.sub_list_clamped(0, 5).to_vec(), vec![1]);
    }

    #[test]
    fn test_bulk_operations() {
        let mut list = IntArrayList::new();
        list.add_all([1, 2, 3, 2]);
        list.add_all_present([Some(4), None, Some(5)]);
        assert_eq!(list.to_vec(), vec![1, 2, 3, 2, 4, 5]);
        list.remove_all([2, 5, 9]);
        assert_eq!(list.to_vec(), vec![1, 3, 2, 4]);
        let other = IntArrayList::from([7, 8]);
        list.extend(&other);
        assert_eq!(list.to_vec(), vec![1, 3, 2, 4, 7, 8]);
    }

    #[test]
    fn test_retain() {
        let mut list: IntArrayList = (1..=6).collect();
        list.retain(|v| v % 2 == 0);
        assert_eq!(list.to_vec(), vec![2, 4, 6]);
    }

    #[test]
    fn test_cursor_remove() {
        let mut list = IntArrayList::from([1, 2, 3, 4]);
        let mut cursor = list.cursor();
        while let Some(value) = cursor.next() {
            if value % 2 == 1 {
                cursor.remove().unwrap();
            }
        }
        assert!(!cursor.has_next());
        assert_eq!(list.to_vec(), vec![2, 4]);
    }

    #[test]
    fn test_cursor_remove_twice_fails() {
        let mut list = IntArrayList::from([1, 2]);
        let mut cursor = list.cursor();
        assert!(cursor.remove().is_err());
        cursor.next();
        assert!(cursor.remove().is_ok());
        assert!(cursor.remove().is_err());
    }

    #[test]
    fn test_iter_reversed() {
        let list = IntArrayList::from([1, 2, 3]);
        let reversed: Vec<(usize, i32)> = list.iter().enumerate().rev().collect();
        assert_eq!(reversed, vec![(2, 3), (1, 2), (0, 1)]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut list = IntArrayList::from([1, 2]);
        let copy = list.clone();
        list.add(3);
        assert_eq!(copy.to_vec(), vec![1, 2]);
        assert_ne!(copy, list);
    }

    #[test]
    fn test_boolean_and_float_display() {
        let flags = BooleanArrayList::from([true, false]);
        assert_eq!(flags.to_string(), "[true,false]");
        let values = DoubleArrayList::from([1.5, 2.25]);
        assert_eq!(values.to_string(), "[1.5,2.25]");
    }

    #[test]
    fn test_integral_floats_keep_fraction() {
        let doubles = DoubleArrayList::from([1.0, 2.5, -0.0]);
        assert_eq!(doubles.to_string(), "[1.0,2.5,-0.0]");
        let floats = FloatArrayList::from([3.0_f32]);
        assert_eq!(floats.to_string(), "[3.0]");
        assert_eq!(LongArrayList::from([1, 2]).to_string(), "[1,2]");
    }

    #[test]
    fn test_try_with_capacity_reports_overflow() {
        assert_eq!(
            IntArrayList::try_with_capacity(usize::MAX).unwrap_err(),
            DataError::CapacityOverflow { requested: usize::MAX }
        );
        let list = IntArrayList::try_with_capacity(4).unwrap();
        assert_eq!(list.capacity(), 4);
        assert!(list.is_empty());
    }

    #[test]
    fn test_try_add_grows_like_add() {
        let mut list = IntArrayList::try_with_capacity(0).unwrap();
        for value in 0..11 {
            list.try_add(value).unwrap();
        }
        assert_eq!(list.capacity(), DEFAULT_CAPACITY * 2);
        assert_eq!(list.get(10).unwrap(), 10);
    }

    #[test]
    fn test_json_array() {
        let list = IntArrayList::from([1, 2, 3]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[1,2,3]");
        let parsed: IntArrayList = serde_json::from_str("[4,5]").unwrap();
        assert_eq!(parsed.to_vec(), vec![4, 5]);
    }

    #[test]
    fn test_debug_format() {
        let list = IntArrayList::from([1, 2]);
        assert_eq!(format!("{list:?}"), "[1, 2]");
    }

    mod model {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(i32),
            RemoveAt(usize),
            RemoveElement(i32),
            Set(usize, i32),
            Clear,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => any::<i32>().prop_map(Op::Add),
                2 => (0usize..40).prop_map(Op::RemoveAt),
                1 => (-3i32..3).prop_map(Op::RemoveElement),
                1 => (0usize..40, any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
                1 => Just(Op::Clear),
            ]
        }

        proptest! {
            #[test]
            fn prop_matches_vec(ops in proptest::collection::vec(op(), 0..200)) {
                let mut list = IntArrayList::with_capacity(1);
                let mut model: Vec<i32> = Vec::new();

                for op in ops {
                    match op {
                        Op::Add(v) => {
                            list.add(v);
                            model.push(v);
                        }
                        Op::RemoveAt(i) => {
                            let expected = (i < model.len()).then(|| model.remove(i));
                            prop_assert_eq!(list.remove_at(i).ok(), expected);
                        }
                        Op::RemoveElement(v) => {
                            let expected = model.iter().position(|&x| x == v).map(|i| model.remove(i));
                            prop_assert_eq!(list.remove_element(v), expected.is_some());
                        }
                        Op::Set(i, v) => {
                            let expected = model.get_mut(i).map(|slot| std::mem::replace(slot, v));
                            prop_assert_eq!(list.set(i, v).ok(), expected);
                        }
                        Op::Clear => {
                            list.clear();
                            model.clear();
                        }
                    }
                    prop_assert!(list.len() <= list.capacity());
                    prop_assert_eq!(list.as_slice(), model.as_slice());
                }
            }
        }
    }
}
