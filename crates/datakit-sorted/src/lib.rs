//! Sorted, de-duplicated list
//!
//! Elements are kept ordered by a comparator supplied at construction and
//! are unique under an equality function (defaults to `PartialEq`). The
//! two need not agree: equality decides duplicates, the comparator decides
//! position.

use datakit_core::{DataError, Result};
use std::cmp::Ordering;
use std::fmt;

type CompareFn<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;
type EqualsFn<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// What `add` does when an equal element is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnRepeat {
    /// Remove the old element and insert the new one at its sorted position
    #[default]
    Replace,
    /// Keep the old element and drop the new one
    Discard,
}

pub struct SortedUniqueList<T> {
    items: Vec<T>,
    compare: CompareFn<T>,
    equals: EqualsFn<T>,
    on_repeat: OnRepeat,
}

impl<T: PartialEq + 'static> SortedUniqueList<T> {
    /// Create an empty list ordered by `compare`, using `==` for duplicates
    pub fn new(compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self::with_equality(compare, |a: &T, b: &T| a == b)
    }
}

impl<T: Ord + 'static> SortedUniqueList<T> {
    /// Create an empty list in natural order
    #[must_use]
    pub fn natural() -> Self {
        Self::new(T::cmp)
    }
}

impl<T> SortedUniqueList<T> {
    pub fn with_equality(
        compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
        equals: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            items: Vec::new(),
            compare: Box::new(compare),
            equals: Box::new(equals),
            on_repeat: OnRepeat::default(),
        }
    }

    #[must_use]
    pub fn on_repeat(mut self, on_repeat: OnRepeat) -> Self {
        self.on_repeat = on_repeat;
        self
    }

    /// Insert `element` at its sorted position
    ///
    /// Returns false when the element was a duplicate and
    /// [`OnRepeat::Discard`] is in effect.
    pub fn add(&mut self, element: T) -> bool {
        match self.on_repeat {
            OnRepeat::Replace => {
                self.remove(&element);
            }
            OnRepeat::Discard => {
                if self.contains(&element) {
                    log::trace!("discarding repeated element");
                    return false;
                }
            }
        }
        let index = self.insertion_point(&element);
        self.items.insert(index, element);
        true
    }

    // First position whose element sorts strictly after `element`, so that
    // equal-ordering elements keep their insertion order.
    fn insertion_point(&self, element: &T) -> usize {
        self.items
            .partition_point(|existing| (self.compare)(element, existing) != Ordering::Less)
    }

    pub fn add_all(&mut self, elements: impl IntoIterator<Item = T>) {
        for element in elements {
            self.add(element);
        }
    }

    /// Remove the first element equal to `element`
    pub fn remove(&mut self, element: &T) -> bool {
        match self.index_of(element) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every given element; true when all of them were present
    pub fn remove_all<'a>(&mut self, elements: impl IntoIterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        elements
            .into_iter()
            .fold(true, |all_found, element| self.remove(element) && all_found)
    }

    /// Clear the list and refill it from `elements`
    pub fn replace_all(&mut self, elements: impl IntoIterator<Item = T>) {
        self.items.clear();
        self.add_all(elements);
    }

    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` when `index >= len`
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        DataError::check_index(self.items.len(), index)?;
        Ok(self.items.remove(index))
    }

    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.index_of(element).is_some()
    }

    #[must_use]
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.items.iter().position(|item| (self.equals)(element, item))
    }

    #[must_use]
    pub fn last_index_of(&self, element: &T) -> Option<usize> {
        self.items.iter().rposition(|item| (self.equals)(element, item))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }
}

impl<T: Ord + 'static> Default for SortedUniqueList<T> {
    fn default() -> Self {
        Self::natural()
    }
}

impl<T> Extend<T> for SortedUniqueList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, T> IntoIterator for &'a SortedUniqueList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for SortedUniqueList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedUniqueList")
            .field("items", &self.items)
            .field("on_repeat", &self.on_repeat)
            .finish_non_exhaustive()
    }
}
