//! Sparse component columns.
//!
//! A [`SparseArray`] stores the values of one component type, indexed
//! directly by entity index. Slot `i` holds `Some(value)` when entity `i`
//! has the component and `None` otherwise. The column grows on demand when
//! a value is written past its end and never shrinks: [`SparseArray::len`]
//! is a high-water mark, not a live count.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A dense, index-addressed column of optional component values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseArray<T> {
    /// One slot per entity index. Length is the largest written index + 1.
    data: Vec<Option<T>>,
}

impl<T> SparseArray<T> {
    /// Create a new empty column.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Returns the number of slots, occupied or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the column has no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of occupied slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if slot `index` holds a value.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Get a reference to the value at `index`.
    ///
    /// Returns `None` for an empty slot and for an index past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index).and_then(Option::as_ref)
    }

    /// Get a mutable reference to the value at `index`.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index).and_then(Option::as_mut)
    }

    /// Store `value` at `index`, growing the column if needed.
    ///
    /// Any previous value at `index` is overwritten.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.grow_to(index);
        self.data[index].insert(value)
    }

    /// Build a value at `index` from constructor arguments.
    ///
    /// Same growth and overwrite rules as [`SparseArray::insert`], except that
    /// the previous occupant is dropped before the new value is built.
    pub fn emplace<A>(&mut self, index: usize, args: A) -> &mut T
    where
        T: From<A>,
    {
        self.emplace_with(index, || T::from(args))
    }

    /// Build a value at `index` with `f`, dropping the previous occupant first.
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.grow_to(index);
        let slot = &mut self.data[index];
        drop(slot.take());
        slot.insert(f())
    }

    /// Empty slot `index`. Does nothing if the slot is empty or out of range.
    pub fn clear(&mut self, index: usize) {
        drop(self.take(index));
    }

    /// Empty slot `index` and return its previous value.
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.data.get_mut(index).and_then(Option::take)
    }

    /// Returns the slot index of a value borrowed from this column.
    ///
    /// The lookup is by address, not by value: an equal value stored
    /// elsewhere is not found.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ValueNotFound`] if `value` does not live in
    /// this column.
    pub fn index_of(&self, value: &T) -> Result<usize, StorageError> {
        self.data
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|stored| std::ptr::eq(stored, value)))
            .ok_or(StorageError::ValueNotFound)
    }

    /// Iterate over every slot, including empty ones, in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Option<T>> {
        self.data.iter()
    }

    /// Iterate mutably over every slot, in index order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Option<T>> {
        self.data.iter_mut()
    }

    /// Iterate over occupied slots only, with their indices.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (usize, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }

    fn grow_to(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }
}

impl<T> Default for SparseArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for SparseArray<T> {
    type Output = Option<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for SparseArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<'a, T> IntoIterator for &'a SparseArray<T> {
    type Item = &'a Option<T>;
    type IntoIter = std::slice::Iter<'a, Option<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SparseArray<T> {
    type Item = &'a mut Option<T>;
    type IntoIter = std::slice::IterMut<'a, Option<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> FromIterator<Option<T>> for SparseArray<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}
