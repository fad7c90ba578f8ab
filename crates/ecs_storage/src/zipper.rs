//! Lock-step iteration over several sparse columns.
//!
//! A [`Zipper`] walks a tuple of columns side by side and yields the values
//! found at every index where *all* of them are occupied; indices missing
//! from at least one column are skipped. [`IndexedZipper`] does the same and
//! also yields the index.
//!
//! Columns are passed as a tuple of `&SparseArray<T>` and/or
//! `&mut SparseArray<T>` (one to eight columns). Shared columns yield `&T`,
//! mutable columns yield `&mut T` pointing straight into the column.
//!
//! ```rust
//! use ecs_storage::{IndexedZipper, SparseArray};
//!
//! let mut positions = SparseArray::new();
//! let mut velocities = SparseArray::new();
//! positions.insert(0, 0.0_f32);
//! positions.insert(2, 1.0);
//! velocities.insert(2, 0.5_f32);
//!
//! for (index, (pos, vel)) in IndexedZipper::new((&mut positions, &velocities)) {
//!     assert_eq!(index, 2);
//!     *pos += *vel;
//! }
//! assert_eq!(positions.get(2), Some(&1.5));
//! ```
//!
//! ## Bound
//!
//! The number of candidate indices is the length of the shortest column at
//! construction time. The zipper borrows its columns for as long as it
//! lives, so they cannot be resized underneath it.

use std::iter::FusedIterator;

use crate::sparse_array::SparseArray;

/// A forward-only position over the slots of one column.
pub trait SlotCursor {
    /// The reference type produced for an occupied slot.
    type Item;

    /// Returns `true` if the slot under the cursor holds a value.
    fn is_occupied(&self) -> bool;

    /// Move to the next slot.
    fn advance(&mut self);

    /// Take the value under the cursor, if any.
    ///
    /// For mutable cursors the slot can only be taken once; it reads as
    /// unoccupied afterwards until the cursor advances.
    fn take(&mut self) -> Option<Self::Item>;
}

/// Cursor over a shared column.
#[derive(Debug)]
pub struct Cursor<'a, T> {
    slots: std::slice::Iter<'a, Option<T>>,
    current: Option<&'a Option<T>>,
}

impl<'a, T> SlotCursor for Cursor<'a, T> {
    type Item = &'a T;

    fn is_occupied(&self) -> bool {
        matches!(self.current, Some(Some(_)))
    }

    fn advance(&mut self) {
        self.current = self.slots.next();
    }

    fn take(&mut self) -> Option<&'a T> {
        self.current.and_then(Option::as_ref)
    }
}

/// Cursor over a mutable column.
#[derive(Debug)]
pub struct CursorMut<'a, T> {
    slots: std::slice::IterMut<'a, Option<T>>,
    current: Option<&'a mut Option<T>>,
}

impl<'a, T> SlotCursor for CursorMut<'a, T> {
    type Item = &'a mut T;

    fn is_occupied(&self) -> bool {
        matches!(self.current, Some(Some(_)))
    }

    fn advance(&mut self) {
        self.current = self.slots.next();
    }

    fn take(&mut self) -> Option<&'a mut T> {
        self.current.take().and_then(Option::as_mut)
    }
}

/// A column that can take part in a zipper.
pub trait ZipColumn {
    /// The cursor walking this column.
    type Cursor: SlotCursor;

    /// Number of slots in the column.
    fn slot_count(&self) -> usize;

    /// Build a cursor positioned on the first slot.
    fn into_cursor(self) -> Self::Cursor;
}

impl<'a, T> ZipColumn for &'a SparseArray<T> {
    type Cursor = Cursor<'a, T>;

    fn slot_count(&self) -> usize {
        self.len()
    }

    fn into_cursor(self) -> Self::Cursor {
        let mut slots = self.iter();
        let current = slots.next();
        Cursor { slots, current }
    }
}

impl<'a, T> ZipColumn for &'a mut SparseArray<T> {
    type Cursor = CursorMut<'a, T>;

    fn slot_count(&self) -> usize {
        self.len()
    }

    fn into_cursor(self) -> Self::Cursor {
        let mut slots = self.iter_mut();
        let current = slots.next();
        CursorMut { slots, current }
    }
}

/// A tuple of columns walked together.
pub trait ZipColumns {
    /// The matching tuple of cursors.
    type Cursors: CursorSet;

    /// Length of the shortest column.
    fn min_len(&self) -> usize;

    /// Build one cursor per column.
    fn into_cursors(self) -> Self::Cursors;
}

/// A tuple of cursors moved in lock-step.
pub trait CursorSet {
    /// Tuple of the per-column items.
    type Item;

    /// Returns `true` if every cursor sits on an occupied slot.
    fn all_occupied(&self) -> bool;

    /// Advance every cursor by one slot.
    fn advance_all(&mut self);

    /// Take the values under every cursor, or `None` if any slot is empty.
    fn take_all(&mut self) -> Option<Self::Item>;
}

macro_rules! impl_zip_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: ZipColumn),+> ZipColumns for ($($name,)+) {
            type Cursors = ($($name::Cursor,)+);

            fn min_len(&self) -> usize {
                let mut len = usize::MAX;
                $(len = len.min(self.$idx.slot_count());)+
                len
            }

            fn into_cursors(self) -> Self::Cursors {
                ($(self.$idx.into_cursor(),)+)
            }
        }

        impl<$($name: SlotCursor),+> CursorSet for ($($name,)+) {
            type Item = ($($name::Item,)+);

            fn all_occupied(&self) -> bool {
                $(self.$idx.is_occupied())&&+
            }

            fn advance_all(&mut self) {
                $(self.$idx.advance();)+
            }

            fn take_all(&mut self) -> Option<Self::Item> {
                Some(($(self.$idx.take()?,)+))
            }
        }
    };
}

impl_zip_tuple!(A 0);
impl_zip_tuple!(A 0, B 1);
impl_zip_tuple!(A 0, B 1, C 2);
impl_zip_tuple!(A 0, B 1, C 2, D 3);
impl_zip_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_zip_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_zip_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_zip_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);

/// Iterates over the values of every index occupied in all of its columns.
///
/// Items are tuples with one reference per column, in column order. A
/// zipper is consumed by iteration; build a new one to scan again.
pub struct Zipper<C> {
    cursors: C,
    /// Shortest column length at construction.
    max: usize,
    /// Index under the cursors. `max - idx == 0` means exhausted.
    idx: usize,
}

impl<C: CursorSet> Zipper<C> {
    /// Build a zipper over `columns`, positioned on the first index where
    /// every column is occupied.
    pub fn new<S>(columns: S) -> Self
    where
        S: ZipColumns<Cursors = C>,
    {
        let max = columns.min_len();
        let mut zipper = Self {
            cursors: columns.into_cursors(),
            max,
            idx: 0,
        };
        if zipper.max > 0 && !zipper.cursors.all_occupied() {
            zipper.advance();
        }
        zipper
    }

    /// Build an already-exhausted zipper over `columns`.
    ///
    /// It compares equal to any zipper that has run out of items.
    pub fn end<S>(columns: S) -> Self
    where
        S: ZipColumns<Cursors = C>,
    {
        Self {
            cursors: columns.into_cursors(),
            max: 0,
            idx: 0,
        }
    }

    /// Number of candidate indices left before the zipper is exhausted.
    #[must_use]
    pub fn remaining_bound(&self) -> usize {
        self.max - self.idx
    }

    /// Returns `true` once no items remain.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.remaining_bound() == 0
    }

    fn advance(&mut self) {
        if self.max == 0 {
            return;
        }
        let last = self.max - 1;
        if self.idx == last {
            self.cursors.advance_all();
            self.idx += 1;
        } else if self.idx < last {
            loop {
                self.cursors.advance_all();
                self.idx += 1;
                if self.cursors.all_occupied() || self.idx == last {
                    break;
                }
            }
        }
        // Collapse onto the terminal position when the last candidate is
        // not fully occupied.
        if self.idx == last && !self.cursors.all_occupied() {
            self.cursors.advance_all();
            self.idx += 1;
        }
    }
}

impl<C: CursorSet> Iterator for Zipper<C> {
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_end() {
            return None;
        }
        let item = self.cursors.take_all();
        self.advance();
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining_bound()))
    }
}

impl<C: CursorSet> FusedIterator for Zipper<C> {}

impl<C, D> PartialEq<Zipper<D>> for Zipper<C> {
    fn eq(&self, other: &Zipper<D>) -> bool {
        self.max - self.idx == other.max - other.idx
    }
}

impl<C> std::fmt::Debug for Zipper<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zipper")
            .field("idx", &self.idx)
            .field("max", &self.max)
            .finish_non_exhaustive()
    }
}

/// A [`Zipper`] that also yields the index of every item.
///
/// Items are `(index, (refs...))`.
pub struct IndexedZipper<C> {
    inner: Zipper<C>,
}

impl<C: CursorSet> IndexedZipper<C> {
    /// Build an indexed zipper over `columns`.
    pub fn new<S>(columns: S) -> Self
    where
        S: ZipColumns<Cursors = C>,
    {
        Self {
            inner: Zipper::new(columns),
        }
    }

    /// Build an already-exhausted indexed zipper over `columns`.
    pub fn end<S>(columns: S) -> Self
    where
        S: ZipColumns<Cursors = C>,
    {
        Self {
            inner: Zipper::end(columns),
        }
    }

    /// Number of candidate indices left before the zipper is exhausted.
    #[must_use]
    pub fn remaining_bound(&self) -> usize {
        self.inner.remaining_bound()
    }

    /// Returns `true` once no items remain.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }
}

impl<C: CursorSet> Iterator for IndexedZipper<C> {
    type Item = (usize, C::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.inner.idx;
        self.inner.next().map(|item| (index, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<C: CursorSet> FusedIterator for IndexedZipper<C> {}

impl<C, D> PartialEq<IndexedZipper<D>> for IndexedZipper<C> {
    fn eq(&self, other: &IndexedZipper<D>) -> bool {
        self.inner == other.inner
    }
}

impl<C> std::fmt::Debug for IndexedZipper<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedZipper")
            .field("idx", &self.inner.idx)
            .field("max", &self.inner.max)
            .finish_non_exhaustive()
    }
}

/// Shorthand for [`Zipper::new`].
pub fn zip<S: ZipColumns>(columns: S) -> Zipper<S::Cursors> {
    Zipper::new(columns)
}

/// Shorthand for [`IndexedZipper::new`].
pub fn indexed_zip<S: ZipColumns>(columns: S) -> IndexedZipper<S::Cursors> {
    IndexedZipper::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Columns of length 20: `evens` occupied at even indices, `odds` at odd.
    fn even_odd() -> (SparseArray<i32>, SparseArray<i64>) {
        let mut evens = SparseArray::new();
        let mut odds = SparseArray::new();
        for i in 0..20 {
            if i % 2 == 0 {
                evens.insert(i, i as i32);
            } else {
                odds.insert(i, i as i64);
            }
        }
        (evens, odds)
    }

    #[test]
    fn test_single_column_yields_occupied_only() {
        let (evens, _) = even_odd();
        let values: Vec<i32> = Zipper::new((&evens,)).map(|(v,)| *v).collect();
        assert_eq!(values, (0..20).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_indexed_single_column_yields_even_indices() {
        let (evens, _) = even_odd();
        for (index, (value,)) in IndexedZipper::new((&evens,)) {
            assert_eq!(index % 2, 0);
            assert_eq!(*value as usize, index);
        }
    }

    #[test]
    fn test_disjoint_columns_yield_nothing() {
        let (evens, odds) = even_odd();
        assert_eq!(Zipper::new((&evens, &odds)).count(), 0);
        assert_eq!(IndexedZipper::new((&evens, &odds)).count(), 0);
    }

    #[test]
    fn test_matching_columns_yield_every_match() {
        let mut a = SparseArray::new();
        let mut b = SparseArray::new();
        for i in (1..20).step_by(2) {
            a.insert(i, 10);
            b.insert(i, 10_i64);
        }
        assert_eq!(Zipper::new((&a, &b)).count(), 10);

        let indices: Vec<usize> = IndexedZipper::new((&a, &b)).map(|(i, _)| i).collect();
        assert_eq!(indices, (1..20).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_bound_is_shortest_column() {
        let mut long = SparseArray::new();
        let mut short = SparseArray::new();
        for i in 0..10 {
            long.insert(i, i);
        }
        for i in 0..4 {
            short.insert(i, i);
        }
        let zipper = IndexedZipper::new((&long, &short));
        assert_eq!(zipper.remaining_bound(), 4);
        let indices: Vec<usize> = zipper.map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_last_candidate_is_visited() {
        let mut a = SparseArray::new();
        let mut b = SparseArray::new();
        a.insert(5, 'a');
        b.insert(5, 'b');
        let items: Vec<_> = IndexedZipper::new((&a, &b)).collect();
        assert_eq!(items, vec![(5, (&'a', &'b'))]);
    }

    #[test]
    fn test_unaligned_tail_terminates() {
        let mut a = SparseArray::new();
        let mut b = SparseArray::new();
        a.insert(0, 1);
        b.insert(0, 1);
        a.insert(3, 1);
        b.insert(2, 1);
        b.insert(3, 1);
        a.clear(3);
        let mut zipper = IndexedZipper::new((&a, &b));
        assert_eq!(zipper.next().map(|(i, _)| i), Some(0));
        assert!(zipper.is_end());
        assert_eq!(zipper.next(), None);
    }

    #[test]
    fn test_empty_column_is_immediately_exhausted() {
        let (evens, _) = even_odd();
        let empty: SparseArray<u8> = SparseArray::new();
        let zipper = Zipper::new((&evens, &empty));
        assert!(zipper.is_end());
        assert_eq!(zipper.count(), 0);
    }

    #[test]
    fn test_mutation_is_visible_in_column() {
        let mut positions = SparseArray::new();
        let mut velocities = SparseArray::new();
        for i in 0..6 {
            positions.insert(i, 0);
            if i % 3 == 0 {
                velocities.insert(i, 2);
            }
        }
        for (pos, vel) in Zipper::new((&mut positions, &velocities)) {
            *pos += *vel;
        }
        let moved: Vec<i32> = positions.iter().map(|slot| slot.unwrap()).collect();
        assert_eq!(moved, vec![2, 0, 0, 2, 0, 0]);
    }

    #[test]
    fn test_two_mutable_columns() {
        let mut a = SparseArray::new();
        let mut b = SparseArray::new();
        a.insert(1, 1);
        b.insert(1, 2);
        for (x, y) in Zipper::new((&mut a, &mut b)) {
            std::mem::swap(x, y);
        }
        assert_eq!(a.get(1), Some(&2));
        assert_eq!(b.get(1), Some(&1));
    }

    #[test]
    fn test_exhausted_zipper_equals_end() {
        let (evens, odds) = even_odd();
        let mut zipper = Zipper::new((&evens,));
        assert_ne!(zipper, Zipper::end((&evens,)));
        zipper.by_ref().for_each(drop);
        assert_eq!(zipper, Zipper::end((&evens,)));
        assert_eq!(Zipper::new((&evens, &odds)), Zipper::end((&evens, &odds)));
    }

    #[test]
    fn test_zipper_is_fused() {
        let (evens, _) = even_odd();
        let mut zipper = zip((&evens,));
        zipper.by_ref().for_each(drop);
        assert!(zipper.next().is_none());
        assert!(zipper.next().is_none());
    }

    #[test]
    fn test_three_columns() {
        let mut a = SparseArray::new();
        let mut b = SparseArray::new();
        let mut c = SparseArray::new();
        for i in 0..12 {
            if i % 2 == 0 {
                a.insert(i, i);
            }
            if i % 3 == 0 {
                b.insert(i, i);
            }
            c.insert(i, i);
        }
        let indices: Vec<usize> = indexed_zip((&a, &b, &c)).map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 6]);
    }
}
