// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The contract every map strategy implements.
//!
//! [`Map`] is the capacity-bounded base: lookup, insert-or-replace,
//! removal, filtering and iteration. [`NavigableMap`] adds the ordered
//! queries: extrema, the four neighbour queries and polling. Code that
//! only needs those operations can be written once against the traits
//! and run over any of the strategies.
//!
//! # Examples
//!
//! ```
//! # use keyed::{AvlTreeMap, Map, NavigableMap, SkipListMap};
//! fn second_smallest<M: NavigableMap<i32, &'static str>>(map: &M) -> Option<i32> {
//!     let (first, _) = map.first_entry()?;
//!     map.higher_entry(first).map(|(k, _)| *k)
//! }
//!
//! let avl: AvlTreeMap<_, _> = vec![(3, "c"), (1, "a"), (2, "b")].into();
//! let skip: SkipListMap<_, _> = vec![(3, "c"), (1, "a"), (2, "b")].into();
//! assert_eq!(Some(2), second_smallest(&avl));
//! assert_eq!(Some(2), second_smallest(&skip));
//! ```

use std::cmp::Ordering;
use std::iter::{FusedIterator, Rev};
use std::ops::{Bound, RangeBounds};

use crate::capacity::Capacity;
use crate::error::MapError;

/// A total order on keys.
///
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator, so a reversed
/// map is just `AvlTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a))`.
pub trait Comparator<K: ?Sized> {
    /// Compare two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The comparator that uses the key's own [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// A capacity-bounded map from unique keys to values.
pub trait Map<K, V> {
    /// The iterator over key/value pairs, in the map's natural order.
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// The number of entries in the map.
    fn len(&self) -> usize;

    /// Test whether the map is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The maximum number of entries the map may hold.
    fn capacity(&self) -> Capacity;

    /// Test whether a new key would overflow the map.
    fn is_full(&self) -> bool {
        self.capacity().is_full(self.len())
    }

    /// How many new keys still fit, or `None` for an unbounded map.
    fn remaining(&self) -> Option<usize> {
        self.capacity().remaining(self.len())
    }

    /// Get the value for a key.
    fn get(&self, key: &K) -> Option<&V>;

    /// Get a mutable reference to the value for a key.
    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Test for the presence of a key.
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Test whether any entry has the given value.
    ///
    /// Time: O(n)
    fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    /// Insert a key/value mapping, returning the value it replaced.
    ///
    /// Replacing the value of an existing key always succeeds. Adding a
    /// new key to a full map consults the overflow policy, and fails
    /// with [`MapError::Overflow`] if the policy doesn't make room.
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError>;

    /// Remove the mapping for a key, returning its value.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Remove every entry for which `keep` returns `false`, returning
    /// the number of entries removed.
    fn filter_entries<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool;

    /// Remove every entry.
    fn clear(&mut self);

    /// Iterate over the entries in the map's natural order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Iterate over the keys in the map's natural order.
    fn keys(&self) -> Keys<Self::Iter<'_>> {
        Keys { it: self.iter() }
    }

    /// Iterate over the values in the map's natural order.
    fn values(&self) -> Values<Self::Iter<'_>> {
        Values { it: self.iter() }
    }

    /// Copy every entry out into a vector, in the map's natural order.
    fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// A [`Map`] whose keys are kept in the order of a [`Comparator`].
///
/// Equal keys never appear twice, and iteration is in ascending key
/// order, so `descending_iter` is exactly the reverse of `iter`.
pub trait NavigableMap<K, V>: Map<K, V> {
    /// Compare two keys with the map's comparator.
    fn compare_keys(&self, a: &K, b: &K) -> Ordering;

    /// The entry with the smallest key.
    fn first_entry(&self) -> Option<(&K, &V)>;

    /// The entry with the largest key.
    fn last_entry(&self) -> Option<(&K, &V)>;

    /// The entry with the greatest key less than or equal to `key`.
    fn floor_entry(&self, key: &K) -> Option<(&K, &V)>;

    /// The entry with the least key greater than or equal to `key`.
    fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)>;

    /// The entry with the greatest key strictly less than `key`.
    fn lower_entry(&self, key: &K) -> Option<(&K, &V)>;

    /// The entry with the least key strictly greater than `key`.
    fn higher_entry(&self, key: &K) -> Option<(&K, &V)>;

    /// Remove and return the entry with the smallest key.
    fn poll_first_entry(&mut self) -> Option<(K, V)>;

    /// Remove and return the entry with the largest key.
    fn poll_last_entry(&mut self) -> Option<(K, V)>;

    /// The smallest key, failing with [`MapError::Underflow`] if the map
    /// is empty.
    fn first_key<'a>(&'a self) -> Result<&'a K, MapError>
    where
        K: 'a,
        V: 'a,
    {
        self.first_entry().map(|(k, _)| k).ok_or(MapError::Underflow)
    }

    /// The largest key, failing with [`MapError::Underflow`] if the map
    /// is empty.
    fn last_key<'a>(&'a self) -> Result<&'a K, MapError>
    where
        K: 'a,
        V: 'a,
    {
        self.last_entry().map(|(k, _)| k).ok_or(MapError::Underflow)
    }

    /// The greatest key less than or equal to `key`.
    fn floor_key<'a>(&'a self, key: &K) -> Option<&'a K>
    where
        K: 'a,
        V: 'a,
    {
        self.floor_entry(key).map(|(k, _)| k)
    }

    /// The least key greater than or equal to `key`.
    fn ceiling_key<'a>(&'a self, key: &K) -> Option<&'a K>
    where
        K: 'a,
        V: 'a,
    {
        self.ceiling_entry(key).map(|(k, _)| k)
    }

    /// The greatest key strictly less than `key`.
    fn lower_key<'a>(&'a self, key: &K) -> Option<&'a K>
    where
        K: 'a,
        V: 'a,
    {
        self.lower_entry(key).map(|(k, _)| k)
    }

    /// The least key strictly greater than `key`.
    fn higher_key<'a>(&'a self, key: &K) -> Option<&'a K>
    where
        K: 'a,
        V: 'a,
    {
        self.higher_entry(key).map(|(k, _)| k)
    }

    /// Iterate over the entries in descending key order.
    fn descending_iter<'a>(&'a self) -> Rev<Self::Iter<'a>>
    where
        Self::Iter<'a>: DoubleEndedIterator,
    {
        self.iter().rev()
    }

    /// Iterate over the entries whose keys fall inside `range`, in
    /// ascending order.
    ///
    /// Each step is a neighbour query, so this costs O(log n) per entry
    /// rather than the amortised O(1) of a full iteration.
    fn range<R>(&self, range: R) -> RangedIter<'_, K, V, Self, R>
    where
        R: RangeBounds<K>,
        Self: Sized,
    {
        let next = match range.start_bound() {
            Bound::Included(start) => self.ceiling_entry(start),
            Bound::Excluded(start) => self.higher_entry(start),
            Bound::Unbounded => self.first_entry(),
        };
        RangedIter {
            map: self,
            range,
            next,
        }
    }
}

/// An iterator over the keys of a map.
pub struct Keys<I> {
    it: I,
}

impl<'a, K: 'a, V: 'a, I> Iterator for Keys<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K: 'a, V: 'a, I> DoubleEndedIterator for Keys<I>
where
    I: DoubleEndedIterator<Item = (&'a K, &'a V)>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|(k, _)| k)
    }
}

impl<'a, K: 'a, V: 'a, I> ExactSizeIterator for Keys<I> where
    I: ExactSizeIterator<Item = (&'a K, &'a V)>
{
}

impl<'a, K: 'a, V: 'a, I> FusedIterator for Keys<I> where I: FusedIterator<Item = (&'a K, &'a V)> {}

/// An iterator over the values of a map.
pub struct Values<I> {
    it: I,
}

impl<'a, K: 'a, V: 'a, I> Iterator for Values<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K: 'a, V: 'a, I> DoubleEndedIterator for Values<I>
where
    I: DoubleEndedIterator<Item = (&'a K, &'a V)>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|(_, v)| v)
    }
}

impl<'a, K: 'a, V: 'a, I> ExactSizeIterator for Values<I> where
    I: ExactSizeIterator<Item = (&'a K, &'a V)>
{
}

impl<'a, K: 'a, V: 'a, I> FusedIterator for Values<I> where
    I: FusedIterator<Item = (&'a K, &'a V)>
{
}

/// An iterator over a range of entries of a navigable map.
pub struct RangedIter<'a, K, V, M, R> {
    map: &'a M,
    range: R,
    next: Option<(&'a K, &'a V)>,
}

impl<'a, K, V, M, R> Iterator for RangedIter<'a, K, V, M, R>
where
    M: NavigableMap<K, V>,
    R: RangeBounds<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.next.take()?;
        let inside = match self.range.end_bound() {
            Bound::Included(end) => self.map.compare_keys(key, end) != Ordering::Greater,
            Bound::Excluded(end) => self.map.compare_keys(key, end) == Ordering::Less,
            Bound::Unbounded => true,
        };
        if !inside {
            return None;
        }
        self.next = self.map.higher_entry(key);
        Some((key, value))
    }
}

impl<'a, K, V, M, R> FusedIterator for RangedIter<'a, K, V, M, R>
where
    M: NavigableMap<K, V>,
    R: RangeBounds<K>,
{
}

/// Test whether a sequence of keys is in non-decreasing order.
pub fn is_ordered<'a, K, I, C>(keys: I, comparator: &C) -> bool
where
    K: 'a + ?Sized,
    I: IntoIterator<Item = &'a K>,
    C: Comparator<K> + ?Sized,
{
    holds_pairwise(keys, |a, b| comparator.compare(a, b) != Ordering::Greater)
}

/// Test whether a sequence of keys is in strictly increasing order, which
/// also rules out duplicates.
pub fn is_strictly_ordered<'a, K, I, C>(keys: I, comparator: &C) -> bool
where
    K: 'a + ?Sized,
    I: IntoIterator<Item = &'a K>,
    C: Comparator<K> + ?Sized,
{
    holds_pairwise(keys, |a, b| comparator.compare(a, b) == Ordering::Less)
}

fn holds_pairwise<'a, K, I, F>(keys: I, mut test: F) -> bool
where
    K: 'a + ?Sized,
    I: IntoIterator<Item = &'a K>,
    F: FnMut(&K, &K) -> bool,
{
    let mut keys = keys.into_iter();
    let Some(mut prev) = keys.next() else {
        return true;
    };
    for key in keys {
        if !test(prev, key) {
            return false;
        }
        prev = key;
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ordering_checks() {
        let keys = [1, 2, 2, 5];
        assert!(is_ordered(&keys, &NaturalOrder));
        assert!(!is_strictly_ordered(&keys, &NaturalOrder));
        assert!(is_strictly_ordered(&[1, 2, 5], &NaturalOrder));
        assert!(is_ordered(&[] as &[i32], &NaturalOrder));
        let reversed = |a: &i32, b: &i32| b.cmp(a);
        assert!(is_strictly_ordered(&[5, 2, 1], &reversed));
        assert!(!is_ordered(&[1, 2], &reversed));
    }

    #[test]
    fn closures_are_comparators() {
        let by_len = |a: &str, b: &str| a.len().cmp(&b.len());
        assert_eq!(Ordering::Less, by_len.compare("a", "bb"));
        assert_eq!(Ordering::Greater, NaturalOrder.compare("b", "a"));
    }
}
