// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A hash map using separate chaining.
//!
//! Entries live in singly linked chains hanging off a prime-sized bucket
//! array. Each node caches its key's hash, so growing the table relinks
//! the existing nodes into their new buckets without rehashing a single
//! key and without moving any entry.
//!
//! Lookups, inserts and removals are expected O(1) for a decent hasher.
//! The table grows to the next prime at least twice its size once the
//! number of entries exceeds `buckets * load_factor`.
//!
//! Entries come out in bucket order, which depends on the hasher and the
//! table size. No other ordering guarantee is offered.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{Debug, Error, Formatter};
use std::hash::{BuildHasher, Hash};
use std::iter::{FromIterator, FusedIterator};
use std::mem;
use std::ops::Index;
use std::slice;

use log::{debug, warn};

use crate::capacity::{make_room, Capacity, Evict, SharedPolicy};
use crate::config::{MapConfig, DEFAULT_CHAINED_LOAD_FACTOR, MIN_TABLE_LEN};
use crate::error::MapError;
use crate::map::Map;
use crate::util::{bucket_index, grown_table_len, hash_key};

/// Construct a chained hash map from a sequence of key/value pairs.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate keyed;
/// # use keyed::{ChainedHashMap, Map};
/// let map = chained_map! {
///     1 => 11,
///     2 => 22,
///     3 => 33,
/// };
/// assert_eq!(Some(&22), map.get(&2));
/// ```
#[macro_export]
macro_rules! chained_map {
    () => { $crate::hash::chained::ChainedHashMap::new() };

    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        let mut map = $crate::hash::chained::ChainedHashMap::new();
        $({
            map.insert_unbounded($key, $value);
        })*;
        map
    }};
}

struct ChainNode<K, V> {
    hash: u64,
    key: K,
    value: V,
    next: Option<Box<ChainNode<K, V>>>,
}

impl<K, V> ChainNode<K, V> {
    #[inline]
    fn matches<BK>(&self, hash: u64, key: &BK) -> bool
    where
        BK: Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.hash == hash && self.key.borrow() == key
    }
}

type Chain<K, V> = Option<Box<ChainNode<K, V>>>;

fn empty_table<K, V>(len: usize) -> Vec<Chain<K, V>> {
    let mut buckets = Vec::with_capacity(len);
    buckets.resize_with(len, || None);
    buckets
}

/// A hash map using separate chaining.
///
/// See the [module documentation][crate::hash::chained] for the layout.
pub struct ChainedHashMap<K, V, S = RandomState> {
    buckets: Vec<Chain<K, V>>,
    len: usize,
    load_factor: f64,
    capacity: Capacity,
    overflow: SharedPolicy<K, V>,
    hasher: S,
}

impl<K, V> ChainedHashMap<K, V, RandomState> {
    /// Construct an empty, unbounded hash map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty hash map from a configuration.
    ///
    /// Fails if the configured load factor isn't a positive number.
    pub fn with_config(config: MapConfig<K, V>) -> Result<Self, MapError> {
        Self::with_hasher_and_config(RandomState::new(), config)
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Construct an empty, unbounded hash map using the provided hasher.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        ChainedHashMap {
            buckets: empty_table(MIN_TABLE_LEN),
            len: 0,
            load_factor: DEFAULT_CHAINED_LOAD_FACTOR,
            capacity: Capacity::Unbounded,
            overflow: MapConfig::new().overflow,
            hasher,
        }
    }

    /// Construct an empty hash map using the provided hasher and
    /// configuration.
    pub fn with_hasher_and_config(hasher: S, config: MapConfig<K, V>) -> Result<Self, MapError> {
        let load_factor = config.load_factor_or(DEFAULT_CHAINED_LOAD_FACTOR)?;
        Ok(ChainedHashMap {
            buckets: empty_table(MIN_TABLE_LEN),
            len: 0,
            load_factor,
            capacity: config.capacity,
            overflow: config.overflow,
            hasher,
        })
    }

    /// Get the number of entries in the map.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Test whether the map is empty.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of buckets in the table.
    #[must_use]
    pub fn table_len(&self) -> usize {
        self.buckets.len()
    }

    /// Get a reference to the map's [`BuildHasher`].
    #[must_use]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Get an iterator over the key/value pairs of the map, in bucket
    /// order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.len,
        }
    }

    /// Get an iterator over the key/value pairs of the map with mutable
    /// references to the values.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            buckets: self.buckets.iter_mut(),
            chain: None,
            remaining: self.len,
        }
    }

    /// Get an iterator over mutable references to the values of the map.
    #[must_use]
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, value)| value)
    }

    fn unlink_all(&mut self) {
        for bucket in &mut self.buckets {
            let mut next = bucket.take();
            while let Some(mut node) = next {
                next = node.next.take();
            }
        }
    }

    /// Panic unless the internal structure is consistent.
    #[cfg(any(test, feature = "debug"))]
    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        K: Hash,
        S: BuildHasher,
    {
        let mut count = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            let mut node = bucket.as_deref();
            while let Some(n) = node {
                assert_eq!(hash_key(&self.hasher, &n.key), n.hash);
                assert_eq!(index, bucket_index(n.hash, self.buckets.len()));
                count += 1;
                node = n.next.as_deref();
            }
        }
        assert_eq!(self.len, count);
        assert!(self.len as f64 <= self.buckets.len() as f64 * self.load_factor);
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn find<BK>(&self, hash: u64, key: &BK) -> Option<&ChainNode<K, V>>
    where
        BK: Eq + ?Sized,
        K: Borrow<BK>,
    {
        let mut node = self.buckets[bucket_index(hash, self.buckets.len())].as_deref();
        while let Some(n) = node {
            if n.matches(hash, key) {
                return Some(n);
            }
            node = n.next.as_deref();
        }
        None
    }

    fn find_mut<BK>(&mut self, hash: u64, key: &BK) -> Option<&mut ChainNode<K, V>>
    where
        BK: Eq + ?Sized,
        K: Borrow<BK>,
    {
        let index = bucket_index(hash, self.buckets.len());
        let mut node = self.buckets[index].as_deref_mut();
        while let Some(n) = node {
            if n.matches(hash, key) {
                return Some(n);
            }
            node = n.next.as_deref_mut();
        }
        None
    }

    /// Get the value for a key from the map.
    ///
    /// Time: O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// # #[macro_use] extern crate keyed;
    /// let map = chained_map! {"one".to_string() => 1};
    /// assert_eq!(Some(&1), map.get("one"));
    /// ```
    #[must_use]
    pub fn get<BK>(&self, key: &BK) -> Option<&V>
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Get the key/value pair for a key from the map.
    #[must_use]
    pub fn get_key_value<BK>(&self, key: &BK) -> Option<(&K, &V)>
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.find(hash_key(&self.hasher, key), key)
            .map(|node| (&node.key, &node.value))
    }

    /// Get a mutable reference to the value for a key from the map.
    #[must_use]
    pub fn get_mut<BK>(&mut self, key: &BK) -> Option<&mut V>
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        let hash = hash_key(&self.hasher, key);
        self.find_mut(hash, key).map(|node| &mut node.value)
    }

    /// Test for the presence of a key in the map.
    #[must_use]
    pub fn contains_key<BK>(&self, key: &BK) -> bool
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.get_key_value(key).is_some()
    }

    /// Remove a key from the map, returning the value it held.
    ///
    /// Time: O(1)
    pub fn remove<BK>(&mut self, key: &BK) -> Option<V>
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.remove_with_key(key).map(|(_, v)| v)
    }

    /// Remove a key from the map, returning the key and value it held.
    pub fn remove_with_key<BK>(&mut self, key: &BK) -> Option<(K, V)>
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        let hash = hash_key(&self.hasher, key);
        let index = bucket_index(hash, self.buckets.len());
        let mut link = &mut self.buckets[index];
        while link.as_ref().is_some_and(|node| !node.matches(hash, key)) {
            link = &mut link.as_mut()?.next;
        }
        let mut node = link.take()?;
        *link = node.next.take();
        self.len -= 1;
        let ChainNode { key, value, .. } = *node;
        Some((key, value))
    }

    /// Insert into a map known not to be bounded, for the macros and
    /// `FromIterator`.
    #[doc(hidden)]
    pub fn insert_unbounded(&mut self, key: K, value: V) -> Option<V> {
        let hash = hash_key(&self.hasher, &key);
        if let Some(node) = self.find_mut(hash, &key) {
            return Some(mem::replace(&mut node.value, value));
        }
        self.link_new(hash, key, value);
        None
    }

    fn link_new(&mut self, hash: u64, key: K, value: V) {
        let index = bucket_index(hash, self.buckets.len());
        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(ChainNode {
            hash,
            key,
            value,
            next,
        }));
        self.len += 1;
        while (self.buckets.len() as f64) * self.load_factor < self.len as f64 && self.rehash() {}
    }

    /// Grow the table one step, returning false if it's already as large
    /// as it may get.
    fn rehash(&mut self) -> bool {
        let old_len = self.buckets.len();
        let new_len = grown_table_len(old_len);
        if new_len <= old_len {
            warn!("chained table is at its size limit of {old_len} buckets, chains will grow");
            return false;
        }
        debug!(
            "rehashing chained table from {old_len} to {new_len} buckets for {} entries",
            self.len
        );
        let old = mem::replace(&mut self.buckets, empty_table(new_len));
        for mut chain in old {
            while let Some(mut node) = chain {
                chain = node.next.take();
                let index = bucket_index(node.hash, new_len);
                node.next = self.buckets[index].take();
                self.buckets[index] = Some(node);
            }
        }
        true
    }
}

impl<K, V, S> Map<K, V> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Iter<'a>
        = Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> Capacity {
        self.capacity
    }

    fn get(&self, key: &K) -> Option<&V> {
        ChainedHashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        ChainedHashMap::get_mut(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        ChainedHashMap::contains_key(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        let hash = hash_key(&self.hasher, &key);
        if let Some(node) = self.find_mut(hash, &key) {
            return Ok(Some(mem::replace(&mut node.value, value)));
        }
        if self.capacity.is_full(self.len) {
            let policy = self.overflow.clone();
            let capacity = self.capacity;
            make_room(self, policy, capacity, &key, &value)?;
        }
        self.link_new(hash, key, value);
        Ok(None)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        ChainedHashMap::remove(self, key)
    }

    fn filter_entries<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut removed = 0;
        for bucket in &mut self.buckets {
            let mut link = bucket;
            while link.is_some() {
                if link
                    .as_ref()
                    .is_some_and(|node| !keep(&node.key, &node.value))
                {
                    if let Some(mut node) = link.take() {
                        *link = node.next.take();
                        removed += 1;
                    }
                } else if let Some(node) = link {
                    link = &mut node.next;
                }
            }
        }
        self.len -= removed;
        removed
    }

    fn clear(&mut self) {
        self.unlink_all();
        self.buckets = empty_table(MIN_TABLE_LEN);
        self.len = 0;
    }

    fn iter(&self) -> Iter<'_, K, V> {
        ChainedHashMap::iter(self)
    }
}

impl<K, V, S> Evict<K, V> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        self.len
    }

    fn evict(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn evict_first(&mut self) -> Option<(K, V)> {
        let bucket = self.buckets.iter_mut().find(|bucket| bucket.is_some())?;
        let mut node = bucket.take()?;
        *bucket = node.next.take();
        self.len -= 1;
        let ChainNode { key, value, .. } = *node;
        Some((key, value))
    }

    fn evict_last(&mut self) -> Option<(K, V)> {
        let mut link = self.buckets.iter_mut().rev().find(|bucket| bucket.is_some())?;
        while link.as_ref().is_some_and(|node| node.next.is_some()) {
            link = &mut link.as_mut()?.next;
        }
        let node = link.take()?;
        self.len -= 1;
        let ChainNode { key, value, .. } = *node;
        Some((key, value))
    }
}

// Core traits

impl<K, V, S> Drop for ChainedHashMap<K, V, S> {
    // Chains are dropped node by node; a hasher with many collisions could
    // otherwise make a chain deep enough to overflow the stack.
    fn drop(&mut self) {
        self.unlink_all();
    }
}

impl<K, V, S> Clone for ChainedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        ChainedHashMap {
            buckets: self.buckets.iter().map(clone_chain).collect(),
            len: self.len,
            load_factor: self.load_factor,
            capacity: self.capacity,
            overflow: self.overflow.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

fn clone_chain<K: Clone, V: Clone>(chain: &Chain<K, V>) -> Chain<K, V> {
    let mut head = None;
    let mut tail = &mut head;
    let mut source = chain.as_deref();
    while let Some(node) = source {
        let copy = tail.insert(Box::new(ChainNode {
            hash: node.hash,
            key: node.key.clone(),
            value: node.value.clone(),
            next: None,
        }));
        tail = &mut copy.next;
        source = node.next.as_deref();
    }
    head
}

impl<K, V, S> Default for ChainedHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K, V, S> Eq for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Debug for ChainedHashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<BK, K, V, S> Index<&BK> for ChainedHashMap<K, V, S>
where
    BK: Hash + Eq + ?Sized,
    K: Hash + Eq + Borrow<BK>,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &BK) -> &Self::Output {
        match self.get(key) {
            None => panic!("ChainedHashMap::index: invalid key"),
            Some(value) => value,
        }
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Put every pair into the map.
    ///
    /// # Panics
    ///
    /// Panics if the map is bounded and a new key overflows it.
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            if let Err(err) = self.put(key, value) {
                panic!("ChainedHashMap::extend: {err}");
            }
        }
    }
}

// Iterators

/// An iterator over the entries of a chained hash map.
pub struct Iter<'a, K, V> {
    buckets: slice::Iter<'a, Chain<K, V>>,
    chain: Option<&'a ChainNode<K, V>>,
    remaining: usize,
}

// We impl Clone instead of deriving it, because we want Clone even if K and V aren't.
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            buckets: self.buckets.clone(),
            chain: self.chain,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain {
                self.chain = node.next.as_deref();
                self.remaining -= 1;
                return Some((&node.key, &node.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// A mutable iterator over the entries of a chained hash map.
pub struct IterMut<'a, K, V> {
    buckets: slice::IterMut<'a, Chain<K, V>>,
    chain: Option<&'a mut ChainNode<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain.take() {
                let ChainNode {
                    key, value, next, ..
                } = node;
                self.chain = next.as_deref_mut();
                self.remaining -= 1;
                return Some((&*key, value));
            }
            self.chain = self.buckets.next()?.as_deref_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// A consuming iterator over the entries of a chained hash map.
pub struct ConsumingIter<K, V> {
    buckets: std::vec::IntoIter<Chain<K, V>>,
    chain: Chain<K, V>,
    remaining: usize,
}

impl<K, V> Iterator for ConsumingIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain.take() {
                let ChainNode {
                    key, value, next, ..
                } = *node;
                self.chain = next;
                self.remaining -= 1;
                return Some((key, value));
            }
            self.chain = self.buckets.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for ConsumingIter<K, V> {}

impl<K, V> FusedIterator for ConsumingIter<K, V> {}

impl<K, V> Drop for ConsumingIter<K, V> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for ChainedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = ConsumingIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let remaining = mem::take(&mut self.len);
        ConsumingIter {
            buckets: mem::take(&mut self.buckets).into_iter(),
            chain: None,
            remaining,
        }
    }
}

// Conversions

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T>(i: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::default();
        for (key, value) in i {
            map.insert_unbounded(key, value);
        }
        map
    }
}

impl<K, V, S> From<Vec<(K, V)>> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from(m: Vec<(K, V)>) -> Self {
        m.into_iter().collect()
    }
}

impl<'a, K, V, S> From<&'a [(K, V)]> for ChainedHashMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Default,
{
    fn from(m: &'a [(K, V)]) -> Self {
        m.iter().cloned().collect()
    }
}

// Tests

#[cfg(test)]
mod test {
    use super::*;
    use crate::capacity::EvictFirst;
    use crate::test::{ops, LolHasher, Op};
    #[rustfmt::skip]
    use ::proptest::{collection, num::i16, proptest};
    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;
    use std::collections;
    use std::hash::BuildHasherDefault;

    type LolMap<K, V> = ChainedHashMap<K, V, BuildHasherDefault<LolHasher>>;

    assert_impl_all!(ChainedHashMap<i32, i32>: Send, Sync);

    #[test]
    fn overflow_at_capacity_one() {
        let config = MapConfig::new().with_capacity(1);
        let mut map = ChainedHashMap::with_config(config).unwrap();
        assert_eq!(Ok(None), map.put(1, "a"));
        assert_eq!(Err(MapError::Overflow { capacity: 1 }), map.put(2, "b"));
        assert_eq!(Ok(Some("a")), map.put(1, "c"));
        assert_eq!(1, map.len());
        assert!(Map::is_full(&map));
        assert_eq!(Some(0), map.remaining());
        map.assert_invariants();
    }

    #[test]
    fn evicting_overflow_policy() {
        let config = MapConfig::new().with_capacity(3).with_overflow(EvictFirst);
        let mut map = ChainedHashMap::with_config(config).unwrap();
        for i in 0..10 {
            map.put(i, i).unwrap();
            assert!(map.len() <= 3);
        }
        assert_eq!(3, map.len());
        assert_eq!(Some(&9), map.get(&9));
        map.assert_invariants();
    }

    #[test]
    fn grows_past_load_factor() {
        let mut map = ChainedHashMap::new();
        assert_eq!(MIN_TABLE_LEN, map.table_len());
        for i in 0..1000 {
            map.put(i, i * 2).unwrap();
        }
        assert!(map.table_len() as f64 * DEFAULT_CHAINED_LOAD_FACTOR >= 1000.0);
        for i in 0..1000 {
            assert_eq!(Some(&(i * 2)), map.get(&i));
        }
        map.assert_invariants();
    }

    #[test]
    fn colliding_keys() {
        let mut map: LolMap<u16, u16> = Default::default();
        // Only the low byte is hashed, so every multiple of 256 collides.
        for i in 0..64 {
            map.put(i * 256, i).unwrap();
        }
        map.assert_invariants();
        for i in (0..64).step_by(2) {
            assert_eq!(Some(i), map.remove(&(i * 256)));
        }
        assert_eq!(32, map.len());
        for i in 0..64 {
            let expected = if i % 2 == 0 { None } else { Some(&i) };
            assert_eq!(expected, map.get(&(i * 256)));
        }
        map.assert_invariants();
    }

    #[test]
    fn filter_entries_counts_removals() {
        let mut map: ChainedHashMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
        assert_eq!(50, map.filter_entries(|k, _| k % 2 == 0));
        assert_eq!(50, map.len());
        assert_eq!(50, map.iter().count());
        assert!(map.keys().all(|k| k % 2 == 0));
        assert_eq!(0, map.filter_entries(|_, _| true));
        map.assert_invariants();
    }

    #[test]
    fn clone_is_independent() {
        let mut original: ChainedHashMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
        let mut copy = original.clone();
        let mut before = original.to_vec();
        let mut copied = copy.to_vec();
        before.sort();
        copied.sort();
        assert_eq!(before, copied);
        copy.put(100, 100).unwrap();
        copy.remove(&0);
        original.put(0, -1).unwrap();
        assert_eq!(None, original.get(&100));
        assert_eq!(Some(&-1), original.get(&0));
        assert_eq!(None, copy.get(&0));
    }

    #[test]
    fn borrowed_lookups_and_index() {
        let mut map = chained_map! {"foo".to_string() => 1, "bar".to_string() => 2};
        assert_eq!(1, map["foo"]);
        assert_eq!(Some(2), map.remove("bar"));
        assert!(!map.contains_key("bar"));
        if let Some(value) = map.get_mut("foo") {
            *value = 5;
        }
        assert_eq!(Some((&"foo".to_string(), &5)), map.get_key_value("foo"));
    }

    #[test]
    fn mutable_iteration() {
        let mut map: ChainedHashMap<i32, i32> = (0..20).map(|i| (i, i)).collect();
        for (_, value) in map.iter_mut() {
            *value *= 10;
        }
        assert!(map.iter().all(|(k, v)| *v == k * 10));
        assert!(map.contains_value(&190));
        assert!(!map.contains_value(&191));
    }

    #[test]
    fn consuming_iteration() {
        let map: ChainedHashMap<i32, String> = (0..20).map(|i| (i, i.to_string())).collect();
        let mut pairs: Vec<_> = map.into_iter().collect();
        pairs.sort();
        assert_eq!(20, pairs.len());
        assert_eq!((7, "7".to_string()), pairs[7]);
    }

    #[test]
    fn clear_resets_table() {
        let mut map: ChainedHashMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(MIN_TABLE_LEN, map.table_len());
        assert_eq!(None, map.get(&1));
    }

    #[test]
    fn tiny_load_factor_grows_far_enough() {
        let config = MapConfig::new().with_load_factor(0.01);
        let mut map = ChainedHashMap::with_config(config).unwrap();
        map.put(1, 1).unwrap();
        assert!(map.table_len() >= 100);
        map.assert_invariants();
        let bad = MapConfig::<i32, i32>::new().with_load_factor(0.0);
        assert!(matches!(
            ChainedHashMap::with_config(bad),
            Err(MapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn proper_formatting() {
        let map = chained_map! {1 => 2};
        assert_eq!("{1: 2}", format!("{:?}", map));
    }

    #[test]
    fn deep_collision_chain_drops() {
        let mut map: ChainedHashMap<u32, u32, BuildHasherDefault<LolHasher<0>>> =
            Default::default();
        for i in 0..10_000 {
            map.insert_unbounded(i, i);
        }
        let copy = map.clone();
        assert_eq!(10_000, copy.len());
    }

    proptest! {
        #[test]
        fn matches_std(ref script in ops(i16::ANY, i16::ANY, 0..400)) {
            let mut map: LolMap<i16, i16> = Default::default();
            let mut nat = collections::HashMap::new();
            for op in script {
                match op {
                    Op::Put(k, v) => assert_eq!(nat.insert(*k, *v), map.put(*k, *v).unwrap()),
                    Op::Remove(k) => assert_eq!(nat.remove(k), Map::remove(&mut map, k)),
                }
                assert_eq!(nat.len(), map.len());
            }
            assert_eq!(map.len(), map.iter().count());
            for (k, v) in &nat {
                assert_eq!(Some(v), map.get(k));
            }
            map.assert_invariants();
        }

        #[test]
        fn equality(ref m in collection::hash_map(i16::ANY, i16::ANY, 0..500)) {
            let map1: ChainedHashMap<i16, i16> = m.clone().into_iter().collect();
            let map2: LolMap<i16, i16> = m.clone().into_iter().collect();
            let map3: ChainedHashMap<i16, i16> = m.clone().into_iter().collect();
            assert_eq!(map1, map3);
            assert_eq!(map1.len(), map2.len());
        }

        #[test]
        fn exact_size_iterator(ref m in collection::hash_map(i16::ANY, i16::ANY, 0..100)) {
            let map: ChainedHashMap<i16, i16> = m.clone().into_iter().collect();
            let mut should_be = map.len();
            let mut it = map.iter();
            loop {
                assert_eq!(should_be, it.len());
                match it.next() {
                    None => break,
                    Some(_) => should_be -= 1,
                }
            }
            assert_eq!(0, it.len());
        }
    }
}
