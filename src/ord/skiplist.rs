// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An ordered map implemented as a [skip list][1].
//!
//! The map is a stack of sorted, doubly linked layers. Layer 0 holds every
//! entry; each entry is promoted from one layer to the next with a fixed
//! probability, so each layer holds roughly that fraction of the one
//! below it. Searches start at the top layer and drop down whenever the
//! next key would overshoot, for an expected O(log n) cost without any
//! rebalancing.
//!
//! Every layer begins with a sentinel link, and the links of one entry's
//! tower are joined by `up` and `down` pointers. Links and entries live in
//! two [`Slab`]s and point at each other by index.
//!
//! The coin flips come from an injectable [`RngCore`], seeded from a fixed
//! constant by default, so a given sequence of operations always builds
//! the same layers.
//!
//! [1]: https://en.wikipedia.org/wiki/Skip_list

use std::cmp::Ordering;
use std::fmt::{Debug, Error, Formatter};
use std::iter::{FromIterator, FusedIterator};
use std::mem;
use std::ops::Index;

use log::trace;
use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use slab::Slab;

use crate::capacity::{make_room, Capacity, Evict, SharedPolicy};
use crate::config::{MapConfig, DEFAULT_PROBABILITY, DEFAULT_SKIP_SEED, MAX_SKIP_HEIGHT};
use crate::error::MapError;
use crate::map::{Comparator, Map, NaturalOrder, NavigableMap};

/// Construct a skip list map from a sequence of key/value pairs.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate keyed;
/// # use keyed::{NavigableMap, SkipListMap};
/// let map = skip_map! {
///     10 => "ten",
///     20 => "twenty",
///     30 => "thirty",
/// };
/// assert_eq!(Some((&20, &"twenty")), map.lower_entry(&25));
/// ```
#[macro_export]
macro_rules! skip_map {
    () => { $crate::ord::skiplist::SkipListMap::new() };

    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        let mut map = $crate::ord::skiplist::SkipListMap::new();
        $({
            map.insert_unbounded($key, $value);
        })*;
        map
    }};
}

/// One link of an entry's tower, or a layer's sentinel when `entry` is
/// `None`.
#[derive(Clone, Copy, Debug, Default)]
struct Link {
    entry: Option<usize>,
    prev: Option<usize>,
    next: Option<usize>,
    up: Option<usize>,
    down: Option<usize>,
}

/// An ordered map implemented as a skip list.
///
/// Keys are ordered by a [`Comparator`], which defaults to the keys'
/// own [`Ord`]. Promotions are decided by `R`.
pub struct SkipListMap<K, V, C = NaturalOrder, R = Xoshiro256PlusPlus> {
    links: Slab<Link>,
    entries: Slab<(K, V)>,
    // Sentinels, bottom layer first.
    heads: Vec<usize>,
    tail: Option<usize>,
    probability: f64,
    rng: R,
    capacity: Capacity,
    overflow: SharedPolicy<K, V>,
    comparator: C,
}

fn default_rng() -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(DEFAULT_SKIP_SEED)
}

impl<K, V> SkipListMap<K, V, NaturalOrder, Xoshiro256PlusPlus> {
    /// Construct an empty, unbounded map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Construct an empty map from a configuration.
    ///
    /// Fails if the configured promotion probability doesn't lie strictly
    /// between 0 and 1.
    pub fn with_config(config: MapConfig<K, V>) -> Result<Self, MapError> {
        Self::with_comparator_and_config(NaturalOrder, config)
    }
}

impl<K, V, C> SkipListMap<K, V, C, Xoshiro256PlusPlus> {
    /// Construct an empty, unbounded map ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        let mut map = SkipListMap {
            links: Slab::new(),
            entries: Slab::new(),
            heads: Vec::new(),
            tail: None,
            probability: DEFAULT_PROBABILITY,
            rng: default_rng(),
            capacity: Capacity::Unbounded,
            overflow: MapConfig::new().overflow,
            comparator,
        };
        map.reset();
        map
    }

    /// Construct an empty map ordered by `comparator` from a
    /// configuration.
    pub fn with_comparator_and_config(
        comparator: C,
        config: MapConfig<K, V>,
    ) -> Result<Self, MapError> {
        Self::with_rng(comparator, config, default_rng())
    }
}

impl<K, V, C, R> SkipListMap<K, V, C, R> {
    /// Construct an empty map that flips its promotion coins with `rng`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use keyed::{Map, MapConfig, NaturalOrder, SkipListMap};
    /// # use rand_core::SeedableRng;
    /// # use rand_xoshiro::Xoshiro256PlusPlus;
    /// let config = MapConfig::new().with_probability(0.25);
    /// let rng = Xoshiro256PlusPlus::seed_from_u64(7);
    /// let mut map = SkipListMap::with_rng(NaturalOrder, config, rng).unwrap();
    /// map.put("key", 1).unwrap();
    /// assert_eq!(Some(&1), map.get(&"key"));
    /// ```
    pub fn with_rng(comparator: C, config: MapConfig<K, V>, rng: R) -> Result<Self, MapError> {
        let probability = config.probability_or(DEFAULT_PROBABILITY)?;
        let mut map = SkipListMap {
            links: Slab::new(),
            entries: Slab::new(),
            heads: Vec::new(),
            tail: None,
            probability,
            rng,
            capacity: config.capacity,
            overflow: config.overflow,
            comparator,
        };
        map.reset();
        Ok(map)
    }

    fn reset(&mut self) {
        self.links.clear();
        self.entries.clear();
        self.heads.clear();
        self.heads.push(self.links.insert(Link::default()));
        self.tail = None;
    }

    /// Get the number of entries in the map.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Test whether the map is empty.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of layers, which is never less than one.
    #[must_use]
    pub fn height(&self) -> usize {
        self.heads.len()
    }

    /// Get the map's comparator.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Get an iterator over the key/value pairs of the map, in ascending
    /// key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            links: &self.links,
            entries: &self.entries,
            front: self.links[self.heads[0]].next,
            back: self.tail,
            remaining: self.entries.len(),
        }
    }

    /// Get an iterator over the key/value pairs of the map, in ascending
    /// key order, with mutable references to the values.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order: Vec<usize> = self.bottom_links().filter_map(|link| self.links[link].entry).collect();
        let mut entries: Vec<Option<(&K, &mut V)>> = Vec::new();
        entries.resize_with(self.entries.capacity(), || None);
        for (index, (key, value)) in self.entries.iter_mut() {
            entries[index] = Some((&*key, value));
        }
        IterMut {
            entries,
            order: order.into_iter(),
        }
    }

    /// Get an iterator over mutable references to the values of the map,
    /// in ascending key order.
    #[must_use]
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, value)| value)
    }

    /// The layer 0 links, first to last.
    fn bottom_links(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.links[self.heads[0]].next, move |&link| {
            self.links[link].next
        })
    }

    fn key(&self, link: usize) -> Option<&K> {
        self.links[link].entry.map(|entry| &self.entries[entry].0)
    }

    fn entry(&self, link: usize) -> Option<(&K, &V)> {
        self.links[link]
            .entry
            .map(|entry| {
                let (key, value) = &self.entries[entry];
                (key, value)
            })
    }

    fn link_after(&mut self, at: usize, link: usize) {
        let next = self.links[at].next;
        self.links[link].prev = Some(at);
        self.links[link].next = next;
        self.links[at].next = Some(link);
        if let Some(next) = next {
            self.links[next].prev = Some(link);
        }
    }

    fn push_layer(&mut self) -> usize {
        let below = self.heads[self.heads.len() - 1];
        let head = self.links.insert(Link {
            down: Some(below),
            ..Link::default()
        });
        self.links[below].up = Some(head);
        self.heads.push(head);
        trace!("skip list grew to {} layers", self.heads.len());
        head
    }

    /// Drop top layers that no longer hold any entries.
    fn trim_layers(&mut self) {
        while self.heads.len() > 1 {
            let top = self.heads[self.heads.len() - 1];
            if self.links[top].next.is_some() {
                break;
            }
            self.links.remove(top);
            self.heads.pop();
            let below = self.heads[self.heads.len() - 1];
            self.links[below].up = None;
            trace!("skip list shrank to {} layers", self.heads.len());
        }
    }

    /// Unlink a whole tower given its layer 0 link.
    fn unlink_tower(&mut self, bottom: usize) -> Option<(K, V)> {
        let entry = self.links[bottom].entry?;
        if self.tail == Some(bottom) {
            self.tail = self.links[bottom]
                .prev
                .filter(|&prev| self.links[prev].entry.is_some());
        }
        let mut level = Some(bottom);
        while let Some(link) = level {
            let Link { prev, next, up, .. } = self.links.remove(link);
            if let Some(prev) = prev {
                self.links[prev].next = next;
            }
            if let Some(next) = next {
                self.links[next].prev = prev;
            }
            level = up;
        }
        self.trim_layers();
        Some(self.entries.remove(entry))
    }

    /// Panic unless the internal structure is consistent.
    #[cfg(any(test, feature = "debug"))]
    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        C: Comparator<K>,
    {
        let mut below: Vec<usize> = Vec::new();
        for (layer, &head) in self.heads.iter().enumerate() {
            let head_link = &self.links[head];
            assert_eq!(None, head_link.entry);
            assert_eq!(None, head_link.prev);
            assert_eq!(layer.checked_sub(1).map(|l| self.heads[l]), head_link.down);
            let mut keys = Vec::new();
            let mut entries = Vec::new();
            let mut prev = head;
            let mut link = head_link.next;
            while let Some(current) = link {
                let l = &self.links[current];
                assert_eq!(Some(prev), l.prev);
                let Some(entry) = l.entry else {
                    panic!("sentinel linked into layer {layer}");
                };
                if layer > 0 {
                    let Some(down) = l.down else {
                        panic!("link without a down link in layer {layer}");
                    };
                    assert_eq!(Some(current), self.links[down].up);
                    assert_eq!(Some(entry), self.links[down].entry);
                    assert!(below.contains(&entry));
                } else {
                    assert_eq!(None, l.down);
                }
                keys.push(&self.entries[entry].0);
                entries.push(entry);
                prev = current;
                link = l.next;
            }
            assert!(crate::map::is_strictly_ordered(keys, &self.comparator));
            if layer == 0 {
                assert_eq!(self.entries.len(), entries.len());
                assert_eq!(self.tail, link.or(Some(prev)).filter(|&t| t != head));
            } else {
                assert!(!entries.is_empty(), "empty upper layer {layer}");
            }
            below = entries;
        }
        assert!(self.heads.len() <= MAX_SKIP_HEIGHT);
        assert_eq!(None, self.links[self.heads[self.heads.len() - 1]].up);
    }
}

impl<K, V, C, R> SkipListMap<K, V, C, R>
where
    C: Comparator<K>,
    R: RngCore,
{
    /// Find the layer 0 link with the greatest key not above `key`, or the
    /// layer 0 sentinel if there is none, and whether its key is `key`.
    fn find(&self, key: &K) -> (usize, bool) {
        let mut link = self.heads[self.heads.len() - 1];
        loop {
            while let Some(next) = self.links[link].next {
                let Some(next_key) = self.key(next) else { break };
                match self.comparator.compare(next_key, key) {
                    Ordering::Less => link = next,
                    Ordering::Equal => {
                        let mut bottom = next;
                        while let Some(down) = self.links[bottom].down {
                            bottom = down;
                        }
                        return (bottom, true);
                    }
                    Ordering::Greater => break,
                }
            }
            match self.links[link].down {
                Some(down) => link = down,
                None => return (link, false),
            }
        }
    }

    fn flip(&mut self) -> bool {
        let sample = (self.rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        sample < self.probability
    }

    #[doc(hidden)]
    pub fn insert_unbounded(&mut self, key: K, value: V) -> Option<V> {
        let (mut pred, found) = self.find(&key);
        if found {
            let entry = self.links[pred].entry?;
            return Some(mem::replace(&mut self.entries[entry].1, value));
        }
        let entry = self.entries.insert((key, value));
        let mut below = self.links.insert(Link {
            entry: Some(entry),
            ..Link::default()
        });
        self.link_after(pred, below);
        if self.links[below].next.is_none() {
            self.tail = Some(below);
        }
        let mut layer = 1;
        while layer < MAX_SKIP_HEIGHT && self.flip() {
            // Walk back to the nearest link that reaches the next layer up.
            let mut walker = pred;
            pred = loop {
                if let Some(up) = self.links[walker].up {
                    break up;
                }
                match self.links[walker].prev {
                    Some(prev) => walker = prev,
                    None => break self.push_layer(),
                }
            };
            let link = self.links.insert(Link {
                entry: Some(entry),
                down: Some(below),
                ..Link::default()
            });
            self.links[below].up = Some(link);
            self.link_after(pred, link);
            below = link;
            layer += 1;
        }
        None
    }
}

impl<K, V, C, R> Map<K, V> for SkipListMap<K, V, C, R>
where
    C: Comparator<K>,
    R: RngCore,
{
    type Iter<'a>
        = Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Time: O(log n) expected
    fn get(&self, key: &K) -> Option<&V> {
        match self.find(key) {
            (link, true) => self.entry(link).map(|(_, value)| value),
            _ => None,
        }
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(key) {
            (link, true) => {
                let entry = self.links[link].entry?;
                Some(&mut self.entries[entry].1)
            }
            _ => None,
        }
    }

    /// Time: O(log n) expected
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        if let Some(slot) = self.get_mut(&key) {
            return Ok(Some(mem::replace(slot, value)));
        }
        if self.capacity.is_full(self.entries.len()) {
            let policy = self.overflow.clone();
            let capacity = self.capacity;
            make_room(self, policy, capacity, &key, &value)?;
        }
        Ok(self.insert_unbounded(key, value))
    }

    /// Time: O(log n) expected
    fn remove(&mut self, key: &K) -> Option<V> {
        match self.find(key) {
            (link, true) => self.unlink_tower(link).map(|(_, value)| value),
            _ => None,
        }
    }

    fn filter_entries<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let doomed: Vec<usize> = self
            .bottom_links()
            .filter(|&link| match self.entry(link) {
                Some((key, value)) => !keep(key, value),
                None => false,
            })
            .collect();
        for &link in &doomed {
            self.unlink_tower(link);
        }
        doomed.len()
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn iter(&self) -> Iter<'_, K, V> {
        SkipListMap::iter(self)
    }
}

impl<K, V, C, R> NavigableMap<K, V> for SkipListMap<K, V, C, R>
where
    C: Comparator<K>,
    R: RngCore,
{
    fn compare_keys(&self, a: &K, b: &K) -> Ordering {
        self.comparator.compare(a, b)
    }

    fn first_entry(&self) -> Option<(&K, &V)> {
        self.entry(self.links[self.heads[0]].next?)
    }

    fn last_entry(&self) -> Option<(&K, &V)> {
        self.entry(self.tail?)
    }

    fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.entry(self.find(key).0)
    }

    fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
        match self.find(key) {
            (link, true) => self.entry(link),
            (link, false) => self.entry(self.links[link].next?),
        }
    }

    fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
        match self.find(key) {
            (link, true) => self.entry(self.links[link].prev?),
            (link, false) => self.entry(link),
        }
    }

    fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
        let (link, _) = self.find(key);
        self.entry(self.links[link].next?)
    }

    fn poll_first_entry(&mut self) -> Option<(K, V)> {
        let first = self.links[self.heads[0]].next?;
        self.unlink_tower(first)
    }

    fn poll_last_entry(&mut self) -> Option<(K, V)> {
        let last = self.tail?;
        self.unlink_tower(last)
    }
}

impl<K, V, C, R> Evict<K, V> for SkipListMap<K, V, C, R>
where
    C: Comparator<K>,
    R: RngCore,
{
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn evict(&mut self, key: &K) -> Option<V> {
        Map::remove(self, key)
    }

    fn evict_first(&mut self) -> Option<(K, V)> {
        self.poll_first_entry()
    }

    fn evict_last(&mut self) -> Option<(K, V)> {
        self.poll_last_entry()
    }
}

// Core traits

impl<K, V, C, R> Clone for SkipListMap<K, V, C, R>
where
    K: Clone,
    V: Clone,
    C: Clone,
    R: Clone,
{
    fn clone(&self) -> Self {
        SkipListMap {
            links: self.links.clone(),
            entries: self.entries.clone(),
            heads: self.heads.clone(),
            tail: self.tail,
            probability: self.probability,
            rng: self.rng.clone(),
            capacity: self.capacity,
            overflow: self.overflow.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C> Default for SkipListMap<K, V, C, Xoshiro256PlusPlus>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C, R> PartialEq for SkipListMap<K, V, C, R>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C, R> Eq for SkipListMap<K, V, C, R> {}

impl<K, V, C, R> Debug for SkipListMap<K, V, C, R>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, R> Index<&K> for SkipListMap<K, V, C, R>
where
    C: Comparator<K>,
    R: RngCore,
{
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        match self.get(key) {
            None => panic!("SkipListMap::index: invalid key"),
            Some(value) => value,
        }
    }
}

impl<K, V, C, R> Extend<(K, V)> for SkipListMap<K, V, C, R>
where
    C: Comparator<K>,
    R: RngCore,
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
                panic!("SkipListMap::extend: {err}");
            }
        }
    }
}

// Iterators

/// An iterator over the entries of a skip list map, in ascending key
/// order.
pub struct Iter<'a, K, V> {
    links: &'a Slab<Link>,
    entries: &'a Slab<(K, V)>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn entry(&self, link: usize) -> Option<(&'a K, &'a V)> {
        let entries = self.entries;
        self.links[link].entry.map(|entry| {
            let (key, value) = &entries[entry];
            (key, value)
        })
    }
}

// We impl Clone instead of deriving it, because we want Clone even if K and V aren't.
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            links: self.links,
            entries: self.entries,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.front?;
        self.front = self.links[link].next;
        self.remaining -= 1;
        self.entry(link)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.back?;
        self.back = self.links[link].prev;
        self.remaining -= 1;
        self.entry(link)
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// A mutable iterator over the entries of a skip list map, in ascending
/// key order.
pub struct IterMut<'a, K, V> {
    entries: Vec<Option<(&'a K, &'a mut V)>>,
    order: std::vec::IntoIter<usize>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.order.next()?;
        self.entries[index].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.order.next_back()?;
        self.entries[index].take()
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// A consuming iterator over the entries of a skip list map, in ascending
/// key order.
pub struct ConsumingIter<K, V> {
    entries: Slab<(K, V)>,
    order: std::vec::IntoIter<usize>,
}

impl<K, V> Iterator for ConsumingIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.order.next()?;
        self.entries.try_remove(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ConsumingIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.order.next_back()?;
        self.entries.try_remove(index)
    }
}

impl<K, V> ExactSizeIterator for ConsumingIter<K, V> {}

impl<K, V> FusedIterator for ConsumingIter<K, V> {}

impl<'a, K, V, C, R> IntoIterator for &'a SkipListMap<K, V, C, R> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C, R> IntoIterator for SkipListMap<K, V, C, R> {
    type Item = (K, V);
    type IntoIter = ConsumingIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order: Vec<usize> = self
            .bottom_links()
            .filter_map(|link| self.links[link].entry)
            .collect();
        ConsumingIter {
            entries: self.entries,
            order: order.into_iter(),
        }
    }
}

// Conversions

impl<K, V, C> FromIterator<(K, V)> for SkipListMap<K, V, C, Xoshiro256PlusPlus>
where
    C: Comparator<K> + Default,
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

impl<K, V, C> From<Vec<(K, V)>> for SkipListMap<K, V, C, Xoshiro256PlusPlus>
where
    C: Comparator<K> + Default,
{
    fn from(m: Vec<(K, V)>) -> Self {
        m.into_iter().collect()
    }
}

impl<'a, K, V, C> From<&'a [(K, V)]> for SkipListMap<K, V, C, Xoshiro256PlusPlus>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + Default,
{
    fn from(m: &'a [(K, V)]) -> Self {
        m.iter().cloned().collect()
    }
}

// Tests
