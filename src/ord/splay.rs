// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An ordered map implemented as a [splay tree][1].
//!
//! A splay tree keeps no balance information at all. Instead, every access
//! moves the node it touched to the root through a sequence of rotations,
//! which keeps recently and frequently used keys near the top and gives
//! O(log n) amortised bounds for every operation, though any single
//! operation may cost O(n).
//!
//! Splaying is done top-down in a single iterative pass, so a degenerate
//! tree can't exhaust the stack. Because lookups restructure the tree, the
//! child links live in [`Cell`]s inside a [`Slab`] of nodes: `get` only
//! needs `&self`. The flip side is that a `SplayTreeMap` can be sent to
//! another thread but not shared between threads.
//!
//! Iteration is driven by successor queries, which are themselves
//! splays. Walking the whole map in order this way costs O(n) in total,
//! and an iterator stays valid while other lookups reshape the tree.
//!
//! [1]: https://en.wikipedia.org/wiki/Splay_tree

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt::{Debug, Error, Formatter};
use std::iter::{FromIterator, FusedIterator};
use std::mem;
use std::ops::Index;

use slab::Slab;

use crate::capacity::{make_room, Capacity, Evict, SharedPolicy};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::map::{Comparator, Map, NaturalOrder, NavigableMap};
use crate::nodes::inorder::{InOrder, Walk};

/// Construct a splay tree map from a sequence of key/value pairs.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate keyed;
/// # use keyed::{Map, SplayTreeMap};
/// let map = splay_map! {
///     1 => 11,
///     2 => 22,
///     3 => 33,
/// };
/// assert_eq!(Some(&11), map.get(&1));
/// ```
#[macro_export]
macro_rules! splay_map {
    () => { $crate::ord::splay::SplayTreeMap::new() };

    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        let mut map = $crate::ord::splay::SplayTreeMap::new();
        $({
            map.insert_unbounded($key, $value);
        })*;
        map
    }};
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Cell<Option<usize>>,
    right: Cell<Option<usize>>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, left: Option<usize>, right: Option<usize>) -> Self {
        Node {
            key,
            value,
            left: Cell::new(left),
            right: Cell::new(right),
        }
    }

    fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// An ordered map implemented as a splay tree.
///
/// Keys are ordered by a [`Comparator`], which defaults to the keys'
/// own [`Ord`].
pub struct SplayTreeMap<K, V, C = NaturalOrder> {
    nodes: Slab<Node<K, V>>,
    root: Cell<Option<usize>>,
    capacity: Capacity,
    overflow: SharedPolicy<K, V>,
    comparator: C,
}

impl<K, V> SplayTreeMap<K, V, NaturalOrder> {
    /// Construct an empty, unbounded map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Construct an empty map from a configuration.
    pub fn with_config(config: MapConfig<K, V>) -> Result<Self, MapError> {
        Self::with_comparator_and_config(NaturalOrder, config)
    }
}

impl<K, V, C> SplayTreeMap<K, V, C> {
    /// Construct an empty, unbounded map ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        SplayTreeMap {
            nodes: Slab::new(),
            root: Cell::new(None),
            capacity: Capacity::Unbounded,
            overflow: MapConfig::new().overflow,
            comparator,
        }
    }

    /// Construct an empty map ordered by `comparator` from a
    /// configuration.
    pub fn with_comparator_and_config(
        comparator: C,
        config: MapConfig<K, V>,
    ) -> Result<Self, MapError> {
        Ok(SplayTreeMap {
            nodes: Slab::new(),
            root: Cell::new(None),
            capacity: config.capacity,
            overflow: config.overflow,
            comparator,
        })
    }

    /// Get the number of entries in the map.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Test whether the map is empty.
    ///
    /// Time: O(1)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the map's comparator.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Get the key at the root of the tree, which is the key most recently
    /// accessed.
    #[must_use]
    pub fn root_key(&self) -> Option<&K> {
        self.root.get().map(|root| &self.nodes[root].key)
    }

    /// Get an iterator over the key/value pairs of the map, in ascending
    /// key order, with mutable references to the values.
    ///
    /// This walks the tree's current shape without splaying.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.in_order();
        let mut entries: Vec<Option<(&K, &mut V)>> = Vec::new();
        entries.resize_with(self.nodes.capacity(), || None);
        for (index, node) in self.nodes.iter_mut() {
            entries[index] = Some((&node.key, &mut node.value));
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

    #[inline]
    fn left(&self, node: usize) -> Option<usize> {
        self.nodes[node].left.get()
    }

    #[inline]
    fn right(&self, node: usize) -> Option<usize> {
        self.nodes[node].right.get()
    }

    #[inline]
    fn set_left(&self, node: usize, child: Option<usize>) {
        self.nodes[node].left.set(child);
    }

    #[inline]
    fn set_right(&self, node: usize, child: Option<usize>) {
        self.nodes[node].right.set(child);
    }

    /// Slab indices of every node, in key order.
    fn in_order(&self) -> Vec<usize> {
        let mut walk = InOrder::new(Arena(&self.nodes), self.root.get(), self.nodes.len());
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(node) = walk.next_node() {
            order.push(node);
        }
        order
    }

    /// Splay the subtree rooted at `t` towards a target, returning the new
    /// subtree root.
    ///
    /// `toward` compares the target against a node's key: `Less` sends
    /// the search left, `Greater` right, and `Equal` stops it.
    fn splay_by<F>(&self, mut t: usize, mut toward: F) -> usize
    where
        F: FnMut(&K) -> Ordering,
    {
        // Nodes already known to be smaller than the target hang off
        // `left_max`, larger ones off `right_min`.
        let (mut left_root, mut left_max) = (None, None);
        let (mut right_root, mut right_min) = (None, None);
        loop {
            match toward(&self.nodes[t].key) {
                Ordering::Less => {
                    let Some(mut child) = self.left(t) else {
                        break;
                    };
                    if toward(&self.nodes[child].key) == Ordering::Less {
                        // zig-zig: rotate right first
                        self.set_left(t, self.right(child));
                        self.set_right(child, Some(t));
                        t = child;
                        match self.left(t) {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    match right_min {
                        Some(min) => self.set_left(min, Some(t)),
                        None => right_root = Some(t),
                    }
                    right_min = Some(t);
                    t = child;
                }
                Ordering::Greater => {
                    let Some(mut child) = self.right(t) else {
                        break;
                    };
                    if toward(&self.nodes[child].key) == Ordering::Greater {
                        // zag-zag: rotate left first
                        self.set_right(t, self.left(child));
                        self.set_left(child, Some(t));
                        t = child;
                        match self.right(t) {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    match left_max {
                        Some(max) => self.set_right(max, Some(t)),
                        None => left_root = Some(t),
                    }
                    left_max = Some(t);
                    t = child;
                }
                Ordering::Equal => break,
            }
        }
        match left_max {
            Some(max) => self.set_right(max, self.left(t)),
            None => left_root = self.left(t),
        }
        match right_min {
            Some(min) => self.set_left(min, self.right(t)),
            None => right_root = self.right(t),
        }
        self.set_left(t, left_root);
        self.set_right(t, right_root);
        t
    }

    fn splay_root<F>(&self, toward: F) -> Option<usize>
    where
        F: FnMut(&K) -> Ordering,
    {
        let root = self.splay_by(self.root.get()?, toward);
        self.root.set(Some(root));
        Some(root)
    }

    fn splay_min(&self) -> Option<usize> {
        self.splay_root(|_| Ordering::Less)
    }

    fn splay_max(&self) -> Option<usize> {
        self.splay_root(|_| Ordering::Greater)
    }

    fn leftmost(&self, mut node: usize) -> usize {
        while let Some(left) = self.left(node) {
            node = left;
        }
        node
    }

    fn rightmost(&self, mut node: usize) -> usize {
        while let Some(right) = self.right(node) {
            node = right;
        }
        node
    }

    fn entry(&self, node: usize) -> (&K, &V) {
        let node = &self.nodes[node];
        (&node.key, &node.value)
    }

    /// Remove the root node, joining its subtrees.
    fn unlink_root(&mut self, root: usize) -> (K, V) {
        let right = self.right(root);
        let joined = match self.left(root) {
            None => right,
            Some(left) => {
                // Everything on the left is smaller, so this brings the
                // largest of them up with an empty right subtree.
                let top = self.splay_by(left, |_| Ordering::Greater);
                self.set_right(top, right);
                Some(top)
            }
        };
        self.root.set(joined);
        self.nodes.remove(root).into_entry()
    }

    /// Build a perfectly balanced tree out of the next `count` entries.
    fn build<I>(&mut self, entries: &mut I, count: usize) -> Option<usize>
    where
        I: Iterator<Item = (K, V)>,
    {
        if count == 0 {
            return None;
        }
        let left = self.build(entries, count / 2);
        let (key, value) = entries.next()?;
        let right = self.build(entries, count - count / 2 - 1);
        Some(self.nodes.insert(Node::new(key, value, left, right)))
    }

    /// Panic unless the internal structure is consistent.
    #[cfg(any(test, feature = "debug"))]
    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        C: Comparator<K>,
    {
        let order = self.in_order();
        assert_eq!(self.nodes.len(), order.len());
        let mut seen = vec![false; self.nodes.capacity()];
        for &node in &order {
            assert!(!seen[node], "node {node} reachable twice");
            seen[node] = true;
        }
        assert!(crate::map::is_strictly_ordered(
            order.iter().map(|&node| &self.nodes[node].key),
            &self.comparator
        ));
    }
}

impl<K, V, C> SplayTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn splay(&self, key: &K) -> Option<usize> {
        self.splay_root(|node_key| self.comparator.compare(key, node_key))
    }

    /// Splay `key` and return the root if it holds exactly that key.
    fn find(&self, key: &K) -> Option<usize> {
        let root = self.splay(key)?;
        (self.comparator.compare(key, &self.nodes[root].key) == Ordering::Equal).then_some(root)
    }

    #[doc(hidden)]
    pub fn insert_unbounded(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.splay(&key) else {
            let node = self.nodes.insert(Node::new(key, value, None, None));
            self.root.set(Some(node));
            return None;
        };
        let node = match self.comparator.compare(&key, &self.nodes[root].key) {
            Ordering::Equal => return Some(mem::replace(&mut self.nodes[root].value, value)),
            Ordering::Less => {
                let left = self.left(root);
                self.set_left(root, None);
                Node::new(key, value, left, Some(root))
            }
            Ordering::Greater => {
                let right = self.right(root);
                self.set_right(root, None);
                Node::new(key, value, Some(root), right)
            }
        };
        self.root.set(Some(self.nodes.insert(node)));
        None
    }
}

impl<K, V, C> Map<K, V> for SplayTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    type Iter<'a>
        = Iter<'a, K, V, C>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Splays `key` to the root.
    ///
    /// Time: O(log n) amortised
    fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|node| &self.nodes[node].value)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.find(key)?;
        Some(&mut self.nodes[node].value)
    }

    /// Time: O(log n) amortised
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        if let Some(root) = self.find(&key) {
            return Ok(Some(mem::replace(&mut self.nodes[root].value, value)));
        }
        if self.capacity.is_full(self.nodes.len()) {
            let policy = self.overflow.clone();
            let capacity = self.capacity;
            make_room(self, policy, capacity, &key, &value)?;
        }
        Ok(self.insert_unbounded(key, value))
    }

    /// Time: O(log n) amortised
    fn remove(&mut self, key: &K) -> Option<V> {
        let root = self.find(key)?;
        Some(self.unlink_root(root).1)
    }

    /// Rebuilds the tree from the surviving entries.
    ///
    /// Time: O(n)
    fn filter_entries<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let before = self.nodes.len();
        let order = self.in_order();
        let mut nodes = mem::take(&mut self.nodes);
        let kept: Vec<(K, V)> = order
            .into_iter()
            .filter_map(|index| nodes.try_remove(index))
            .map(Node::into_entry)
            .filter(|(key, value)| keep(key, value))
            .collect();
        let count = kept.len();
        self.nodes = Slab::with_capacity(count);
        let root = self.build(&mut kept.into_iter(), count);
        self.root.set(root);
        before - count
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root.set(None);
    }

    fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            map: self,
            front: None,
            back: None,
            remaining: self.nodes.len(),
        }
    }
}

impl<K, V, C> NavigableMap<K, V> for SplayTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn compare_keys(&self, a: &K, b: &K) -> Ordering {
        self.comparator.compare(a, b)
    }

    fn first_entry(&self) -> Option<(&K, &V)> {
        self.splay_min().map(|node| self.entry(node))
    }

    fn last_entry(&self) -> Option<(&K, &V)> {
        self.splay_max().map(|node| self.entry(node))
    }

    fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
        let root = self.splay(key)?;
        if self.comparator.compare(&self.nodes[root].key, key) != Ordering::Greater {
            return Some(self.entry(root));
        }
        self.left(root).map(|left| self.entry(self.rightmost(left)))
    }

    fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
        let root = self.splay(key)?;
        if self.comparator.compare(&self.nodes[root].key, key) != Ordering::Less {
            return Some(self.entry(root));
        }
        self.right(root).map(|right| self.entry(self.leftmost(right)))
    }

    fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
        let root = self.splay(key)?;
        if self.comparator.compare(&self.nodes[root].key, key) == Ordering::Less {
            return Some(self.entry(root));
        }
        self.left(root).map(|left| self.entry(self.rightmost(left)))
    }

    fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
        let root = self.splay(key)?;
        if self.comparator.compare(&self.nodes[root].key, key) == Ordering::Greater {
            return Some(self.entry(root));
        }
        self.right(root).map(|right| self.entry(self.leftmost(right)))
    }

    fn poll_first_entry(&mut self) -> Option<(K, V)> {
        let root = self.splay_min()?;
        Some(self.unlink_root(root))
    }

    fn poll_last_entry(&mut self) -> Option<(K, V)> {
        let root = self.splay_max()?;
        Some(self.unlink_root(root))
    }
}

impl<K, V, C> Evict<K, V> for SplayTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn len(&self) -> usize {
        self.nodes.len()
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

impl<K, V, C> Clone for SplayTreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        SplayTreeMap {
            nodes: self.nodes.clone(),
            root: self.root.clone(),
            capacity: self.capacity,
            overflow: self.overflow.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C> Default for SplayTreeMap<K, V, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C> PartialEq for SplayTreeMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
    C: Comparator<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C: Comparator<K>> Eq for SplayTreeMap<K, V, C> {}

impl<K, V, C> Debug for SplayTreeMap<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        // Walks the current shape rather than splaying.
        let mut walk = InOrder::new(Arena(&self.nodes), self.root.get(), self.nodes.len());
        let mut map = f.debug_map();
        while let Some((key, value)) = walk.next() {
            map.entry(key, value);
        }
        map.finish()
    }
}

impl<K, V, C> Index<&K> for SplayTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        match self.get(key) {
            None => panic!("SplayTreeMap::index: invalid key"),
            Some(value) => value,
        }
    }
}

impl<K, V, C> Extend<(K, V)> for SplayTreeMap<K, V, C>
where
    C: Comparator<K>,
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
                panic!("SplayTreeMap::extend: {err}");
            }
        }
    }
}

// Iterators

struct Arena<'a, K, V>(&'a Slab<Node<K, V>>);

impl<'a, K, V> Clone for Arena<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for Arena<'a, K, V> {}

impl<'a, K, V> Walk<'a> for Arena<'a, K, V> {
    type Node = usize;
    type Key = K;
    type Value = V;

    fn left(self, node: usize) -> Option<usize> {
        self.0[node].left.get()
    }

    fn right(self, node: usize) -> Option<usize> {
        self.0[node].right.get()
    }

    fn entry(self, node: usize) -> (&'a K, &'a V) {
        let node = &self.0[node];
        (&node.key, &node.value)
    }
}

/// An iterator over the entries of a splay tree map, in ascending key
/// order.
///
/// Each step is a successor (or, from the back, predecessor) lookup: it
/// splays the key returned last to the root and reads its neighbour, so
/// iterating restructures the tree through `&self` just as [`Map::get`]
/// does. No walk state is kept between steps besides the last key seen
/// from each end, so other lookups may reshape the tree mid-iteration
/// without disturbing it, and the top-down splay never recurses however
/// skewed the tree is. A full pass costs O(n) amortised.
pub struct Iter<'a, K, V, C> {
    map: &'a SplayTreeMap<K, V, C>,
    front: Option<&'a K>,
    back: Option<&'a K>,
    remaining: usize,
}

// We impl Clone instead of deriving it, because we want Clone even if K and V aren't.
impl<'a, K, V, C> Clone for Iter<'a, K, V, C> {
    fn clone(&self) -> Self {
        Iter {
            map: self.map,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    C: Comparator<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = match self.front {
            None => self.map.first_entry(),
            Some(key) => self.map.higher_entry(key),
        }?;
        self.front = Some(entry.0);
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, C> DoubleEndedIterator for Iter<'a, K, V, C>
where
    C: Comparator<K>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = match self.back {
            None => self.map.last_entry(),
            Some(key) => self.map.lower_entry(key),
        }?;
        self.back = Some(entry.0);
        self.remaining -= 1;
        Some(entry)
    }
}

impl<'a, K, V, C> ExactSizeIterator for Iter<'a, K, V, C> where C: Comparator<K> {}

impl<'a, K, V, C> FusedIterator for Iter<'a, K, V, C> where C: Comparator<K> {}

/// A mutable iterator over the entries of a splay tree map, in ascending
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

/// A consuming iterator over the entries of a splay tree map, in
/// ascending key order.
pub struct ConsumingIter<K, V> {
    nodes: Slab<Node<K, V>>,
    order: std::vec::IntoIter<usize>,
}

impl<K, V> Iterator for ConsumingIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.order.next()?;
        self.nodes.try_remove(index).map(Node::into_entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ConsumingIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.order.next_back()?;
        self.nodes.try_remove(index).map(Node::into_entry)
    }
}

impl<K, V> ExactSizeIterator for ConsumingIter<K, V> {}

impl<K, V> FusedIterator for ConsumingIter<K, V> {}

impl<'a, K, V, C> IntoIterator for &'a SplayTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for SplayTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = ConsumingIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order = self.in_order();
        ConsumingIter {
            nodes: self.nodes,
            order: order.into_iter(),
        }
    }
}

// Conversions

impl<K, V, C> FromIterator<(K, V)> for SplayTreeMap<K, V, C>
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

impl<K, V, C> From<Vec<(K, V)>> for SplayTreeMap<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn from(m: Vec<(K, V)>) -> Self {
        m.into_iter().collect()
    }
}

impl<'a, K, V, C> From<&'a [(K, V)]> for SplayTreeMap<K, V, C>
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::capacity::EvictFirst;
    use crate::test::{ops, Op};
    #[rustfmt::skip]
    use ::proptest::{collection, num::i16, proptest};
    use pretty_assertions::assert_eq;
    use static_assertions::{assert_impl_all, assert_not_impl_any};
    use std::collections::BTreeMap;

    assert_impl_all!(SplayTreeMap<i32, i32>: Send);
    assert_not_impl_any!(SplayTreeMap<i32, i32>: Sync);

    #[test]
    fn lookups_splay_to_root() {
        let map: SplayTreeMap<i32, i32> = (0..10).map(|i| (i, i * i)).collect();
        assert_eq!(Some(&16), map.get(&4));
        assert_eq!(Some(&4), map.root_key());
        assert!(map.contains_key(&7));
        assert_eq!(Some(&7), map.root_key());
        assert_eq!(None, map.get(&100));
        assert_eq!(Some(&9), map.root_key());
        map.assert_invariants();
    }

    #[test]
    fn degenerate_tree_is_iterative() {
        // Ascending inserts leave a left-leaning path, and the first
        // lookup of the smallest key has to walk all of it.
        let mut map = SplayTreeMap::new();
        for i in 0..100_000 {
            map.put(i, i).unwrap();
        }
        assert_eq!(Some(&0), map.get(&0));
        assert_eq!(100_000, map.len());
        assert_eq!(Ok(&99_999), map.last_key());
    }

    #[test]
    fn neighbour_queries() {
        let map: SplayTreeMap<i32, ()> = [1, 3, 5, 7, 9].iter().map(|&k| (k, ())).collect();
        assert_eq!(Some(&5), map.floor_key(&6));
        assert_eq!(Some(&7), map.ceiling_key(&6));
        assert_eq!(Some(&3), map.lower_key(&5));
        assert_eq!(Some(&7), map.higher_key(&5));
        assert_eq!(Some(&5), map.floor_key(&5));
        assert_eq!(Some(&5), map.ceiling_key(&5));
        assert_eq!(None, map.lower_key(&1));
        assert_eq!(None, map.higher_key(&9));
        assert_eq!(Some(&9), map.floor_key(&100));
        assert_eq!(Some(&1), map.ceiling_key(&-100));
        map.assert_invariants();
    }

    #[test]
    fn removal_joins_subtrees() {
        let mut map: SplayTreeMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
        for i in (0..50).step_by(3) {
            assert_eq!(Some(i), map.remove(&i));
            map.assert_invariants();
        }
        assert_eq!(None, map.remove(&0));
        assert_eq!(
            (0..50).filter(|i| i % 3 != 0).collect::<Vec<_>>(),
            map.keys().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn polling_both_ends() {
        let mut map: SplayTreeMap<i32, &str> = vec![(2, "b"), (1, "a"), (3, "c")].into();
        assert_eq!(Some((1, "a")), map.poll_first_entry());
        assert_eq!(Some((3, "c")), map.poll_last_entry());
        assert_eq!(Some((2, "b")), map.poll_last_entry());
        assert_eq!(None, map.poll_first_entry());
        assert_eq!(Err(MapError::Underflow), map.first_key());
    }

    #[test]
    fn iteration_survives_lookups() {
        let map: SplayTreeMap<i32, i32> = (0..30).map(|i| (i, i)).collect();
        let mut seen = Vec::new();
        for (key, _) in map.iter() {
            // Reshape the tree between steps.
            map.get(&((key * 7) % 30));
            seen.push(*key);
        }
        assert_eq!((0..30).collect::<Vec<_>>(), seen);
        let backwards: Vec<i32> = map.iter().rev().map(|(k, _)| *k).collect();
        assert_eq!((0..30).rev().collect::<Vec<_>>(), backwards);
    }

    #[test]
    fn iteration_splays_through_shared_reference() {
        let map: SplayTreeMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        let mut iter = map.iter();
        assert_eq!(Some((&0, &0)), iter.next());
        assert_eq!(Some(&0), map.root_key());
        for expected in 1..10 {
            assert_eq!(Some((&expected, &expected)), iter.next());
            assert_eq!(Some(&(expected - 1)), map.root_key());
        }
        let mut iter = map.iter();
        assert_eq!(Some((&9, &9)), iter.next_back());
        assert_eq!(Some(&9), map.root_key());
        for expected in (0..9).rev() {
            assert_eq!(Some((&expected, &expected)), iter.next_back());
            assert_eq!(Some(&(expected + 1)), map.root_key());
        }
    }

    #[test]
    fn iterates_a_degenerate_tree() {
        let mut map = SplayTreeMap::new();
        // Ascending inserts leave a single left spine.
        for i in 0..20_000 {
            map.put(i, ()).unwrap();
        }
        assert_eq!(20_000, map.iter().count());
        assert_eq!(Some((&0, &())), map.iter().rev().last());
        map.assert_invariants();
    }

    #[test]
    fn capacity_with_eviction() {
        let config = MapConfig::new().with_capacity(2).with_overflow(EvictFirst);
        let mut map = SplayTreeMap::with_config(config).unwrap();
        map.put(5, "e").unwrap();
        map.put(1, "a").unwrap();
        map.put(9, "i").unwrap();
        assert_eq!(vec![(5, "e"), (9, "i")], map.to_vec());
        map.assert_invariants();

        let config = MapConfig::new().with_capacity(1);
        let mut map = SplayTreeMap::with_config(config).unwrap();
        assert_eq!(Ok(None), map.put(1, "a"));
        assert_eq!(Err(MapError::Overflow { capacity: 1 }), map.put(2, "b"));
        assert_eq!(Ok(Some("a")), map.put(1, "c"));
        assert_eq!(1, map.len());
    }

    #[test]
    fn filter_entries_rebuilds() {
        let mut map: SplayTreeMap<i32, i32> = (0..64).map(|i| (i, -i)).collect();
        assert_eq!(48, map.filter_entries(|k, _| k % 4 == 1));
        map.assert_invariants();
        assert_eq!(16, map.len());
        assert_eq!(Some(&-61), map.get(&61));
        assert_eq!(None, map.get(&60));
    }

    #[test]
    fn mutation_through_iterators() {
        let mut map: SplayTreeMap<i32, i32> = (0..10).rev().map(|i| (i, i)).collect();
        let keys: Vec<i32> = map.iter_mut().map(|(k, v)| {
            *v *= 3;
            *k
        }).collect();
        assert_eq!((0..10).collect::<Vec<_>>(), keys);
        for value in map.values_mut() {
            *value += 1;
        }
        assert_eq!(28, map[&9]);
    }

    #[test]
    fn clone_is_independent() {
        let mut original: SplayTreeMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        let copy = original.clone();
        original.remove(&5);
        original.put(20, 20).unwrap();
        assert_eq!(Some(&5), copy.get(&5));
        assert_eq!(None, copy.get(&20));
        assert_eq!(10, copy.len());
        copy.assert_invariants();
    }

    #[test]
    fn consuming_iteration() {
        let map: SplayTreeMap<i32, String> = (0..5).rev().map(|i| (i, i.to_string())).collect();
        let pairs: Vec<(i32, String)> = map.into_iter().collect();
        assert_eq!((0..5).map(|i| (i, i.to_string())).collect::<Vec<_>>(), pairs);
    }

    #[test]
    fn proper_formatting() {
        let map = splay_map! {2 => "b", 1 => "a"};
        assert_eq!(r#"{1: "a", 2: "b"}"#, format!("{:?}", map));
    }

    proptest! {
        #[test]
        fn matches_btreemap(ref script in ops(0i16..256, i16::ANY, 0..500)) {
            let mut map = SplayTreeMap::new();
            let mut nat = BTreeMap::new();
            for op in script {
                match op {
                    Op::Put(k, v) => assert_eq!(nat.insert(*k, *v), map.put(*k, *v).unwrap()),
                    Op::Remove(k) => assert_eq!(nat.remove(k), map.remove(k)),
                }
            }
            map.assert_invariants();
            assert_eq!(nat.len(), map.len());
            assert!(nat.iter().eq(map.iter()));
            assert!(nat.iter().rev().eq(map.descending_iter()));
        }

        #[test]
        fn neighbours_match_btreemap(
            ref m in collection::btree_map(i16::ANY, i16::ANY, 0..200),
            probe in i16::ANY,
        ) {
            let map: SplayTreeMap<i16, i16> = m.clone().into_iter().collect();
            assert_eq!(m.range(..=probe).next_back(), map.floor_entry(&probe));
            assert_eq!(m.range(..probe).next_back(), map.lower_entry(&probe));
            assert_eq!(m.range(probe..).next(), map.ceiling_entry(&probe));
            assert_eq!(
                m.range((std::ops::Bound::Excluded(probe), std::ops::Bound::Unbounded)).next(),
                map.higher_entry(&probe)
            );
            map.assert_invariants();
        }
    }
}
