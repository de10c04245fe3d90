// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An ordered map implemented as an [AVL tree][1].
//!
//! Every node records its height, with an absent child counting as -1 and
//! a leaf as 0, and the heights of a node's two subtrees never differ by
//! more than one. Inserts and removals recurse down the search path and
//! restore the invariant with single or double rotations as they unwind,
//! so the recursion is never deeper than about 1.44 log2 n.
//!
//! Lookups, inserts and removals are all O(log n) in the worst case.
//!
//! [1]: https://en.wikipedia.org/wiki/AVL_tree

use std::cmp::Ordering;
use std::fmt::{Debug, Error, Formatter};
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::mem;
use std::ops::Index;

use crate::capacity::{make_room, Capacity, Evict, SharedPolicy};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::map::{Comparator, Map, NaturalOrder, NavigableMap};
use crate::nodes::inorder::{InOrder, Walk};

/// Construct an AVL tree map from a sequence of key/value pairs.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate keyed;
/// # use keyed::{AvlTreeMap, NavigableMap};
/// let map = avl_map! {
///     1 => 11,
///     2 => 22,
///     3 => 33,
/// };
/// assert_eq!(Some((&3, &33)), map.last_entry());
/// ```
#[macro_export]
macro_rules! avl_map {
    () => { $crate::ord::avl::AvlTreeMap::new() };

    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        let mut map = $crate::ord::avl::AvlTreeMap::new();
        $({
            map.insert_unbounded($key, $value);
        })*;
        map
    }};
}

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    height: i32,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 0,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn skew(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }

    fn into_entry(self: Box<Self>) -> (K, V) {
        let Node { key, value, .. } = *self;
        (key, value)
    }
}

#[inline]
fn height<K, V>(link: &Link<K, V>) -> i32 {
    link.as_ref().map_or(-1, |node| node.height)
}

fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.left.take() {
        None => node,
        Some(mut pivot) => {
            node.left = pivot.right.take();
            node.update_height();
            pivot.right = Some(node);
            pivot.update_height();
            pivot
        }
    }
}

fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.right.take() {
        None => node,
        Some(mut pivot) => {
            node.right = pivot.left.take();
            node.update_height();
            pivot.left = Some(node);
            pivot.update_height();
            pivot
        }
    }
}

/// Fix a node whose left subtree is two taller than its right.
fn left_balance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if let Some(left) = node.left.take() {
        node.left = Some(if left.skew() < 0 {
            rotate_left(left)
        } else {
            left
        });
    }
    rotate_right(node)
}

/// Fix a node whose right subtree is two taller than its left.
fn right_balance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if let Some(right) = node.right.take() {
        node.right = Some(if right.skew() > 0 {
            rotate_right(right)
        } else {
            right
        });
    }
    rotate_left(node)
}

fn rebalance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    node.update_height();
    let skew = node.skew();
    if skew > 1 {
        left_balance(node)
    } else if skew < -1 {
        right_balance(node)
    } else {
        node
    }
}

fn rebalance_link<K, V>(link: &mut Link<K, V>) {
    if let Some(node) = link.take() {
        *link = Some(rebalance(node));
    }
}

fn insert<K, V, C>(link: Link<K, V>, key: K, value: V, cmp: &C) -> (Box<Node<K, V>>, Option<V>)
where
    C: Comparator<K>,
{
    let mut node = match link {
        None => return (Node::leaf(key, value), None),
        Some(node) => node,
    };
    let previous = match cmp.compare(&key, &node.key) {
        Ordering::Equal => {
            let previous = mem::replace(&mut node.value, value);
            return (node, Some(previous));
        }
        Ordering::Less => {
            let (left, previous) = insert(node.left.take(), key, value, cmp);
            node.left = Some(left);
            previous
        }
        Ordering::Greater => {
            let (right, previous) = insert(node.right.take(), key, value, cmp);
            node.right = Some(right);
            previous
        }
    };
    (rebalance(node), previous)
}

fn take_leftmost<K, V>(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
    let node = link.as_mut()?;
    if node.left.is_some() {
        let found = take_leftmost(&mut node.left);
        rebalance_link(link);
        found
    } else {
        let mut node = link.take()?;
        *link = node.right.take();
        Some(node)
    }
}

fn take_rightmost<K, V>(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
    let node = link.as_mut()?;
    if node.right.is_some() {
        let found = take_rightmost(&mut node.right);
        rebalance_link(link);
        found
    } else {
        let mut node = link.take()?;
        *link = node.left.take();
        Some(node)
    }
}

/// Unlink the node at `link`, splicing in a replacement for it.
fn unlink<K, V>(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
    let mut node = link.take()?;
    *link = match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            // The replacement comes out of the taller side; ties go right.
            let mut left = Some(left);
            let mut right = Some(right);
            let taken = if height(&left) > height(&right) {
                take_rightmost(&mut left)
            } else {
                take_leftmost(&mut right)
            };
            taken.map(|mut replacement| {
                replacement.left = left;
                replacement.right = right;
                rebalance(replacement)
            })
        }
    };
    Some(node)
}

fn remove<K, V, C>(link: &mut Link<K, V>, key: &K, cmp: &C) -> Option<Box<Node<K, V>>>
where
    C: Comparator<K>,
{
    let node = link.as_mut()?;
    let removed = match cmp.compare(key, &node.key) {
        Ordering::Equal => return unlink(link),
        Ordering::Less => remove(&mut node.left, key, cmp),
        Ordering::Greater => remove(&mut node.right, key, cmp),
    };
    if removed.is_some() {
        rebalance_link(link);
    }
    removed
}

/// Build a perfectly balanced tree out of the next `count` entries.
fn build<K, V, I>(entries: &mut I, count: usize) -> Link<K, V>
where
    I: Iterator<Item = (K, V)>,
{
    if count == 0 {
        return None;
    }
    let left_count = count / 2;
    let left = build(entries, left_count);
    let (key, value) = entries.next()?;
    let right = build(entries, count - left_count - 1);
    let mut node = Box::new(Node {
        key,
        value,
        left,
        right,
        height: 0,
    });
    node.update_height();
    Some(node)
}

/// An ordered map implemented as an AVL tree.
///
/// Keys are ordered by a [`Comparator`], which defaults to the keys'
/// own [`Ord`].
pub struct AvlTreeMap<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    len: usize,
    capacity: Capacity,
    overflow: SharedPolicy<K, V>,
    comparator: C,
}

impl<K, V> AvlTreeMap<K, V, NaturalOrder> {
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

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Construct an empty, unbounded map ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use keyed::{AvlTreeMap, Map};
    /// let mut map = AvlTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.put(1, "one").unwrap();
    /// map.put(2, "two").unwrap();
    /// assert_eq!(vec![(2, "two"), (1, "one")], map.to_vec());
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        AvlTreeMap {
            root: None,
            len: 0,
            capacity: Capacity::Unbounded,
            overflow: MapConfig::new().overflow,
            comparator,
        }
    }

    /// Construct an empty map ordered by `comparator` from a
    /// configuration.
    ///
    /// The tree has no tuning knobs, so only the capacity and overflow
    /// policy are taken from `config`.
    pub fn with_comparator_and_config(
        comparator: C,
        config: MapConfig<K, V>,
    ) -> Result<Self, MapError> {
        Ok(AvlTreeMap {
            root: None,
            len: 0,
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

    /// Get the height of the tree: -1 when empty, 0 for a single entry.
    ///
    /// Time: O(1)
    #[must_use]
    pub fn height(&self) -> i32 {
        height(&self.root)
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
            inner: InOrder::new(Links(PhantomData), self.root.as_deref(), self.len),
        }
    }

    /// Get an iterator over the key/value pairs of the map, in ascending
    /// key order, with mutable references to the values.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let mut it = IterMut {
            stack: Vec::new(),
            remaining: self.len,
        };
        it.push_left_spine(self.root.as_deref_mut());
        it
    }

    /// Get an iterator over mutable references to the values of the map,
    /// in ascending key order.
    #[must_use]
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, value)| value)
    }

    /// Panic unless the internal structure is consistent.
    #[cfg(any(test, feature = "debug"))]
    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        C: Comparator<K>,
    {
        fn check<K, V>(link: &Link<K, V>) -> (i32, usize) {
            match link {
                None => (-1, 0),
                Some(node) => {
                    let (left_height, left_count) = check(&node.left);
                    let (right_height, right_count) = check(&node.right);
                    assert_eq!(1 + left_height.max(right_height), node.height);
                    assert!((left_height - right_height).abs() <= 1);
                    (node.height, left_count + right_count + 1)
                }
            }
        }
        let (_, count) = check(&self.root);
        assert_eq!(self.len, count);
        assert!(crate::map::is_strictly_ordered(
            self.iter().map(|(k, _)| k),
            &self.comparator
        ));
    }
}

impl<K, V, C> AvlTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn find(&self, key: &K) -> Option<&Node<K, V>> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match self.comparator.compare(key, &n.key) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
                Ordering::Equal => return Some(n),
            };
        }
        None
    }

    /// Find the closest key below (or above) `key`, or `key` itself when
    /// `inclusive`.
    fn neighbour(&self, key: &K, below: bool, inclusive: bool) -> Option<(&K, &V)> {
        let mut best = None;
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            let ord = self.comparator.compare(&n.key, key);
            if ord == Ordering::Equal && inclusive {
                return Some((&n.key, &n.value));
            }
            let candidate = if below {
                ord == Ordering::Less
            } else {
                ord == Ordering::Greater
            };
            if candidate {
                best = Some((&n.key, &n.value));
            }
            let go_right = if below {
                ord == Ordering::Less
            } else {
                ord != Ordering::Greater
            };
            node = if go_right {
                n.right.as_deref()
            } else {
                n.left.as_deref()
            };
        }
        best
    }

    #[doc(hidden)]
    pub fn insert_unbounded(&mut self, key: K, value: V) -> Option<V> {
        let (root, previous) = insert(self.root.take(), key, value, &self.comparator);
        self.root = Some(root);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }
}

impl<K, V, C> Map<K, V> for AvlTreeMap<K, V, C>
where
    C: Comparator<K>,
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

    /// Time: O(log n)
    fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|node| &node.value)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut node = self.root.as_deref_mut();
        while let Some(n) = node {
            node = match self.comparator.compare(key, &n.key) {
                Ordering::Less => n.left.as_deref_mut(),
                Ordering::Greater => n.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut n.value),
            };
        }
        None
    }

    /// Time: O(log n)
    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        if let Some(slot) = self.get_mut(&key) {
            return Ok(Some(mem::replace(slot, value)));
        }
        if self.capacity.is_full(self.len) {
            let policy = self.overflow.clone();
            let capacity = self.capacity;
            make_room(self, policy, capacity, &key, &value)?;
        }
        Ok(self.insert_unbounded(key, value))
    }

    /// Time: O(log n)
    fn remove(&mut self, key: &K) -> Option<V> {
        let node = remove(&mut self.root, key, &self.comparator)?;
        self.len -= 1;
        Some(node.into_entry().1)
    }

    /// Rebuilds the tree from the surviving entries.
    ///
    /// Time: O(n)
    fn filter_entries<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let before = self.len;
        let root = self.root.take();
        let kept: Vec<(K, V)> = ConsumingIter::new(root, before)
            .filter(|(key, value)| keep(key, value))
            .collect();
        self.len = kept.len();
        self.root = build(&mut kept.into_iter(), self.len);
        before - self.len
    }

    fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    fn iter(&self) -> Iter<'_, K, V> {
        AvlTreeMap::iter(self)
    }
}

impl<K, V, C> NavigableMap<K, V> for AvlTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn compare_keys(&self, a: &K, b: &K) -> Ordering {
        self.comparator.compare(a, b)
    }

    fn first_entry(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    fn last_entry(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.neighbour(key, true, true)
    }

    fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.neighbour(key, false, true)
    }

    fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.neighbour(key, true, false)
    }

    fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.neighbour(key, false, false)
    }

    fn poll_first_entry(&mut self) -> Option<(K, V)> {
        let node = take_leftmost(&mut self.root)?;
        self.len -= 1;
        Some(node.into_entry())
    }

    fn poll_last_entry(&mut self) -> Option<(K, V)> {
        let node = take_rightmost(&mut self.root)?;
        self.len -= 1;
        Some(node.into_entry())
    }
}

impl<K, V, C> Evict<K, V> for AvlTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn len(&self) -> usize {
        self.len
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

impl<K, V, C> Clone for AvlTreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        AvlTreeMap {
            root: self.root.clone(),
            len: self.len,
            capacity: self.capacity,
            overflow: self.overflow.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C> Default for AvlTreeMap<K, V, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C> PartialEq for AvlTreeMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlTreeMap<K, V, C> {}

impl<K, V, C> Debug for AvlTreeMap<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> Index<&K> for AvlTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        match self.get(key) {
            None => panic!("AvlTreeMap::index: invalid key"),
            Some(value) => value,
        }
    }
}

impl<K, V, C> Extend<(K, V)> for AvlTreeMap<K, V, C>
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
                panic!("AvlTreeMap::extend: {err}");
            }
        }
    }
}

// Iterators

struct Links<'a, K, V>(PhantomData<&'a Node<K, V>>);

impl<'a, K, V> Clone for Links<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for Links<'a, K, V> {}

impl<'a, K, V> Walk<'a> for Links<'a, K, V> {
    type Node = &'a Node<K, V>;
    type Key = K;
    type Value = V;

    fn left(self, node: Self::Node) -> Option<Self::Node> {
        node.left.as_deref()
    }

    fn right(self, node: Self::Node) -> Option<Self::Node> {
        node.right.as_deref()
    }

    fn entry(self, node: Self::Node) -> (&'a K, &'a V) {
        (&node.key, &node.value)
    }
}

/// An iterator over the entries of an AVL tree map, in ascending key
/// order.
pub struct Iter<'a, K, V> {
    inner: InOrder<'a, Links<'a, K, V>>,
}

// We impl Clone instead of deriving it, because we want Clone even if K and V aren't.
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.inner.len();
        (remaining, Some(remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// A mutable iterator over the entries of an AVL tree map, in ascending
/// key order.
pub struct IterMut<'a, K, V> {
    stack: Vec<(&'a K, &'a mut V, Option<&'a mut Node<K, V>>)>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a mut Node<K, V>>) {
        while let Some(n) = node {
            let Node {
                key,
                value,
                left,
                right,
                ..
            } = n;
            self.stack.push((&*key, value, right.as_deref_mut()));
            node = left.as_deref_mut();
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value, right) = self.stack.pop()?;
        self.push_left_spine(right);
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// A consuming iterator over the entries of an AVL tree map, in
/// ascending key order.
pub struct ConsumingIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
    remaining: usize,
}

impl<K, V> ConsumingIter<K, V> {
    fn new(root: Link<K, V>, len: usize) -> Self {
        let mut it = ConsumingIter {
            stack: Vec::new(),
            remaining: len,
        };
        it.push_left_spine(root);
        it
    }

    fn push_left_spine(&mut self, mut link: Link<K, V>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V> Iterator for ConsumingIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_left_spine(node.right.take());
        self.remaining -= 1;
        Some(node.into_entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for ConsumingIter<K, V> {}

impl<K, V> FusedIterator for ConsumingIter<K, V> {}

impl<'a, K, V, C> IntoIterator for &'a AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for AvlTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = ConsumingIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        ConsumingIter::new(self.root, self.len)
    }
}

// Conversions

impl<K, V, C> FromIterator<(K, V)> for AvlTreeMap<K, V, C>
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

impl<K, V, C> From<Vec<(K, V)>> for AvlTreeMap<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn from(m: Vec<(K, V)>) -> Self {
        m.into_iter().collect()
    }
}

impl<'a, K, V, C> From<&'a [(K, V)]> for AvlTreeMap<K, V, C>
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
    use crate::capacity::{EvictFirst, EvictLast};
    use crate::map::is_strictly_ordered;
    use crate::test::{ops, Op};
    #[rustfmt::skip]
    use ::proptest::{collection, num::i16, proptest};
    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;
    use std::collections::BTreeMap;

    assert_impl_all!(AvlTreeMap<i32, i32>: Send, Sync);

    /// The fewest nodes an AVL tree of this height can hold.
    fn min_nodes(height: i32) -> usize {
        let (mut shorter, mut taller) = (0, 1);
        for _ in 0..height {
            let next = shorter + taller + 1;
            shorter = taller;
            taller = next;
        }
        if height < 0 {
            0
        } else {
            taller
        }
    }

    fn check(map: &AvlTreeMap<i32, i32>) {
        map.assert_invariants();
        assert!(map.len() >= min_nodes(map.height()));
    }

    // Heap's algorithm, calling `f` with every permutation of `items`.
    fn permutations(items: &mut Vec<i32>, f: &mut dyn FnMut(&[i32])) {
        let n = items.len();
        let mut counters = vec![0; n];
        f(items);
        let mut i = 0;
        while i < n {
            if counters[i] < i {
                if i % 2 == 0 {
                    items.swap(0, i);
                } else {
                    items.swap(counters[i], i);
                }
                f(items);
                counters[i] += 1;
                i = 0;
            } else {
                counters[i] = 0;
                i += 1;
            }
        }
    }

    #[test]
    fn ascending_inserts_stay_shallow() {
        let mut map = AvlTreeMap::new();
        for i in 1..=7 {
            map.put(i, i).unwrap();
            check(&map);
        }
        // Three levels.
        assert_eq!(2, map.height());
    }

    #[test]
    fn exhaustive_small_trees() {
        for n in 0..=7 {
            let mut keys: Vec<i32> = (0..n).collect();
            permutations(&mut keys, &mut |order| {
                let mut map = AvlTreeMap::new();
                for &key in order {
                    assert_eq!(Ok(None), map.put(key, key));
                    check(&map);
                }
                // Remove in the insertion order, and its reverse.
                let mut reversed = map.clone();
                for &key in order {
                    assert_eq!(Some(key), map.remove(&key));
                    check(&map);
                }
                for &key in order.iter().rev() {
                    assert_eq!(Some(key), reversed.remove(&key));
                    check(&reversed);
                }
                assert!(map.is_empty());
                assert!(reversed.is_empty());
            });
        }
    }

    #[test]
    fn exhaustive_single_removals() {
        for n in 0..=12 {
            let orders: Vec<Vec<i32>> = vec![
                (0..n).collect(),
                (0..n).rev().collect(),
                (0..n).map(|i| if i % 2 == 0 { i / 2 } else { n - 1 - i / 2 }).collect(),
            ];
            for order in orders {
                let mut base = AvlTreeMap::new();
                for &key in &order {
                    base.put(key, key).unwrap();
                    check(&base);
                }
                for victim in 0..n {
                    let mut map = base.clone();
                    assert_eq!(Some(victim), map.remove(&victim));
                    check(&map);
                    assert_eq!(None, map.get(&victim));
                    assert_eq!(n as usize - 1, map.len());
                    assert_eq!(Ok(None), map.put(victim, -victim));
                    check(&map);
                }
            }
        }
    }

    #[test]
    fn neighbour_queries() {
        let map: AvlTreeMap<i32, ()> = [1, 3, 5, 7, 9].iter().map(|&k| (k, ())).collect();
        assert_eq!(Some(&5), map.floor_key(&6));
        assert_eq!(Some(&5), map.floor_key(&5));
        assert_eq!(Some(&7), map.ceiling_key(&6));
        assert_eq!(Some(&3), map.lower_key(&5));
        assert_eq!(Some(&7), map.higher_key(&5));
        assert_eq!(None, map.lower_key(&1));
        assert_eq!(None, map.higher_key(&9));
        assert_eq!(None, map.floor_key(&0));
        assert_eq!(None, map.ceiling_key(&10));
        assert_eq!(Ok(&1), map.first_key());
        assert_eq!(Ok(&9), map.last_key());
    }

    #[test]
    fn empty_extremes_underflow() {
        let map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
        assert_eq!(Err(MapError::Underflow), map.first_key());
        assert_eq!(Err(MapError::Underflow), map.last_key());
        assert_eq!(None, map.first_entry());
        assert_eq!(-1, map.height());
    }

    #[test]
    fn polling_drains_in_order() {
        let mut map: AvlTreeMap<i32, i32> = (0..20).map(|i| (i, i)).collect();
        assert_eq!(Some((0, 0)), map.poll_first_entry());
        assert_eq!(Some((19, 19)), map.poll_last_entry());
        check(&map);
        let mut drained = Vec::new();
        while let Some((key, _)) = map.poll_first_entry() {
            drained.push(key);
            check(&map);
        }
        assert_eq!((1..19).collect::<Vec<_>>(), drained);
        assert_eq!(None, map.poll_last_entry());
    }

    #[test]
    fn overflow_policies() {
        let config = MapConfig::new().with_capacity(1);
        let mut map = AvlTreeMap::with_config(config).unwrap();
        assert_eq!(Ok(None), map.put(1, "a"));
        assert_eq!(Err(MapError::Overflow { capacity: 1 }), map.put(2, "b"));
        assert_eq!(Ok(Some("a")), map.put(1, "c"));
        assert_eq!(vec![(1, "c")], map.to_vec());

        let config = MapConfig::new().with_capacity(3).with_overflow(EvictFirst);
        let mut map = AvlTreeMap::with_config(config).unwrap();
        for i in 0..6 {
            map.put(i, i).unwrap();
        }
        assert_eq!(vec![3, 4, 5], map.keys().cloned().collect::<Vec<_>>());

        let config = MapConfig::new().with_capacity(3).with_overflow(EvictLast);
        let mut map = AvlTreeMap::with_config(config).unwrap();
        for i in 0..6 {
            map.put(i, i).unwrap();
        }
        assert_eq!(vec![0, 1, 5], map.keys().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn custom_comparator() {
        let mut map = AvlTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for i in 0..10 {
            map.put(i, i).unwrap();
        }
        assert_eq!(
            (0..10).rev().collect::<Vec<_>>(),
            map.keys().cloned().collect::<Vec<_>>()
        );
        assert_eq!(Some(&4), map.higher_key(&5));
        assert_eq!(Ok(&9), map.first_key());
    }

    #[test]
    fn filter_entries_rebuilds() {
        let mut map: AvlTreeMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
        assert_eq!(66, map.filter_entries(|k, _| k % 3 == 0));
        check(&map);
        assert_eq!(
            (0..100).filter(|k| k % 3 == 0).collect::<Vec<_>>(),
            map.keys().cloned().collect::<Vec<_>>()
        );
        assert_eq!(34, map.filter_entries(|_, _| false));
        assert!(map.is_empty());
        check(&map);
    }

    #[test]
    fn clone_is_independent() {
        let mut original: AvlTreeMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        let mut copy = original.clone();
        assert_eq!(original.to_vec(), copy.to_vec());
        assert_eq!(original, copy);
        copy.put(10, 10).unwrap();
        original.remove(&0);
        assert_eq!(None, original.get(&10));
        assert_eq!(Some(&0), copy.get(&0));
        assert_ne!(original, copy);
    }

    #[test]
    fn mutation_through_iterators() {
        let mut map: AvlTreeMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        for (key, value) in map.iter_mut() {
            *value += key;
        }
        for value in map.values_mut() {
            *value += 1;
        }
        assert_eq!(
            (0..10).map(|i| 2 * i + 1).collect::<Vec<_>>(),
            map.values().cloned().collect::<Vec<_>>()
        );
        assert_eq!(19, map[&9]);
    }

    #[test]
    fn ranges() {
        let map: AvlTreeMap<i32, i32> = (0..20).map(|i| (i * 2, i)).collect();
        fn keys<'a>(it: impl Iterator<Item = (&'a i32, &'a i32)>) -> Vec<i32> {
            it.map(|(k, _)| *k).collect()
        }
        assert_eq!(vec![4, 6, 8], keys(map.range(3..10)));
        assert_eq!(vec![4, 6, 8, 10], keys(map.range(4..=10)));
        assert_eq!(vec![34, 36, 38], keys(map.range(33..)));
        assert_eq!(vec![0, 2], keys(map.range(..4)));
    }

    #[test]
    fn proper_formatting() {
        let map = avl_map! {2 => "b", 1 => "a"};
        assert_eq!(r#"{1: "a", 2: "b"}"#, format!("{:?}", map));
    }

    proptest! {
        #[test]
        fn matches_btreemap(ref script in ops(i16::ANY, i16::ANY, 0..500)) {
            let mut map = AvlTreeMap::new();
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
            let map: AvlTreeMap<i16, i16> = m.clone().into_iter().collect();
            assert_eq!(m.range(..=probe).next_back(), map.floor_entry(&probe));
            assert_eq!(m.range(..probe).next_back(), map.lower_entry(&probe));
            assert_eq!(m.range(probe..).next(), map.ceiling_entry(&probe));
            assert_eq!(
                m.range((std::ops::Bound::Excluded(probe), std::ops::Bound::Unbounded)).next(),
                map.higher_entry(&probe)
            );
        }

        #[test]
        fn iterators_meet(ref m in collection::btree_map(i16::ANY, i16::ANY, 0..100), split in 0usize..100) {
            let map: AvlTreeMap<i16, i16> = m.clone().into_iter().collect();
            let mut it = map.iter();
            let front: Vec<_> = it.by_ref().take(split).collect();
            let back: Vec<_> = it.rev().collect();
            assert_eq!(m.len(), front.len() + back.len());
            assert!(is_strictly_ordered(front.iter().chain(back.iter().rev()).map(|(k, _)| *k), &NaturalOrder));
        }

        #[test]
        fn consuming_iter_is_sorted(ref m in collection::btree_map(i16::ANY, i16::ANY, 0..200)) {
            let map: AvlTreeMap<i16, i16> = m.clone().into_iter().collect();
            let pairs: Vec<(i16, i16)> = map.into_iter().collect();
            let expected: Vec<(i16, i16)> = m.clone().into_iter().collect();
            assert_eq!(expected, pairs);
        }
    }
}
