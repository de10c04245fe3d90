// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A hash map using open addressing with double hashing.
//!
//! All entries live in one flat, prime-sized array of slots. A key's
//! probe sequence starts at `hash % len` and advances by
//! `1 + hash % (len - 2)`, which is never a multiple of the prime table
//! length, so every probe sequence visits every slot.
//!
//! Removing an entry leaves a tombstone behind so that probe sequences
//! passing through the slot aren't cut short. The map tracks its
//! occupancy (live entries plus tombstones) separately from its length:
//! once occupancy passes `len * load_factor` the table is either compacted
//! in place, if tombstones make up most of the excess, or grown to the
//! next prime at least twice its size.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt::{Debug, Error, Formatter};
use std::hash::{BuildHasher, Hash};
use std::iter::{FromIterator, FusedIterator};
use std::mem;
use std::ops::Index;
use std::slice;

use log::{debug, trace};

use crate::capacity::{make_room, Capacity, Evict, SharedPolicy};
use crate::config::{MapConfig, DEFAULT_OPEN_LOAD_FACTOR, MAX_TABLE_LEN, MIN_TABLE_LEN};
use crate::error::MapError;
use crate::map::Map;
use crate::util::{bucket_index, grown_table_len, hash_key};

/// Construct an open-addressing hash map from a sequence of key/value
/// pairs.
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate keyed;
/// # use keyed::OpenHashMap;
/// let map = open_map! {
///     1 => 11,
///     2 => 22,
///     3 => 33,
/// };
/// assert_eq!(Some(&33), map.get(&3));
/// ```
#[macro_export]
macro_rules! open_map {
    () => { $crate::hash::open::OpenHashMap::new() };

    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        let mut map = $crate::hash::open::OpenHashMap::new();
        $({
            map.insert_unbounded($key, $value);
        })*;
        map
    }};
}

#[derive(Clone)]
struct Entry<K, V> {
    hash: u64,
    key: K,
    value: V,
}

#[derive(Clone)]
enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(Entry<K, V>),
}

impl<K, V> Slot<K, V> {
    fn entry(&self) -> Option<&Entry<K, V>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    fn entry_mut(&mut self) -> Option<&mut Entry<K, V>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    fn take_entry(&mut self) -> Option<Entry<K, V>> {
        match mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(entry) => Some(entry),
            other => {
                *self = other;
                None
            }
        }
    }
}

enum Probe {
    Found(usize),
    Vacant(usize),
}

fn empty_table<K, V>(len: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(len);
    slots.resize_with(len, || Slot::Empty);
    slots
}

#[inline]
fn probe_step(hash: u64, len: usize) -> usize {
    1 + (hash % (len as u64 - 2)) as usize
}

/// A hash map using open addressing.
///
/// See the [module documentation][crate::hash::open] for the probing
/// scheme.
pub struct OpenHashMap<K, V, S = RandomState> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    occupancy: usize,
    load_factor: f64,
    capacity: Capacity,
    overflow: SharedPolicy<K, V>,
    hasher: S,
}

impl<K, V> OpenHashMap<K, V, RandomState> {
    /// Construct an empty, unbounded hash map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty hash map from a configuration.
    ///
    /// Fails unless the configured load factor lies strictly between 0
    /// and 1: a full table would leave probes nowhere to stop.
    pub fn with_config(config: MapConfig<K, V>) -> Result<Self, MapError> {
        Self::with_hasher_and_config(RandomState::new(), config)
    }
}

impl<K, V, S> OpenHashMap<K, V, S> {
    /// Construct an empty, unbounded hash map using the provided hasher.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        OpenHashMap {
            slots: empty_table(MIN_TABLE_LEN),
            len: 0,
            occupancy: 0,
            load_factor: DEFAULT_OPEN_LOAD_FACTOR,
            capacity: Capacity::Unbounded,
            overflow: MapConfig::new().overflow,
            hasher,
        }
    }

    /// Construct an empty hash map using the provided hasher and
    /// configuration.
    pub fn with_hasher_and_config(hasher: S, config: MapConfig<K, V>) -> Result<Self, MapError> {
        let load_factor = config.load_factor_or(DEFAULT_OPEN_LOAD_FACTOR)?;
        if load_factor >= 1.0 {
            return Err(MapError::invalid_config(format!(
                "open addressing needs a load factor below 1, got {load_factor}"
            )));
        }
        Ok(OpenHashMap {
            slots: empty_table(MIN_TABLE_LEN),
            len: 0,
            occupancy: 0,
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

    /// Get the number of slots in use, counting tombstones.
    #[must_use]
    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    /// Get the number of slots in the table.
    #[must_use]
    pub fn table_len(&self) -> usize {
        self.slots.len()
    }

    /// Get a reference to the map's [`BuildHasher`].
    #[must_use]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Get an iterator over the key/value pairs of the map, in slot order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Get an iterator over the key/value pairs of the map with mutable
    /// references to the values.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.len,
        }
    }

    /// Get an iterator over mutable references to the values of the map.
    #[must_use]
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, value)| value)
    }

    fn over_threshold(&self) -> bool {
        self.occupancy as f64 > self.slots.len() as f64 * self.load_factor
    }

    /// Copy every live entry into a fresh table of `table_len` slots.
    fn rebuild(&mut self, table_len: usize) {
        let old = mem::replace(&mut self.slots, empty_table(table_len));
        for slot in old {
            if let Slot::Occupied(entry) = slot {
                let step = probe_step(entry.hash, table_len);
                let mut index = bucket_index(entry.hash, table_len);
                while !matches!(self.slots[index], Slot::Empty) {
                    index = (index + step) % table_len;
                }
                self.slots[index] = Slot::Occupied(entry);
            }
        }
        self.occupancy = self.len;
    }

    fn rehash_if_necessary(&mut self) {
        if !self.over_threshold() {
            return;
        }
        let table_len = self.slots.len();
        let tombstones = self.occupancy - self.len;
        if tombstones > self.len / 2 {
            debug!(
                "compacting open table of {table_len} slots: {} live, {tombstones} tombstones",
                self.len
            );
            self.rebuild(table_len);
            return;
        }
        let mut new_len = table_len;
        while self.len as f64 > new_len as f64 * self.load_factor || new_len == table_len {
            let grown = grown_table_len(new_len);
            if grown <= new_len {
                panic!("OpenHashMap: cannot grow past {MAX_TABLE_LEN} slots");
            }
            new_len = grown;
        }
        debug!(
            "resizing open table from {table_len} to {new_len} slots for {} entries",
            self.len
        );
        self.rebuild(new_len);
    }

    /// Panic unless the internal structure is consistent.
    #[cfg(any(test, feature = "debug"))]
    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        let live = self.slots.iter().filter_map(Slot::entry).count();
        let used = self
            .slots
            .iter()
            .filter(|slot| !matches!(slot, Slot::Empty))
            .count();
        assert_eq!(self.len, live);
        assert_eq!(self.occupancy, used);
        assert!(used < self.slots.len());
        for slot in &self.slots {
            if let Slot::Occupied(entry) = slot {
                assert_eq!(hash_key(&self.hasher, &entry.key), entry.hash);
                assert!(self.find(entry.hash, &entry.key).is_some());
            }
        }
    }
}

impl<K, V, S> OpenHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Find the slot holding a key, passing over tombstones.
    fn find<BK>(&self, hash: u64, key: &BK) -> Option<usize>
    where
        BK: Eq + ?Sized,
        K: Borrow<BK>,
    {
        let table_len = self.slots.len();
        let step = probe_step(hash, table_len);
        let mut index = bucket_index(hash, table_len);
        for _ in 0..table_len {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(entry) if entry.hash == hash && entry.key.borrow() == key => {
                    return Some(index)
                }
                _ => index = (index + step) % table_len,
            }
        }
        None
    }

    /// Find the slot holding a key, or the slot a new entry for it should
    /// go into: the first tombstone on the probe sequence if there is one,
    /// otherwise the empty slot that ended it.
    fn probe(&self, hash: u64, key: &K) -> Probe {
        let table_len = self.slots.len();
        let step = probe_step(hash, table_len);
        let mut index = bucket_index(hash, table_len);
        let mut tombstone = None;
        for _ in 0..table_len {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(tombstone.unwrap_or(index)),
                Slot::Tombstone => {
                    tombstone.get_or_insert(index);
                }
                Slot::Occupied(entry) if entry.hash == hash && entry.key == *key => {
                    return Probe::Found(index)
                }
                Slot::Occupied(_) => {}
            }
            index = (index + step) % table_len;
        }
        match tombstone {
            Some(index) => Probe::Vacant(index),
            None => panic!("OpenHashMap: probed a table with no free slot"),
        }
    }

    /// Get the value for a key from the map.
    ///
    /// Time: O(1)
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
        let index = self.find(hash_key(&self.hasher, key), key)?;
        self.slots[index]
            .entry()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Get a mutable reference to the value for a key from the map.
    #[must_use]
    pub fn get_mut<BK>(&mut self, key: &BK) -> Option<&mut V>
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        let index = self.find(hash_key(&self.hasher, key), key)?;
        self.slots[index].entry_mut().map(|entry| &mut entry.value)
    }

    /// Test for the presence of a key in the map.
    #[must_use]
    pub fn contains_key<BK>(&self, key: &BK) -> bool
    where
        BK: Hash + Eq + ?Sized,
        K: Borrow<BK>,
    {
        self.find(hash_key(&self.hasher, key), key).is_some()
    }

    /// Remove a key from the map, returning the value it held.
    ///
    /// The slot becomes a tombstone, so occupancy is unchanged.
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
        let index = self.find(hash_key(&self.hasher, key), key)?;
        let entry = self.slots[index].take_entry()?;
        self.len -= 1;
        Some((entry.key, entry.value))
    }

    #[doc(hidden)]
    pub fn insert_unbounded(&mut self, key: K, value: V) -> Option<V> {
        let hash = hash_key(&self.hasher, &key);
        match self.probe(hash, &key) {
            Probe::Found(index) => self.slots[index]
                .entry_mut()
                .map(|entry| mem::replace(&mut entry.value, value)),
            Probe::Vacant(index) => {
                self.fill(index, Entry { hash, key, value });
                None
            }
        }
    }

    fn fill(&mut self, index: usize, entry: Entry<K, V>) {
        if matches!(self.slots[index], Slot::Empty) {
            self.occupancy += 1;
        } else {
            trace!("reusing tombstone at slot {index}");
        }
        self.slots[index] = Slot::Occupied(entry);
        self.len += 1;
        self.rehash_if_necessary();
    }
}

impl<K, V, S> Map<K, V> for OpenHashMap<K, V, S>
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
        OpenHashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        OpenHashMap::get_mut(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        OpenHashMap::contains_key(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        let hash = hash_key(&self.hasher, &key);
        if let Probe::Found(index) = self.probe(hash, &key) {
            return Ok(self.slots[index]
                .entry_mut()
                .map(|entry| mem::replace(&mut entry.value, value)));
        }
        if self.capacity.is_full(self.len) {
            let policy = self.overflow.clone();
            let capacity = self.capacity;
            make_room(self, policy, capacity, &key, &value)?;
        }
        // Eviction may have left a tombstone earlier on this key's probe
        // sequence, so probe again.
        match self.probe(hash, &key) {
            Probe::Vacant(index) => {
                self.fill(index, Entry { hash, key, value });
                Ok(None)
            }
            // Policies only evict, but a present key is never counted twice.
            Probe::Found(index) => Ok(self.slots[index]
                .entry_mut()
                .map(|entry| mem::replace(&mut entry.value, value))),
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        OpenHashMap::remove(self, key)
    }

    fn filter_entries<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut removed = 0;
        for slot in &mut self.slots {
            if slot
                .entry()
                .is_some_and(|entry| !keep(&entry.key, &entry.value))
            {
                *slot = Slot::Tombstone;
                removed += 1;
            }
        }
        self.len -= removed;
        removed
    }

    fn clear(&mut self) {
        self.slots = empty_table(MIN_TABLE_LEN);
        self.len = 0;
        self.occupancy = 0;
    }

    fn iter(&self) -> Iter<'_, K, V> {
        OpenHashMap::iter(self)
    }
}

impl<K, V, S> Evict<K, V> for OpenHashMap<K, V, S>
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
        let entry = self.slots.iter_mut().find_map(Slot::take_entry)?;
        self.len -= 1;
        Some((entry.key, entry.value))
    }

    fn evict_last(&mut self) -> Option<(K, V)> {
        let entry = self.slots.iter_mut().rev().find_map(Slot::take_entry)?;
        self.len -= 1;
        Some((entry.key, entry.value))
    }
}

// Core traits

impl<K, V, S> Clone for OpenHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        OpenHashMap {
            slots: self.slots.clone(),
            len: self.len,
            occupancy: self.occupancy,
            load_factor: self.load_factor,
            capacity: self.capacity,
            overflow: self.overflow.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V, S> Default for OpenHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for OpenHashMap<K, V, S>
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

impl<K, V, S> Eq for OpenHashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Debug for OpenHashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<BK, K, V, S> Index<&BK> for OpenHashMap<K, V, S>
where
    BK: Hash + Eq + ?Sized,
    K: Hash + Eq + Borrow<BK>,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &BK) -> &Self::Output {
        match self.get(key) {
            None => panic!("OpenHashMap::index: invalid key"),
            Some(value) => value,
        }
    }
}

impl<K, V, S> Extend<(K, V)> for OpenHashMap<K, V, S>
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
                panic!("OpenHashMap::extend: {err}");
            }
        }
    }
}

// Iterators

/// An iterator over the entries of an open-addressing hash map.
pub struct Iter<'a, K, V> {
    slots: slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

// We impl Clone instead of deriving it, because we want Clone even if K and V aren't.
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().rev().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// A mutable iterator over the entries of an open-addressing hash map.
pub struct IterMut<'a, K, V> {
    slots: slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().find_map(Slot::entry_mut)?;
        self.remaining -= 1;
        Some((&entry.key, &mut entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().rev().find_map(Slot::entry_mut)?;
        self.remaining -= 1;
        Some((&entry.key, &mut entry.value))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// A consuming iterator over the entries of an open-addressing hash map.
pub struct ConsumingIter<K, V> {
    slots: std::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for ConsumingIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().find_map(|slot| match slot {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        })?;
        self.remaining -= 1;
        Some((entry.key, entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for ConsumingIter<K, V> {}

impl<K, V> FusedIterator for ConsumingIter<K, V> {}

impl<'a, K, V, S> IntoIterator for &'a OpenHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for OpenHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = ConsumingIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        ConsumingIter {
            slots: self.slots.into_iter(),
            remaining: self.len,
        }
    }
}

// Conversions

impl<K, V, S> FromIterator<(K, V)> for OpenHashMap<K, V, S>
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

impl<K, V, S> From<Vec<(K, V)>> for OpenHashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from(m: Vec<(K, V)>) -> Self {
        m.into_iter().collect()
    }
}

impl<'a, K, V, S> From<&'a [(K, V)]> for OpenHashMap<K, V, S>
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
