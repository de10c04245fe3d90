// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Capacity ceilings and what to do when one is reached.
//!
//! Every map carries a [`Capacity`]. Replacing the value of an existing
//! key never counts against it, but a new key arriving at a full map is
//! handed to the map's [`OverflowPolicy`], which may make room through
//! the [`Evict`] surface and report whether the insert may proceed. The
//! default policy, [`Reject`], never makes room, so the insert fails
//! with [`MapError::Overflow`][crate::MapError::Overflow].
//!
//! # Examples
//!
//! ```
//! # use keyed::{Map, MapConfig, SkipListMap};
//! # use keyed::capacity::EvictFirst;
//! let config = MapConfig::new().with_capacity(2).with_overflow(EvictFirst);
//! let mut map = SkipListMap::with_config(config).unwrap();
//! map.put(1, "a").unwrap();
//! map.put(2, "b").unwrap();
//! map.put(3, "c").unwrap();
//! assert_eq!(vec![(2, "b"), (3, "c")], map.to_vec());
//! ```

use std::fmt::{Display, Error, Formatter};
use std::sync::Arc;

use log::debug;

use crate::error::MapError;

/// The maximum number of entries a map may hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// No limit.
    #[default]
    Unbounded,
    /// At most this many entries.
    Bounded(usize),
}

impl Capacity {
    /// The ceiling, or `None` if there isn't one.
    #[inline]
    #[must_use]
    pub fn max(self) -> Option<usize> {
        match self {
            Capacity::Unbounded => None,
            Capacity::Bounded(max) => Some(max),
        }
    }

    /// Test whether a map holding `len` entries is at the ceiling.
    #[inline]
    #[must_use]
    pub fn is_full(self, len: usize) -> bool {
        match self {
            Capacity::Unbounded => false,
            Capacity::Bounded(max) => len >= max,
        }
    }

    /// How many more entries fit next to `len` existing ones, or `None`
    /// if there is no limit.
    #[inline]
    #[must_use]
    pub fn remaining(self, len: usize) -> Option<usize> {
        self.max().map(|max| max.saturating_sub(len))
    }
}

impl Display for Capacity {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Capacity::Unbounded => write!(f, "unbounded"),
            Capacity::Bounded(max) => write!(f, "{max}"),
        }
    }
}

/// The view of a map an [`OverflowPolicy`] gets to make room with.
///
/// "First" and "last" refer to the map's natural iteration order: key
/// order for the ordered maps, table order for the hash maps.
pub trait Evict<K, V> {
    /// The number of entries currently in the map.
    fn len(&self) -> usize;

    /// Test whether the map is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the entry for `key`, if there is one.
    fn evict(&mut self, key: &K) -> Option<V>;

    /// Remove the first entry in iteration order.
    fn evict_first(&mut self) -> Option<(K, V)>;

    /// Remove the last entry in iteration order.
    fn evict_last(&mut self) -> Option<(K, V)>;
}

/// Decides what happens when a new key arrives at a full map.
///
/// Closures of the shape `Fn(&mut dyn Evict<K, V>, &K, &V) -> bool` are
/// policies too.
pub trait OverflowPolicy<K, V> {
    /// Called with the full map and the entry about to be inserted.
    ///
    /// Return `true` if room has been made and the insert should go
    /// ahead. Returning `true` without freeing an entry still fails the
    /// insert.
    fn handle_overflow(&self, map: &mut dyn Evict<K, V>, key: &K, value: &V) -> bool;
}

impl<K, V, F> OverflowPolicy<K, V> for F
where
    F: Fn(&mut dyn Evict<K, V>, &K, &V) -> bool,
{
    fn handle_overflow(&self, map: &mut dyn Evict<K, V>, key: &K, value: &V) -> bool {
        self(map, key, value)
    }
}

/// Refuse every insert into a full map.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reject;

impl<K, V> OverflowPolicy<K, V> for Reject {
    fn handle_overflow(&self, _map: &mut dyn Evict<K, V>, _key: &K, _value: &V) -> bool {
        false
    }
}

/// Drop the first entry in iteration order to make room.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvictFirst;

impl<K, V> OverflowPolicy<K, V> for EvictFirst {
    fn handle_overflow(&self, map: &mut dyn Evict<K, V>, _key: &K, _value: &V) -> bool {
        map.evict_first().is_some()
    }
}

/// Drop the last entry in iteration order to make room.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvictLast;

impl<K, V> OverflowPolicy<K, V> for EvictLast {
    fn handle_overflow(&self, map: &mut dyn Evict<K, V>, _key: &K, _value: &V) -> bool {
        map.evict_last().is_some()
    }
}

pub(crate) type SharedPolicy<K, V> = Arc<dyn OverflowPolicy<K, V> + Send + Sync>;

/// Run the overflow policy for a new key arriving at a full map.
///
/// Succeeds only if the policy accepted and the map now has room.
pub(crate) fn make_room<K, V, M>(
    map: &mut M,
    policy: SharedPolicy<K, V>,
    capacity: Capacity,
    key: &K,
    value: &V,
) -> Result<(), MapError>
where
    M: Evict<K, V>,
{
    let overflow = MapError::Overflow {
        capacity: capacity.max().unwrap_or(usize::MAX),
    };
    if !policy.handle_overflow(map, key, value) {
        debug!("overflow policy refused insert at capacity {capacity}");
        return Err(overflow);
    }
    if capacity.is_full(map.len()) {
        debug!("overflow policy accepted insert at capacity {capacity} but freed nothing");
        return Err(overflow);
    }
    debug!(
        "overflow policy made room at capacity {capacity}, {} entries left",
        map.len()
    );
    Ok(())
}
