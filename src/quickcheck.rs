// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{AvlTreeMap, ChainedHashMap, OpenHashMap, SkipListMap, SplayTreeMap};
use ::quickcheck::{Arbitrary, Gen};
use std::hash::{BuildHasher, Hash};

impl<K, V, S> Arbitrary for ChainedHashMap<K, V, S>
where
    K: Hash + Eq + Clone + Arbitrary,
    V: Clone + Arbitrary,
    S: BuildHasher + Default + Clone + 'static,
{
    fn arbitrary(g: &mut Gen) -> Self {
        ChainedHashMap::from(Vec::<(K, V)>::arbitrary(g))
    }
}

impl<K, V, S> Arbitrary for OpenHashMap<K, V, S>
where
    K: Hash + Eq + Clone + Arbitrary,
    V: Clone + Arbitrary,
    S: BuildHasher + Default + Clone + 'static,
{
    fn arbitrary(g: &mut Gen) -> Self {
        OpenHashMap::from(Vec::<(K, V)>::arbitrary(g))
    }
}

impl<K: Ord + Clone + Arbitrary, V: Clone + Arbitrary> Arbitrary for AvlTreeMap<K, V> {
    fn arbitrary(g: &mut Gen) -> Self {
        AvlTreeMap::from(Vec::<(K, V)>::arbitrary(g))
    }
}

impl<K: Ord + Clone + Arbitrary, V: Clone + Arbitrary> Arbitrary for SkipListMap<K, V> {
    fn arbitrary(g: &mut Gen) -> Self {
        SkipListMap::from(Vec::<(K, V)>::arbitrary(g))
    }
}

impl<K: Ord + Clone + Arbitrary, V: Clone + Arbitrary> Arbitrary for SplayTreeMap<K, V> {
    fn arbitrary(g: &mut Gen) -> Self {
        SplayTreeMap::from(Vec::<(K, V)>::arbitrary(g))
    }
}
