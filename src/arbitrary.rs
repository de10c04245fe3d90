// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use arbitrary::{size_hint, Arbitrary, MaxRecursionReached, Result, Unstructured};
use std::hash::{BuildHasher, Hash};

use crate::{AvlTreeMap, ChainedHashMap, OpenHashMap, SkipListMap, SplayTreeMap};

type SizeHint = std::result::Result<(usize, Option<usize>), MaxRecursionReached>;

fn collection_size_hint(depth: usize) -> SizeHint {
    size_hint::try_recursion_guard(depth, |depth| {
        Ok(size_hint::and(
            <usize as Arbitrary<'_>>::try_size_hint(depth)?,
            (0, None),
        ))
    })
}

impl<'a, K, V, S> Arbitrary<'a> for ChainedHashMap<K, V, S>
where
    K: Arbitrary<'a> + Hash + Eq,
    V: Arbitrary<'a>,
    S: BuildHasher + Default + 'static,
{
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        u.arbitrary_iter()?.collect()
    }

    fn arbitrary_take_rest(u: Unstructured<'a>) -> Result<Self> {
        u.arbitrary_take_rest_iter()?.collect()
    }

    fn try_size_hint(depth: usize) -> SizeHint {
        collection_size_hint(depth)
    }
}

impl<'a, K, V, S> Arbitrary<'a> for OpenHashMap<K, V, S>
where
    K: Arbitrary<'a> + Hash + Eq,
    V: Arbitrary<'a>,
    S: BuildHasher + Default + 'static,
{
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        u.arbitrary_iter()?.collect()
    }

    fn arbitrary_take_rest(u: Unstructured<'a>) -> Result<Self> {
        u.arbitrary_take_rest_iter()?.collect()
    }

    fn try_size_hint(depth: usize) -> SizeHint {
        collection_size_hint(depth)
    }
}

impl<'a, K: Arbitrary<'a> + Ord, V: Arbitrary<'a>> Arbitrary<'a> for AvlTreeMap<K, V> {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        u.arbitrary_iter()?.collect()
    }

    fn arbitrary_take_rest(u: Unstructured<'a>) -> Result<Self> {
        u.arbitrary_take_rest_iter()?.collect()
    }

    fn try_size_hint(depth: usize) -> SizeHint {
        collection_size_hint(depth)
    }
}

impl<'a, K: Arbitrary<'a> + Ord, V: Arbitrary<'a>> Arbitrary<'a> for SplayTreeMap<K, V> {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        u.arbitrary_iter()?.collect()
    }

    fn arbitrary_take_rest(u: Unstructured<'a>) -> Result<Self> {
        u.arbitrary_take_rest_iter()?.collect()
    }

    fn try_size_hint(depth: usize) -> SizeHint {
        collection_size_hint(depth)
    }
}

impl<'a, K: Arbitrary<'a> + Ord, V: Arbitrary<'a>> Arbitrary<'a> for SkipListMap<K, V> {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        u.arbitrary_iter()?.collect()
    }

    fn arbitrary_take_rest(u: Unstructured<'a>) -> Result<Self> {
        u.arbitrary_take_rest_iter()?.collect()
    }

    fn try_size_hint(depth: usize) -> SizeHint {
        collection_size_hint(depth)
    }
}
